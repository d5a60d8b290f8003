// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Firebase web config values are public; nothing here is a secret, so the
//! whole config is read once at startup from the environment (or `.env`).

use std::env;

/// Default maximum size of an uploaded image (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Which document store implementation backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Cloud Firestore (or the Firestore emulator).
    Firestore,
    /// In-process store for local development; data is lost on restart.
    Memory,
}

impl StoreBackend {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "firestore" => Ok(Self::Firestore),
            "memory" => Ok(Self::Memory),
            _ => Err(ConfigError::Invalid("STORE_BACKEND", raw.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Firebase / GCP project ID (token audience, Firestore project)
    pub firebase_project_id: String,
    /// Firebase Storage bucket for avatars and portfolio images
    pub storage_bucket: String,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Emails that always resolve to the founder role (lowercased)
    pub founder_emails: Vec<String>,
    /// Document store selection
    pub store_backend: StoreBackend,
    /// Upper bound on upload request bodies
    pub max_upload_bytes: usize,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self::test_default()
    }
}

impl Config {
    /// Config used by the test suite.
    pub fn test_default() -> Self {
        Self {
            firebase_project_id: "test-project".to_string(),
            storage_bucket: "test-project.appspot.com".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            port: 8080,
            founder_emails: vec!["founder@repairoo.test".to_string()],
            store_backend: StoreBackend::Memory,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let firebase_project_id = env::var("FIREBASE_PROJECT_ID")
            .map(|v| v.trim().to_string())
            .map_err(|_| ConfigError::Missing("FIREBASE_PROJECT_ID"))?;
        if firebase_project_id.is_empty() {
            return Err(ConfigError::Missing("FIREBASE_PROJECT_ID"));
        }

        let storage_bucket = env::var("FIREBASE_STORAGE_BUCKET")
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|_| format!("{firebase_project_id}.appspot.com"));

        let store_backend = match env::var("STORE_BACKEND") {
            Ok(raw) => StoreBackend::parse(&raw)?,
            Err(_) => StoreBackend::Firestore,
        };

        let max_upload_bytes = match env::var("MAX_UPLOAD_BYTES") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("MAX_UPLOAD_BYTES", raw))?,
            Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            firebase_project_id,
            storage_bucket,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            founder_emails: parse_email_list(&env::var("FOUNDER_EMAILS").unwrap_or_default()),
            store_backend,
            max_upload_bytes,
        })
    }
}

/// Split a comma-separated email list, normalizing to trimmed lowercase.
pub fn parse_email_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
