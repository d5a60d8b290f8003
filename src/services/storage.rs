// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Blob storage for avatars and portfolio images.

use crate::error::AppError;
use async_trait::async_trait;
use axum::body::Bytes;
use dashmap::DashMap;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use std::time::Duration;

const FIREBASE_STORAGE_URL: &str = "https://firebasestorage.googleapis.com";
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Upload an object and get back a URL clients can fetch it from.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn upload(&self, path: &str, content_type: &str, bytes: Bytes)
        -> Result<String, AppError>;
}

/// Firebase Storage through its REST upload endpoint.
///
/// Returned URLs carry the object's download token, so they are readable
/// without credentials.
pub struct FirebaseStorage {
    http_client: reqwest::Client,
    base_url: String,
    bucket: String,
    /// `None` against the emulator, which accepts a fixed owner token.
    token_generator: Option<gcloud_sdk::GoogleAuthTokenGenerator>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    name: String,
    #[serde(default)]
    download_tokens: Option<String>,
}

impl FirebaseStorage {
    /// Connect to Firebase Storage, or to the emulator when
    /// FIREBASE_STORAGE_EMULATOR_HOST is set.
    pub async fn new(bucket: &str) -> Result<Self, AppError> {
        let http_client = reqwest::Client::builder()
            .timeout(UPLOAD_TIMEOUT)
            .build()
            .map_err(|e| AppError::Storage(format!("Failed building storage client: {e}")))?;

        if let Ok(host) = std::env::var("FIREBASE_STORAGE_EMULATOR_HOST") {
            tracing::info!(host = %host, bucket, "Using Firebase Storage emulator");
            return Ok(Self {
                http_client,
                base_url: format!("http://{host}"),
                bucket: bucket.to_string(),
                token_generator: None,
            });
        }

        let token_generator = gcloud_sdk::GoogleAuthTokenGenerator::new(
            gcloud_sdk::TokenSourceType::Default,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
        )
        .await
        .map_err(|e| AppError::Storage(format!("Failed to load storage credentials: {e}")))?;

        tracing::info!(bucket, "Connected to Firebase Storage");

        Ok(Self {
            http_client,
            base_url: FIREBASE_STORAGE_URL.to_string(),
            bucket: bucket.to_string(),
            token_generator: Some(token_generator),
        })
    }

    async fn authorization(&self) -> Result<String, AppError> {
        match &self.token_generator {
            Some(generator) => {
                let token = generator
                    .create_token()
                    .await
                    .map_err(|e| AppError::Storage(format!("Failed to get access token: {e}")))?;
                Ok(token.header_value())
            }
            None => Ok("Bearer owner".to_string()),
        }
    }
}

/// Public URL of an object with its download token.
fn download_url(base_url: &str, bucket: &str, name: &str, token: &str) -> String {
    format!(
        "{}/v0/b/{}/o/{}?alt=media&token={}",
        base_url,
        bucket,
        urlencoding::encode(name),
        urlencoding::encode(token)
    )
}

#[async_trait]
impl BlobStore for FirebaseStorage {
    async fn upload(
        &self,
        path: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<String, AppError> {
        let url = format!(
            "{}/v0/b/{}/o?name={}",
            self.base_url,
            self.bucket,
            urlencoding::encode(path)
        );
        let size = bytes.len();

        let response = self
            .http_client
            .post(&url)
            .header(AUTHORIZATION, self.authorization().await?)
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Upload request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Storage(format!(
                "Upload failed {status}: {text}"
            )));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::Storage(format!("Invalid upload response: {e}")))?;

        // Several tokens may be present, comma separated; any of them works.
        let token = uploaded
            .download_tokens
            .as_deref()
            .and_then(|t| t.split(',').map(str::trim).find(|t| !t.is_empty()))
            .ok_or_else(|| {
                AppError::Storage(format!("No download token for uploaded object {}", uploaded.name))
            })?;

        tracing::info!(path, size, content_type, "Uploaded object");
        Ok(download_url(&self.base_url, &self.bucket, &uploaded.name, token))
    }
}

/// In-process blob store for local runs and tests.
#[derive(Default)]
pub struct MemoryBlobStore {
    objects: DashMap<String, (String, Bytes)>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored content type and bytes of `path`.
    pub fn get(&self, path: &str) -> Option<(String, Bytes)> {
        self.objects.get(path).map(|entry| entry.value().clone())
    }

    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.objects.iter().map(|e| e.key().clone()).collect();
        paths.sort();
        paths
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(
        &self,
        path: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<String, AppError> {
        self.objects
            .insert(path.to_string(), (content_type.to_string(), bytes));
        Ok(format!("memory://blobs/{path}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_url_encodes_object_name() {
        let url = download_url(
            FIREBASE_STORAGE_URL,
            "demo.appspot.com",
            "pros/uid 1/avatar_1.jpg",
            "tok-1",
        );
        assert_eq!(
            url,
            "https://firebasestorage.googleapis.com/v0/b/demo.appspot.com/o/pros%2Fuid%201%2Favatar_1.jpg?alt=media&token=tok-1"
        );
    }

    #[test]
    fn test_upload_response_tokens() {
        let parsed: UploadResponse = serde_json::from_str(
            r#"{"name": "pros/a/avatar_1.jpg", "bucket": "b", "downloadTokens": "t1,t2"}"#,
        )
        .unwrap();
        assert_eq!(parsed.download_tokens.as_deref(), Some("t1,t2"));
    }

    #[tokio::test]
    async fn test_memory_store_keeps_bytes() {
        let store = MemoryBlobStore::new();
        let url = store
            .upload("pros/a/avatar_1.jpg", "image/jpeg", Bytes::from_static(b"\xff\xd8"))
            .await
            .unwrap();

        assert_eq!(url, "memory://blobs/pros/a/avatar_1.jpg");
        let (content_type, bytes) = store.get("pros/a/avatar_1.jpg").unwrap();
        assert_eq!(content_type, "image/jpeg");
        assert_eq!(&bytes[..], b"\xff\xd8");
        assert_eq!(store.paths(), vec!["pros/a/avatar_1.jpg".to_string()]);
    }
}
