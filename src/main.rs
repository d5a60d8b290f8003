// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Repairoo API Server
//!
//! Serves the tradesperson directory: discovery, pro profiles and the
//! staff admin panel, backed by Firebase.

use repairoo_api::{
    config::{Config, StoreBackend},
    db::{DirectoryStore, FirestoreDb, MemoryDb},
    services::{BlobStore, Catalog, FirebaseStorage, FirebaseTokenVerifier, MemoryBlobStore, RoleService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        project = %config.firebase_project_id,
        backend = ?config.store_backend,
        "Starting Repairoo API"
    );

    let (db, blobs): (Arc<dyn DirectoryStore>, Arc<dyn BlobStore>) = match config.store_backend {
        StoreBackend::Firestore => {
            let db = FirestoreDb::new(&config.firebase_project_id).await?;
            let blobs = FirebaseStorage::new(&config.storage_bucket).await?;
            (Arc::new(db), Arc::new(blobs))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            (Arc::new(MemoryDb::new()), Arc::new(MemoryBlobStore::new()))
        }
    };

    let catalog = Catalog::builtin()?;
    tracing::info!(
        cities = catalog.cities().len(),
        categories = catalog.categories().len(),
        "Catalog loaded"
    );

    let token_verifier = Arc::new(FirebaseTokenVerifier::new(&config)?);
    let roles = RoleService::new(&config.founder_emails);
    tracing::info!(founders = config.founder_emails.len(), "Role service initialized");

    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        blobs,
        token_verifier,
        roles,
        catalog,
    });

    let app = repairoo_api::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("repairoo_api=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
