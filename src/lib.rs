// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Repairoo: a directory for finding tradespeople.
//!
//! This crate provides the backend API: session context and roles, provider
//! discovery, pro profile management and the staff admin panel, on top of
//! Firebase Authentication, Firestore and Firebase Storage.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::DirectoryStore;
use services::{BlobStore, Catalog, FirebaseTokenVerifier, RoleService};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Arc<dyn DirectoryStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub token_verifier: Arc<FirebaseTokenVerifier>,
    pub roles: RoleService,
    pub catalog: Catalog,
}
