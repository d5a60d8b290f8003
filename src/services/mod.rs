// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod admin;
pub mod catalog;
pub mod discovery;
pub mod firebase_auth;
pub mod pro_profile;
pub mod roles;
pub mod session;
pub mod storage;
pub mod text;
pub mod user_search;

pub use catalog::Catalog;
pub use firebase_auth::{AuthError, FirebaseTokenVerifier, VerifiedIdentity};
pub use roles::RoleService;
pub use storage::{BlobStore, FirebaseStorage, MemoryBlobStore};
