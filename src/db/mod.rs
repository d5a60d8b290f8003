// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer: the document store interface and its implementations.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::error::AppError;
use crate::models::{PortfolioItem, ProPatch, ProRecord, Review, UserPatch, UserRecord};
use async_trait::async_trait;
use serde::Serialize;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const PROS: &str = "pros";
    /// Sub-collection of `pros/{id}`
    pub const PORTFOLIO: &str = "portfolio";
    /// Sub-collection of `pros/{id}`
    pub const REVIEWS: &str = "reviews";
}

/// User fields the admin search matches with equality queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserSearchField {
    EmailLower,
    Email,
    UsernameLower,
    DisplayNameLower,
}

impl UserSearchField {
    /// Stored field name.
    pub fn field_name(self) -> &'static str {
        match self {
            UserSearchField::EmailLower => "emailLower",
            UserSearchField::Email => "email",
            UserSearchField::UsernameLower => "usernameLower",
            UserSearchField::DisplayNameLower => "displayNameLower",
        }
    }
}

/// Document operations the service needs from the hosted backend.
///
/// Writes are merges: only the fields present in a patch are touched, and a
/// missing document is created. Equality queries return documents ordered
/// by document ID.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    // ─── Users ───────────────────────────────────────────────────

    async fn get_user(&self, uid: &str) -> Result<Option<UserRecord>, AppError>;

    async fn merge_user(&self, uid: &str, patch: &UserPatch) -> Result<(), AppError>;

    /// Users whose `field` equals `value` exactly, at most `limit`.
    async fn find_users(
        &self,
        field: UserSearchField,
        value: &str,
        limit: u32,
    ) -> Result<Vec<UserRecord>, AppError>;

    // ─── Pros ────────────────────────────────────────────────────

    async fn get_pro(&self, id: &str) -> Result<Option<ProRecord>, AppError>;

    async fn merge_pro(&self, id: &str, patch: &ProPatch) -> Result<(), AppError>;

    /// First pro (by document ID) whose `ownerUid` is `owner_uid`.
    async fn find_pro_by_owner(&self, owner_uid: &str) -> Result<Option<ProRecord>, AppError>;

    /// Pros with `isVisible == true` whose `cities` contain `city`.
    async fn visible_pros_in_city(&self, city: &str) -> Result<Vec<ProRecord>, AppError>;

    // ─── Portfolio & Reviews ─────────────────────────────────────

    /// Newest first by `createdAt`.
    async fn list_portfolio(&self, pro_id: &str, limit: u32)
        -> Result<Vec<PortfolioItem>, AppError>;

    async fn add_portfolio_item(&self, pro_id: &str, item: &PortfolioItem)
        -> Result<(), AppError>;

    async fn delete_portfolio_item(&self, pro_id: &str, item_id: &str) -> Result<(), AppError>;

    /// Newest first by `createdAt`.
    async fn list_reviews(&self, pro_id: &str, limit: u32) -> Result<Vec<Review>, AppError>;
}

/// Top-level field names a patch will write (its serialized keys).
pub(crate) fn patch_fields<T: Serialize>(patch: &T) -> Result<Vec<String>, AppError> {
    match serde_json::to_value(patch) {
        Ok(serde_json::Value::Object(map)) => Ok(map.keys().cloned().collect()),
        Ok(_) => Err(AppError::Database(
            "patch did not serialize to an object".to_string(),
        )),
        Err(e) => Err(AppError::Database(format!("failed to serialize patch: {e}"))),
    }
}
