// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Role resolution: founder allow-list first, then the stored user role.

use crate::db::DirectoryStore;
use crate::error::AppError;
use crate::models::{AppRole, UserPatch, UserRecord};
use crate::time_utils::now_rfc3339;
use std::sync::Arc;

/// Resolves a caller's privilege tier.
#[derive(Clone, Default)]
pub struct RoleService {
    founder_emails: Arc<[String]>,
}

impl RoleService {
    pub fn new(founder_emails: &[String]) -> Self {
        let emails: Vec<String> = founder_emails
            .iter()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self {
            founder_emails: emails.into(),
        }
    }

    /// Whether `email` is on the founder allow-list (case-insensitive).
    pub fn is_founder_email(&self, email: Option<&str>) -> bool {
        let Some(email) = email else {
            return false;
        };
        let email = email.trim().to_lowercase();
        !email.is_empty() && self.founder_emails.iter().any(|f| *f == email)
    }

    /// Read `users/{uid}` and resolve the role.
    ///
    /// For allow-listed emails a failed read is tolerated; everyone else
    /// gets the store error.
    pub async fn resolve(
        &self,
        db: &dyn DirectoryStore,
        uid: &str,
        email: Option<&str>,
    ) -> Result<AppRole, AppError> {
        let record = match db.get_user(uid).await {
            Ok(record) => record,
            Err(e) if self.is_founder_email(email) => {
                tracing::warn!(uid, error = %e, "User lookup failed for founder");
                None
            }
            Err(e) => return Err(e),
        };
        Ok(self
            .resolve_for_record(db, uid, email, record.as_ref())
            .await)
    }

    /// Resolve against an already loaded user record.
    ///
    /// Allow-listed emails resolve to founder and, when the stored role
    /// differs, `role = founder` is written back. A failed write is logged.
    pub async fn resolve_for_record(
        &self,
        db: &dyn DirectoryStore,
        uid: &str,
        email: Option<&str>,
        record: Option<&UserRecord>,
    ) -> AppRole {
        if !self.is_founder_email(email) {
            return record.map(UserRecord::stored_role).unwrap_or(AppRole::User);
        }

        let stored = record.and_then(|r| r.role.as_deref());
        if stored != Some(AppRole::Founder.as_str()) {
            let patch = UserPatch {
                role: Some(AppRole::Founder),
                updated_at: Some(now_rfc3339()),
                ..Default::default()
            };
            match db.merge_user(uid, &patch).await {
                Ok(()) => tracing::info!(uid, "Persisted founder role"),
                Err(e) => tracing::warn!(uid, error = %e, "Failed to persist founder role"),
            }
        }
        AppRole::Founder
    }
}
