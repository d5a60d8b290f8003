// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use crate::models::lenient;
use crate::models::role::AppRole;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Fallback shown when a user has neither a display name nor a username.
pub const DEFAULT_USER_NAME: &str = "Kullanıcı";

/// Whether the account also owns a provider profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Pro,
    User,
}

/// Live-support duty level, independent of the privilege tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum SupportLevel {
    Agent,
    Lead,
}

/// User document as stored at `users/{uid}`.
///
/// Every field is optional: documents are created by several clients and
/// carry no schema. Wrongly typed values decode as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Document ID (the auth uid); filled in by the store on read.
    #[serde(default, rename = "_firestore_id", skip_serializing)]
    pub uid: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub account_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub email: Option<String>,
    /// Denormalized search keys, maintained by whoever writes the profile.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub email_lower: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub username_lower: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub display_name_lower: Option<String>,
    #[serde(default, deserialize_with = "lenient::truthy")]
    pub support_agent: bool,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub support_level: Option<String>,
    /// Back-reference to the user's pro document (not ownership).
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub pro_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub updated_at: Option<String>,
}

impl UserRecord {
    /// Stored role, with unknown values mapped to the lowest tier.
    pub fn stored_role(&self) -> AppRole {
        AppRole::from_stored(self.role.as_deref())
    }

    pub fn stored_account_type(&self) -> AccountType {
        match self.account_type.as_deref() {
            Some("pro") => AccountType::Pro,
            _ => AccountType::User,
        }
    }

    pub fn stored_support_level(&self) -> SupportLevel {
        match self.support_level.as_deref() {
            Some("lead") => SupportLevel::Lead,
            _ => SupportLevel::Agent,
        }
    }
}

/// Partial update merged into `users/{uid}`.
///
/// Only fields that are `Some` are written; everything else on the stored
/// document is left untouched. `support_level: Some(None)` clears the field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<AppRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_type: Option<AccountType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_agent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_level: Option<Option<SupportLevel>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pro_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_updated_at: Option<String>,
}

impl UserPatch {
    /// Fields written when a user document has to be created on demand.
    pub fn new_user_defaults(now: &str) -> Self {
        Self {
            role: Some(AppRole::User),
            account_type: Some(AccountType::User),
            created_at: Some(now.to_string()),
            ..Default::default()
        }
    }
}
