// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Staff-facing user lookup over the denormalized search fields.
//!
//! There is no full-text index: the query text is matched exactly against
//! four fields, each with its own capped query, and the hits are unioned.

use crate::db::{DirectoryStore, UserSearchField};
use crate::models::user::DEFAULT_USER_NAME;
use crate::models::{AppRole, SupportLevel, UserRecord};
use crate::services::text::tr_lower;
use serde::Serialize;
use std::collections::HashSet;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Cap applied to each of the individual queries.
pub const PER_QUERY_LIMIT: u32 = 10;

/// User as shown in the admin search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserSummary {
    pub uid: String,
    pub display_name: String,
    pub email: String,
    pub role: AppRole,
    pub support_agent: bool,
    pub support_level: SupportLevel,
}

impl From<&UserRecord> for UserSummary {
    fn from(record: &UserRecord) -> Self {
        let display_name = [&record.display_name, &record.username]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_USER_NAME.to_string());

        Self {
            uid: record.uid.clone(),
            display_name,
            email: record.email.clone().unwrap_or_default(),
            role: record.stored_role(),
            support_agent: record.support_agent,
            support_level: record.stored_support_level(),
        }
    }
}

/// The equality queries to run for `text`, in order. Blank text runs none.
pub fn search_queries(text: &str) -> Vec<(UserSearchField, String)> {
    let raw = text.trim();
    if raw.is_empty() {
        return Vec::new();
    }
    let lowered = tr_lower(raw);
    vec![
        (UserSearchField::EmailLower, raw.to_lowercase()),
        (UserSearchField::Email, raw.to_string()),
        (UserSearchField::UsernameLower, lowered.clone()),
        (UserSearchField::DisplayNameLower, lowered),
    ]
}

/// Union query results by uid, keeping each user at its first position.
pub fn merge_results(batches: impl IntoIterator<Item = Vec<UserRecord>>) -> Vec<UserSummary> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for record in batches.into_iter().flatten() {
        if seen.insert(record.uid.clone()) {
            out.push(UserSummary::from(&record));
        }
    }
    out
}

/// Run every query for `text` and merge the hits.
///
/// A failing query (missing index, permission error) is logged and
/// skipped; the remaining queries still contribute.
pub async fn search_users(db: &dyn DirectoryStore, text: &str) -> Vec<UserSummary> {
    let queries = search_queries(text);
    let mut batches = Vec::with_capacity(queries.len());

    for (field, value) in queries {
        match db.find_users(field, &value, PER_QUERY_LIMIT).await {
            Ok(found) => {
                tracing::debug!(field = field.field_name(), hits = found.len(), "User query");
                batches.push(found);
            }
            Err(e) => {
                tracing::warn!(field = field.field_name(), error = %e, "User query skipped");
            }
        }
    }

    merge_results(batches)
}
