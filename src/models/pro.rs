// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Provider ("pro") profile, portfolio and review models.

use crate::models::lenient;
use serde::{Deserialize, Serialize};

/// Rating shown for a provider that has no stored rating.
pub const DEFAULT_RATING: f64 = 4.8;
/// Rating assumed for a review that has no numeric rating.
pub const DEFAULT_REVIEW_RATING: f64 = 5.0;
pub const DEFAULT_COMPANY_NAME: &str = "Şirket";
pub const DEFAULT_PRO_NAME: &str = "Usta";

/// Pro document as stored at `pros/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProRecord {
    /// Document ID; usually the owner's uid.
    #[serde(default, rename = "_firestore_id", skip_serializing)]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub owner_uid: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub display_name: Option<String>,
    /// Primary city (first of `cities` when written by this service).
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub cities: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub professions: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub category_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::truthy")]
    pub is_visible: bool,
    #[serde(default, deserialize_with = "lenient::truthy")]
    pub is_sponsored: bool,
    /// Seeded aggregate; never recomputed from reviews.
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub rating: Option<f64>,
    /// Seeded review count; never recomputed from reviews.
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub reviews: Option<f64>,
    #[serde(default, rename = "photoURL", deserialize_with = "lenient::opt_string")]
    pub photo_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::truthy")]
    pub is_deleted: bool,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub deleted_by: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub admin_note: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub updated_at: Option<String>,
}

impl ProRecord {
    pub fn rating_or_default(&self) -> f64 {
        self.rating.unwrap_or(DEFAULT_RATING)
    }

    pub fn is_owned_by(&self, uid: &str) -> bool {
        self.owner_uid.as_deref() == Some(uid)
    }
}

/// Partial update merged into `pros/{id}`; `None` fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub professions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_sponsored: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews: Option<u32>,
    #[serde(rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_deleted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Image in `pros/{id}/portfolio/{item_id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItem {
    #[serde(default, rename = "_firestore_id", skip_serializing)]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub created_at: Option<String>,
}

/// Review in `pros/{id}/reviews/{review_id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default, rename = "_firestore_id", skip_serializing)]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub user_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub created_at: Option<String>,
}
