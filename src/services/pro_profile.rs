// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Provider profile workflows: creation, editing, the profile page and
//! image uploads.

use crate::db::DirectoryStore;
use crate::error::{AppError, Result};
use crate::models::pro::{DEFAULT_RATING, DEFAULT_REVIEW_RATING};
use crate::models::user::DEFAULT_USER_NAME;
use crate::models::{AccountType, PortfolioItem, ProPatch, ProRecord, Review, UserPatch};
use crate::services::firebase_auth::VerifiedIdentity;
use crate::services::storage::BlobStore;
use crate::services::text::clean_list;
use crate::time_utils::{now_rfc3339, unix_millis};
use axum::body::Bytes;
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Most entries kept in a profile's city or profession list.
pub const MAX_LIST_ENTRIES: usize = 200;
/// Most portfolio items and reviews loaded for the profile page.
pub const PAGE_ITEM_LIMIT: u32 = 80;

// ─── Requests ────────────────────────────────────────────────

/// Body of `POST /api/pros`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProRequest {
    #[validate(length(min = 2, message = "company name must have at least 2 characters"))]
    pub company_name: String,
    #[validate(length(min = 2, message = "display name must have at least 2 characters"))]
    pub display_name: String,
    #[validate(length(min = 1, message = "select at least one profession"))]
    pub professions: Vec<String>,
    #[validate(length(min = 1, message = "select at least one city"))]
    pub cities: Vec<String>,
}

/// Body of `PUT /api/pros/{id}`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProRequest {
    #[validate(length(min = 1, message = "company name must not be empty"))]
    pub company_name: String,
    #[validate(length(min = 1, message = "display name must not be empty"))]
    pub display_name: String,
    #[validate(length(min = 1, message = "enter at least one city"))]
    pub cities: Vec<String>,
    #[validate(length(min = 1, message = "enter at least one profession"))]
    pub professions: Vec<String>,
}

impl CreateProRequest {
    /// Trimmed copy with blank list entries removed.
    pub fn normalized(&self) -> Self {
        Self {
            company_name: self.company_name.trim().to_string(),
            display_name: self.display_name.trim().to_string(),
            professions: clean_list(&self.professions, MAX_LIST_ENTRIES),
            cities: clean_list(&self.cities, MAX_LIST_ENTRIES),
        }
    }
}

impl UpdateProRequest {
    /// Trimmed copy with blank list entries removed.
    pub fn normalized(&self) -> Self {
        Self {
            company_name: self.company_name.trim().to_string(),
            display_name: self.display_name.trim().to_string(),
            cities: clean_list(&self.cities, MAX_LIST_ENTRIES),
            professions: clean_list(&self.professions, MAX_LIST_ENTRIES),
        }
    }
}

// ─── Responses ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProView {
    pub id: String,
    pub owner_uid: Option<String>,
    pub company_name: String,
    pub display_name: String,
    pub city: Option<String>,
    pub cities: Vec<String>,
    pub professions: Vec<String>,
    pub photo_url: Option<String>,
    pub is_visible: bool,
    pub is_sponsored: bool,
    pub is_deleted: bool,
}

impl From<&ProRecord> for ProView {
    fn from(pro: &ProRecord) -> Self {
        Self {
            id: pro.id.clone(),
            owner_uid: pro.owner_uid.clone(),
            company_name: pro.company_name.clone().unwrap_or_default(),
            display_name: pro.display_name.clone().unwrap_or_default(),
            city: pro.city.clone(),
            cities: pro.cities.clone(),
            professions: pro.professions.clone(),
            photo_url: pro.photo_url.clone(),
            is_visible: pro.is_visible,
            is_sponsored: pro.is_sponsored,
            is_deleted: pro.is_deleted,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PortfolioEntry {
    pub id: String,
    pub url: String,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ReviewEntry {
    pub id: String,
    pub rating: f64,
    pub text: String,
    pub user_name: String,
    pub created_at: Option<String>,
}

impl From<&Review> for ReviewEntry {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id.clone(),
            // Zero counts as unset, like a missing rating.
            rating: review
                .rating
                .filter(|r| *r != 0.0)
                .unwrap_or(DEFAULT_REVIEW_RATING),
            text: review.text.clone().unwrap_or_default(),
            user_name: review
                .user_name
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| DEFAULT_USER_NAME.to_string()),
            created_at: review.created_at.clone(),
        }
    }
}

/// Everything the profile page shows.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProPage {
    pub pro: ProView,
    pub is_owner: bool,
    pub rating: f64,
    pub review_count: u32,
    pub portfolio: Vec<PortfolioEntry>,
    pub reviews: Vec<ReviewEntry>,
}

// ─── Workflows ───────────────────────────────────────────────

/// Create or refresh the caller's own profile at `pros/{uid}`.
///
/// Publishing resets visibility, sponsorship and the seeded aggregates, then
/// marks the user document as a pro account. The two writes are separate
/// round trips. A profile soft-deleted by staff stays hidden.
pub async fn create_pro(
    db: &dyn DirectoryStore,
    identity: &VerifiedIdentity,
    request: &CreateProRequest,
) -> Result<ProRecord> {
    let request = request.normalized();
    request.validate()?;

    let uid = identity.uid.as_str();
    let now = now_rfc3339();
    let existing = db.get_pro(uid).await?;
    let removed_by_staff = existing.as_ref().is_some_and(|p| p.is_deleted);

    let patch = ProPatch {
        owner_uid: Some(uid.to_string()),
        company_name: Some(request.company_name.clone()),
        display_name: Some(request.display_name.clone()),
        city: request.cities.first().cloned(),
        cities: Some(request.cities.clone()),
        professions: Some(request.professions.clone()),
        is_visible: Some(!removed_by_staff),
        is_sponsored: Some(false),
        rating: Some(DEFAULT_RATING),
        reviews: Some(0),
        photo_url: Some(identity.photo_url.clone()),
        email: Some(identity.email.clone()),
        created_at: existing
            .as_ref()
            .and_then(|p| p.created_at.clone())
            .or_else(|| Some(now.clone())),
        updated_at: Some(now.clone()),
        ..Default::default()
    };
    db.merge_pro(uid, &patch).await?;

    if db.get_user(uid).await?.is_none() {
        db.merge_user(uid, &UserPatch::new_user_defaults(&now)).await?;
    }
    let user_patch = UserPatch {
        account_type: Some(AccountType::Pro),
        pro_id: Some(uid.to_string()),
        updated_at: Some(now),
        ..Default::default()
    };
    db.merge_user(uid, &user_patch).await?;

    tracing::info!(
        uid,
        cities = request.cities.len(),
        professions = request.professions.len(),
        created = existing.is_none(),
        hidden = removed_by_staff,
        "Saved pro profile"
    );

    db.get_pro(uid)
        .await?
        .ok_or_else(|| AppError::Database(format!("pro {uid} missing after write")))
}

/// Load a pro the caller owns: 404 when missing, 403 for anyone else.
pub async fn load_owned_pro(db: &dyn DirectoryStore, pro_id: &str, uid: &str) -> Result<ProRecord> {
    let pro = db
        .get_pro(pro_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("pro {pro_id}")))?;

    if !pro.is_owned_by(uid) {
        tracing::warn!(pro_id, uid, "Rejected edit by non-owner");
        return Err(AppError::Forbidden("only the owner can edit this profile".to_string()));
    }
    Ok(pro)
}

/// Apply an owner's edit to the profile fields.
pub async fn update_pro(
    db: &dyn DirectoryStore,
    uid: &str,
    pro_id: &str,
    request: &UpdateProRequest,
) -> Result<ProRecord> {
    let request = request.normalized();
    request.validate()?;
    load_owned_pro(db, pro_id, uid).await?;

    let patch = ProPatch {
        company_name: Some(request.company_name),
        display_name: Some(request.display_name),
        city: request.cities.first().cloned(),
        cities: Some(request.cities),
        professions: Some(request.professions),
        updated_at: Some(now_rfc3339()),
        ..Default::default()
    };
    db.merge_pro(pro_id, &patch).await?;

    tracing::info!(pro_id, uid, "Updated pro profile");

    db.get_pro(pro_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("pro {pro_id}")))
}

/// Profile page data for any signed-in viewer.
pub async fn load_page(db: &dyn DirectoryStore, pro_id: &str, viewer_uid: &str) -> Result<ProPage> {
    let pro = db
        .get_pro(pro_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("pro {pro_id}")))?;

    let portfolio: Vec<PortfolioEntry> = db
        .list_portfolio(pro_id, PAGE_ITEM_LIMIT)
        .await?
        .into_iter()
        .filter_map(|item| {
            item.url.filter(|u| !u.is_empty()).map(|url| PortfolioEntry {
                id: item.id,
                url,
                created_at: item.created_at,
            })
        })
        .collect();

    let reviews: Vec<ReviewEntry> = db
        .list_reviews(pro_id, PAGE_ITEM_LIMIT)
        .await?
        .iter()
        .map(ReviewEntry::from)
        .collect();

    let review_count = pro
        .reviews
        .map(|n| n.max(0.0) as u32)
        .unwrap_or(reviews.len() as u32);

    Ok(ProPage {
        is_owner: pro.is_owned_by(viewer_uid),
        rating: pro.rating_or_default(),
        review_count,
        pro: ProView::from(&pro),
        portfolio,
        reviews,
    })
}

// ─── Uploads ─────────────────────────────────────────────────

/// Reject anything that is not a non-empty image within the size cap.
pub fn check_image(content_type: Option<&str>, size: usize, max_bytes: usize) -> Result<String> {
    let content_type = content_type
        .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
        .filter(|ct| ct.starts_with("image/") && ct.len() > "image/".len())
        .ok_or_else(|| AppError::BadRequest("only image uploads are accepted".to_string()))?;

    if size == 0 {
        return Err(AppError::BadRequest("upload is empty".to_string()));
    }
    if size > max_bytes {
        return Err(AppError::BadRequest(format!(
            "upload exceeds {max_bytes} bytes"
        )));
    }
    Ok(content_type)
}

/// Lowercased extension of `filename`, or `jpg`.
pub fn image_extension(filename: Option<&str>) -> String {
    filename
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.trim().to_ascii_lowercase())
        .filter(|ext| {
            !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .unwrap_or_else(|| "jpg".to_string())
}

pub fn avatar_path(pro_id: &str, millis: i64) -> String {
    format!("pros/{pro_id}/avatar_{millis}.jpg")
}

pub fn portfolio_path(pro_id: &str, millis: i64, suffix: &str, ext: &str) -> String {
    format!("pros/{pro_id}/portfolio/{millis}_{suffix}.{ext}")
}

fn random_hex(bytes: usize) -> Result<String> {
    let mut buf = vec![0u8; bytes];
    SystemRandom::new()
        .fill(&mut buf)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("system RNG failure")))?;
    Ok(hex::encode(buf))
}

/// Upload a new avatar and point `photoURL` at it.
pub async fn upload_avatar(
    db: &dyn DirectoryStore,
    blobs: &dyn BlobStore,
    uid: &str,
    pro_id: &str,
    content_type: &str,
    bytes: Bytes,
) -> Result<String> {
    load_owned_pro(db, pro_id, uid).await?;

    let path = avatar_path(pro_id, unix_millis());
    let url = blobs.upload(&path, content_type, bytes).await?;

    let patch = ProPatch {
        photo_url: Some(Some(url.clone())),
        updated_at: Some(now_rfc3339()),
        ..Default::default()
    };
    db.merge_pro(pro_id, &patch).await?;

    tracing::info!(pro_id, path = %path, "Updated avatar");
    Ok(url)
}

/// Upload one portfolio image and record it.
pub async fn add_portfolio_image(
    db: &dyn DirectoryStore,
    blobs: &dyn BlobStore,
    uid: &str,
    pro_id: &str,
    filename: Option<&str>,
    content_type: &str,
    bytes: Bytes,
) -> Result<PortfolioEntry> {
    load_owned_pro(db, pro_id, uid).await?;

    let path = portfolio_path(
        pro_id,
        unix_millis(),
        &random_hex(6)?,
        &image_extension(filename),
    );
    let url = blobs.upload(&path, content_type, bytes).await?;

    let item = PortfolioItem {
        id: random_hex(10)?,
        url: Some(url.clone()),
        created_at: Some(now_rfc3339()),
    };
    db.add_portfolio_item(pro_id, &item).await?;

    tracing::info!(pro_id, item_id = %item.id, path = %path, "Added portfolio image");
    Ok(PortfolioEntry {
        id: item.id,
        url,
        created_at: item.created_at,
    })
}

/// Remove a portfolio document. The stored image is left in place.
pub async fn delete_portfolio_image(
    db: &dyn DirectoryStore,
    uid: &str,
    pro_id: &str,
    item_id: &str,
) -> Result<()> {
    load_owned_pro(db, pro_id, uid).await?;
    db.delete_portfolio_item(pro_id, item_id).await?;
    tracing::info!(pro_id, item_id, "Deleted portfolio item");
    Ok(())
}
