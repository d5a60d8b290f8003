// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin panel routes.
//!
//! Pro moderation needs panel access; user search and role/support changes
//! need the right to add admins. Guards are applied in `routes/mod.rs`.

use crate::error::{AppError, Result};
use crate::middleware::admin::StaffUser;
use crate::models::{SupportLevel, TargetRole};
use crate::services::admin::{self, AdminOverview};
use crate::services::pro_profile::ProView;
use crate::services::user_search::{search_users, UserSummary};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    routing::{delete, get, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Routes open to every panel role.
pub fn panel_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin", get(get_overview))
        .route("/api/admin/pros/{id}/visibility", put(set_visibility))
        .route("/api/admin/pros/{id}", delete(soft_delete_pro))
}

/// Routes for founders and headmods.
pub fn manager_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/users/search", get(search))
        .route("/api/admin/users/{uid}/role", put(assign_role))
        .route("/api/admin/users/{uid}/support", put(set_support))
}

async fn get_overview(Extension(staff): Extension<StaffUser>) -> Json<AdminOverview> {
    Json(admin::overview(staff.role))
}

#[derive(Deserialize)]
struct VisibilityRequest {
    is_visible: bool,
    is_sponsored: Option<bool>,
}

async fn set_visibility(
    State(state): State<Arc<AppState>>,
    Extension(staff): Extension<StaffUser>,
    Path(id): Path<String>,
    Json(body): Json<VisibilityRequest>,
) -> Result<Json<ProView>> {
    let pro = admin::set_visibility(
        state.db.as_ref(),
        &staff.uid,
        &id,
        body.is_visible,
        body.is_sponsored,
    )
    .await?;
    Ok(Json(ProView::from(&pro)))
}

#[derive(Deserialize, Default)]
struct SoftDeleteRequest {
    admin_note: Option<String>,
}

async fn soft_delete_pro(
    State(state): State<Arc<AppState>>,
    Extension(staff): Extension<StaffUser>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<ProView>> {
    // The body is optional.
    let request: SoftDeleteRequest = if body.iter().all(u8::is_ascii_whitespace) {
        SoftDeleteRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("invalid body: {e}")))?
    };
    let note = request.admin_note;
    let pro = admin::soft_delete_pro(state.db.as_ref(), &staff.uid, &id, note).await?;
    Ok(Json(ProView::from(&pro)))
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<UserSummary>> {
    Json(search_users(state.db.as_ref(), &query.q).await)
}

#[derive(Deserialize)]
struct RoleRequest {
    role: TargetRole,
}

async fn assign_role(
    State(state): State<Arc<AppState>>,
    Extension(staff): Extension<StaffUser>,
    Path(uid): Path<String>,
    Json(body): Json<RoleRequest>,
) -> Result<Json<UserSummary>> {
    let summary = admin::assign_role(state.db.as_ref(), &staff.uid, &uid, body.role).await?;
    Ok(Json(summary))
}

#[derive(Deserialize)]
struct SupportRequest {
    support_agent: bool,
    #[serde(default = "default_support_level")]
    support_level: SupportLevel,
}

fn default_support_level() -> SupportLevel {
    SupportLevel::Agent
}

async fn set_support(
    State(state): State<Arc<AppState>>,
    Extension(staff): Extension<StaffUser>,
    Path(uid): Path<String>,
    Json(body): Json<SupportRequest>,
) -> Result<Json<UserSummary>> {
    let summary = admin::set_support(
        state.db.as_ref(),
        &staff.uid,
        &uid,
        body.support_agent,
        body.support_level,
    )
    .await?;
    Ok(Json(summary))
}
