// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Provider profile routes.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::services::pro_profile::{
    self, check_image, CreateProRequest, PortfolioEntry, ProPage, ProView, UpdateProRequest,
};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Profile routes; upload routes accept bodies up to `max_upload_bytes`.
pub fn routes(max_upload_bytes: usize) -> Router<Arc<AppState>> {
    let uploads = Router::new()
        .route("/api/pros/{id}/avatar", post(upload_avatar))
        .route("/api/pros/{id}/portfolio", post(add_portfolio_image))
        .layer(DefaultBodyLimit::max(max_upload_bytes));

    Router::new()
        .route("/api/pros", post(create_pro))
        .route("/api/pros/{id}", get(get_pro).put(update_pro))
        .route(
            "/api/pros/{id}/portfolio/{item_id}",
            delete(delete_portfolio_item),
        )
        .merge(uploads)
}

async fn create_pro(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateProRequest>,
) -> Result<(StatusCode, Json<ProView>)> {
    let pro = pro_profile::create_pro(state.db.as_ref(), &user.identity, &body).await?;
    Ok((StatusCode::CREATED, Json(ProView::from(&pro))))
}

async fn get_pro(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ProPage>> {
    let page = pro_profile::load_page(state.db.as_ref(), &id, user.uid()).await?;
    Ok(Json(page))
}

async fn update_pro(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<UpdateProRequest>,
) -> Result<Json<ProView>> {
    let pro = pro_profile::update_pro(state.db.as_ref(), user.uid(), &id, &body).await?;
    Ok(Json(ProView::from(&pro)))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AvatarResponse {
    pub photo_url: String,
}

fn content_type(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
}

/// Raw image bytes in the body, type in `Content-Type`.
async fn upload_avatar(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<AvatarResponse>> {
    let content_type = check_image(
        content_type(&headers),
        body.len(),
        state.config.max_upload_bytes,
    )?;

    let photo_url = pro_profile::upload_avatar(
        state.db.as_ref(),
        state.blobs.as_ref(),
        user.uid(),
        &id,
        &content_type,
        body,
    )
    .await?;

    Ok(Json(AvatarResponse { photo_url }))
}

#[derive(Deserialize)]
struct PortfolioUploadQuery {
    /// Original file name; only its extension is used.
    filename: Option<String>,
}

async fn add_portfolio_image(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Query(query): Query<PortfolioUploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<PortfolioEntry>)> {
    let content_type = check_image(
        content_type(&headers),
        body.len(),
        state.config.max_upload_bytes,
    )?;

    let entry = pro_profile::add_portfolio_image(
        state.db.as_ref(),
        state.blobs.as_ref(),
        user.uid(),
        &id,
        query.filename.as_deref(),
        &content_type,
        body,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

async fn delete_portfolio_item(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((id, item_id)): Path<(String, String)>,
) -> Result<StatusCode> {
    pro_profile::delete_portfolio_image(state.db.as_ref(), user.uid(), &id, &item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
