// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Provider discovery.

use crate::error::{AppError, Result};
use crate::services::catalog::{Category, City};
use crate::services::discovery::{discover, ProListing};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/discover", get(get_discover))
}

#[derive(Deserialize)]
struct DiscoverQuery {
    /// Category id or exact name.
    #[serde(default)]
    category: String,
    /// City name or plate code.
    #[serde(default)]
    city: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DiscoverResponse {
    pub category: Category,
    pub city: City,
    pub results: Vec<ProListing>,
}

async fn get_discover(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DiscoverQuery>,
) -> Result<Json<DiscoverResponse>> {
    let category = state
        .catalog
        .find_category(&query.category)
        .ok_or_else(|| AppError::BadRequest(format!("unknown category '{}'", query.category)))?;
    let city = state
        .catalog
        .find_city(&query.city)
        .ok_or_else(|| AppError::BadRequest(format!("unknown city '{}'", query.city)))?;

    let results = discover(state.db.as_ref(), category, city).await?;

    Ok(Json(DiscoverResponse {
        category: category.clone(),
        city: city.clone(),
        results,
    }))
}
