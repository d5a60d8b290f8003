// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public catalog routes.

use crate::services::catalog::{CategoryGroup, City};
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// The catalog only changes with a deploy.
const CATALOG_CACHE_CONTROL: &str = "public, max-age=3600";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/catalog/categories", get(get_categories))
        .route("/api/catalog/cities", get(get_cities))
}

#[derive(Deserialize)]
struct CategoriesQuery {
    #[serde(default)]
    q: String,
    group: Option<String>,
    /// Fold Turkish letters to ASCII and match group names too.
    #[serde(default)]
    fold: bool,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CategoriesResponse {
    /// Every group name, for the filter chips.
    pub groups: Vec<String>,
    pub results: Vec<CategoryGroup>,
}

async fn get_categories(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CategoriesQuery>,
) -> impl IntoResponse {
    let results = state
        .catalog
        .search_categories(&query.q, query.group.as_deref(), query.fold);

    (
        [(header::CACHE_CONTROL, CATALOG_CACHE_CONTROL)],
        Json(CategoriesResponse {
            groups: state.catalog.groups().into_iter().map(str::to_string).collect(),
            results,
        }),
    )
}

#[derive(Deserialize)]
struct CitiesQuery {
    #[serde(default)]
    q: String,
}

async fn get_cities(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CitiesQuery>,
) -> impl IntoResponse {
    let cities: Vec<City> = state
        .catalog
        .search_cities(&query.q)
        .into_iter()
        .cloned()
        .collect();

    ([(header::CACHE_CONTROL, CATALOG_CACHE_CONTROL)], Json(cities))
}
