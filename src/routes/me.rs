// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Current caller.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::services::session::{load_session, SessionContext};
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/me", get(get_me))
}

async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SessionContext>> {
    let context = load_session(state.db.as_ref(), &state.roles, &user.identity).await?;
    Ok(Json(context))
}
