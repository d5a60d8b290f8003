// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session cookie routes.
//!
//! The browser signs in with Firebase and hands the resulting ID token to
//! `/auth/session`, which checks it and stores it in an HTTP-only cookie.

use crate::error::Result;
use crate::middleware::auth::SESSION_COOKIE;
use crate::AppState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// ID tokens live for an hour; the cookie does not outlive them.
const SESSION_MAX_AGE_SECS: i64 = 60 * 60;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/session", post(create_session))
        .route("/auth/logout", post(logout))
}

#[derive(Deserialize)]
pub struct SessionRequest {
    id_token: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    pub uid: String,
    pub email: Option<String>,
}

fn session_cookie(value: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

/// Verify an ID token and start a cookie session.
async fn create_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<SessionRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let identity = state
        .token_verifier
        .verify_id_token(body.id_token.trim())
        .await?;

    tracing::info!(uid = %identity.uid, "Started session");

    let jar = jar.add(session_cookie(body.id_token.trim().to_string(), SESSION_MAX_AGE_SECS));
    Ok((
        jar,
        Json(SessionResponse {
            uid: identity.uid,
            email: identity.email,
        }),
    ))
}

/// Clear the session cookie.
///
/// The expired cookie is always sent, even when the request carried none,
/// so a browser holding a stale session drops it.
async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    (
        jar.add(session_cookie(String::new(), 0)),
        StatusCode::NO_CONTENT,
    )
}
