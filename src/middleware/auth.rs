// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! ID token authentication middleware.

use crate::error::AppError;
use crate::services::firebase_auth::VerifiedIdentity;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// Cookie holding the ID token for browser sessions.
pub const SESSION_COOKIE: &str = "__session";

/// Authenticated caller, inserted into request extensions.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub identity: VerifiedIdentity,
}

impl AuthUser {
    pub fn uid(&self) -> &str {
        &self.identity.uid
    }

    pub fn email(&self) -> Option<&str> {
        self.identity.email.as_deref()
    }
}

/// Token from the session cookie, else from an `Authorization: Bearer` header.
pub fn extract_token(jar: &CookieJar, request: &Request) -> Option<String> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let value = cookie.value().trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }

    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Middleware that requires a valid ID token.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(&jar, &request).ok_or(AppError::Unauthorized)?;
    let identity = state.token_verifier.verify_id_token(&token).await?;

    request.extensions_mut().insert(AuthUser { identity });

    Ok(next.run(request).await)
}
