// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Staff guards for `/api/admin/*`. Must run inside [`require_auth`].
//!
//! [`require_auth`]: crate::middleware::auth::require_auth

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::models::AppRole;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Caller that passed a staff guard, with the role it resolved to.
#[derive(Debug, Clone)]
pub struct StaffUser {
    pub uid: String,
    pub role: AppRole,
}

async fn guard(
    state: &AppState,
    request: &mut Request,
    allowed: fn(AppRole) -> bool,
    what: &str,
) -> Result<(), AppError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or(AppError::Unauthorized)?;

    let role = state
        .roles
        .resolve(state.db.as_ref(), user.uid(), user.email())
        .await?;

    if !allowed(role) {
        tracing::warn!(uid = %user.uid(), role = %role, guard = what, "Blocked staff request");
        return Err(AppError::Forbidden(format!("{what} requires a higher role")));
    }

    request.extensions_mut().insert(StaffUser {
        uid: user.uid().to_string(),
        role,
    });
    Ok(())
}

/// Founder, headmod, admin or moderator.
pub async fn require_panel_access(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    guard(&state, &mut request, AppRole::can_open_admin_panel, "admin panel").await?;
    Ok(next.run(request).await)
}

/// Founder or headmod.
pub async fn require_admin_manager(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    guard(&state, &mut request, AppRole::can_add_admin, "role management").await?;
    Ok(next.run(request).await)
}
