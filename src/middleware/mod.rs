// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (authentication, staff guards, security headers).

pub mod admin;
pub mod auth;
pub mod security;

pub use admin::{require_admin_manager, require_panel_access, StaffUser};
pub use auth::{require_auth, AuthUser};
