// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Privilege tiers and the permission predicates derived from them.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Privilege tier stored in `users/{uid}.role`, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum AppRole {
    Founder,
    Headmod,
    Admin,
    Moderator,
    User,
}

impl AppRole {
    pub const ALL: [AppRole; 5] = [
        AppRole::Founder,
        AppRole::Headmod,
        AppRole::Admin,
        AppRole::Moderator,
        AppRole::User,
    ];

    /// Parse a stored role value. Anything unrecognized is the lowest tier.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("founder") => AppRole::Founder,
            Some("headmod") => AppRole::Headmod,
            Some("admin") => AppRole::Admin,
            Some("moderator") => AppRole::Moderator,
            _ => AppRole::User,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AppRole::Founder => "founder",
            AppRole::Headmod => "headmod",
            AppRole::Admin => "admin",
            AppRole::Moderator => "moderator",
            AppRole::User => "user",
        }
    }

    /// Who may enter the admin panel.
    pub fn can_open_admin_panel(self) -> bool {
        matches!(
            self,
            AppRole::Founder | AppRole::Headmod | AppRole::Admin | AppRole::Moderator
        )
    }

    /// Who may grant staff roles to other users.
    pub fn can_add_admin(self) -> bool {
        matches!(self, AppRole::Founder | AppRole::Headmod)
    }
}

impl std::fmt::Display for AppRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roles that can be granted through the admin tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum TargetRole {
    Moderator,
    Headmod,
    Admin,
}

impl From<TargetRole> for AppRole {
    fn from(role: TargetRole) -> Self {
        match role {
            TargetRole::Moderator => AppRole::Moderator,
            TargetRole::Headmod => AppRole::Headmod,
            TargetRole::Admin => AppRole::Admin,
        }
    }
}
