// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session context for the signed-in caller.

use crate::db::DirectoryStore;
use crate::error::Result;
use crate::models::user::DEFAULT_USER_NAME;
use crate::models::{AccountType, AppRole, UserPatch};
use crate::services::firebase_auth::VerifiedIdentity;
use crate::services::roles::RoleService;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// What the client needs to render navigation for the caller.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionContext {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: String,
    pub photo_url: Option<String>,
    pub role: AppRole,
    pub account_type: AccountType,
    pub pro_id: Option<String>,
    pub can_open_admin_panel: bool,
    pub can_add_admin: bool,
}

/// Build the caller's session context.
///
/// A pro found through `ownerUid` but missing from the user document is
/// written back as `{accountType: pro, proId}`; that write may fail without
/// failing the request. So may the user read, which then resolves as a
/// plain user.
pub async fn load_session(
    db: &dyn DirectoryStore,
    roles: &RoleService,
    identity: &VerifiedIdentity,
) -> Result<SessionContext> {
    let uid = identity.uid.as_str();
    let email = identity.email.as_deref();

    // An unreadable user document is treated as missing; the owner lookup
    // below can still find the caller's pro.
    let record = match db.get_user(uid).await {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!(uid, error = %e, "User lookup failed, using defaults");
            None
        }
    };
    let role = roles.resolve_for_record(db, uid, email, record.as_ref()).await;

    let stored_pro_id = record
        .as_ref()
        .and_then(|r| r.pro_id.clone())
        .filter(|id| !id.is_empty());

    let pro_id = match stored_pro_id.clone() {
        Some(id) => Some(id),
        None => match db.find_pro_by_owner(uid).await {
            Ok(pro) => pro.map(|p| p.id),
            Err(e) => {
                tracing::warn!(uid, error = %e, "Pro lookup by owner failed");
                None
            }
        },
    };

    let stored_account_type = record
        .as_ref()
        .map(|r| r.stored_account_type())
        .unwrap_or(AccountType::User);

    if let Some(id) = &pro_id {
        if stored_pro_id.is_none() || stored_account_type != AccountType::Pro {
            let patch = UserPatch {
                account_type: Some(AccountType::Pro),
                pro_id: Some(id.clone()),
                ..Default::default()
            };
            match db.merge_user(uid, &patch).await {
                Ok(()) => tracing::info!(uid, pro_id = %id, "Linked user to pro profile"),
                Err(e) => tracing::warn!(uid, error = %e, "Failed to link user to pro profile"),
            }
        }
    }

    let display_name = record
        .as_ref()
        .and_then(|r| r.display_name.clone())
        .filter(|n| !n.is_empty())
        .or_else(|| identity.display_name.clone())
        .unwrap_or_else(|| DEFAULT_USER_NAME.to_string());

    Ok(SessionContext {
        uid: uid.to_string(),
        email: identity.email.clone(),
        display_name,
        photo_url: identity.photo_url.clone(),
        role,
        account_type: if pro_id.is_some() {
            AccountType::Pro
        } else {
            stored_account_type
        },
        pro_id,
        can_open_admin_panel: role.can_open_admin_panel(),
        can_add_admin: role.can_add_admin(),
    })
}
