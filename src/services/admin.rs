// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Staff operations: role and support assignment, pro moderation.

use crate::db::DirectoryStore;
use crate::error::{AppError, Result};
use crate::models::{AppRole, ProPatch, ProRecord, SupportLevel, TargetRole, UserPatch};
use crate::services::user_search::UserSummary;
use crate::time_utils::now_rfc3339;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Panel module as listed on the admin overview.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AdminModule {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub available: bool,
}

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AdminOverview {
    pub role: AppRole,
    pub can_add_admin: bool,
    pub modules: Vec<AdminModule>,
}

/// Overview of the panel for a caller who may open it.
pub fn overview(role: AppRole) -> AdminOverview {
    let can_add_admin = role.can_add_admin();
    AdminOverview {
        role,
        can_add_admin,
        modules: vec![
            AdminModule {
                key: "pros",
                title: "Pro / Şirket Yönetimi",
                description: "Profilleri listele, görünürlük/soft delete yönet.",
                available: true,
            },
            AdminModule {
                key: "roles",
                title: "Roller & Yetkiler",
                description: "Admin/Mod rol yönetimi (sadece yetkili).",
                available: can_add_admin,
            },
        ],
    }
}

/// Create `users/{uid}` with defaults when it does not exist yet.
pub async fn ensure_user_doc(db: &dyn DirectoryStore, uid: &str) -> Result<()> {
    if db.get_user(uid).await?.is_none() {
        db.merge_user(uid, &UserPatch::new_user_defaults(&now_rfc3339()))
            .await?;
        tracing::info!(uid, "Created user document");
    }
    Ok(())
}

async fn summary(db: &dyn DirectoryStore, uid: &str) -> Result<UserSummary> {
    let record = db
        .get_user(uid)
        .await?
        .ok_or_else(|| AppError::Database(format!("user {uid} missing after write")))?;
    Ok(UserSummary::from(&record))
}

/// Grant a staff role.
pub async fn assign_role(
    db: &dyn DirectoryStore,
    actor_uid: &str,
    uid: &str,
    target: TargetRole,
) -> Result<UserSummary> {
    ensure_user_doc(db, uid).await?;

    let role = AppRole::from(target);
    let patch = UserPatch {
        role: Some(role),
        updated_at: Some(now_rfc3339()),
        ..Default::default()
    };
    db.merge_user(uid, &patch).await?;

    tracing::info!(actor = actor_uid, uid, role = %role, "Assigned role");
    summary(db, uid).await
}

/// Set the live-support flag; the level is kept only for agents.
pub async fn set_support(
    db: &dyn DirectoryStore,
    actor_uid: &str,
    uid: &str,
    agent: bool,
    level: SupportLevel,
) -> Result<UserSummary> {
    ensure_user_doc(db, uid).await?;

    let patch = UserPatch {
        support_agent: Some(agent),
        support_level: Some(agent.then_some(level)),
        support_updated_at: Some(now_rfc3339()),
        ..Default::default()
    };
    db.merge_user(uid, &patch).await?;

    tracing::info!(actor = actor_uid, uid, agent, level = ?level, "Updated support settings");
    summary(db, uid).await
}

async fn existing_pro(db: &dyn DirectoryStore, pro_id: &str) -> Result<ProRecord> {
    db.get_pro(pro_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("pro {pro_id}")))
}

/// Show or hide a pro, optionally changing sponsorship.
pub async fn set_visibility(
    db: &dyn DirectoryStore,
    actor_uid: &str,
    pro_id: &str,
    is_visible: bool,
    is_sponsored: Option<bool>,
) -> Result<ProRecord> {
    existing_pro(db, pro_id).await?;

    let patch = ProPatch {
        is_visible: Some(is_visible),
        is_sponsored,
        updated_at: Some(now_rfc3339()),
        ..Default::default()
    };
    db.merge_pro(pro_id, &patch).await?;

    tracing::info!(actor = actor_uid, pro_id, is_visible, is_sponsored = ?is_sponsored, "Changed pro visibility");
    existing_pro(db, pro_id).await
}

/// Hide a pro and mark it deleted; the document itself is kept.
pub async fn soft_delete_pro(
    db: &dyn DirectoryStore,
    actor_uid: &str,
    pro_id: &str,
    note: Option<String>,
) -> Result<ProRecord> {
    existing_pro(db, pro_id).await?;

    let now = now_rfc3339();
    let patch = ProPatch {
        is_deleted: Some(true),
        is_visible: Some(false),
        deleted_at: Some(now.clone()),
        deleted_by: Some(actor_uid.to_string()),
        admin_note: note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
        updated_at: Some(now),
        ..Default::default()
    };
    db.merge_pro(pro_id, &patch).await?;

    tracing::info!(actor = actor_uid, pro_id, "Soft-deleted pro");
    existing_pro(db, pro_id).await
}
