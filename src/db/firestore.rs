// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper implementing [`DirectoryStore`].
//!
//! Collections:
//! - `users/{uid}`
//! - `pros/{id}` with `portfolio` and `reviews` sub-collections

use crate::db::{collections, patch_fields, DirectoryStore, UserSearchField};
use crate::error::AppError;
use crate::models::{PortfolioItem, ProPatch, ProRecord, Review, UserPatch, UserRecord};
use async_trait::async_trait;
use firestore::FirestoreQueryDirection;
use serde::{Deserialize, Serialize};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

fn db_err(e: impl std::fmt::Display) -> AppError {
    AppError::Database(e.to_string())
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // Emulator connections skip credential lookup entirely.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create an offline client; every operation returns a database error.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    /// Merge the set fields of `patch` into a top-level document.
    ///
    /// Only the patch's keys go into the update mask, so fields written by
    /// other clients survive. A missing document is created.
    async fn merge_doc<P>(&self, collection: &str, id: &str, patch: &P) -> Result<(), AppError>
    where
        P: Serialize + for<'de> Deserialize<'de> + Sync + Send,
    {
        let fields = patch_fields(patch)?;
        if fields.is_empty() {
            return Ok(());
        }

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(fields)
            .in_col(collection)
            .document_id(id)
            .object(patch)
            .execute()
            .await
            .map_err(db_err)?;
        Ok(())
    }

    fn pro_parent(&self, pro_id: &str) -> Result<firestore::ParentPathBuilder, AppError> {
        self.get_client()?
            .parent_path(collections::PROS, pro_id)
            .map_err(db_err)
    }
}

#[async_trait]
impl DirectoryStore for FirestoreDb {
    // ─── Users ───────────────────────────────────────────────────

    async fn get_user(&self, uid: &str) -> Result<Option<UserRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(uid)
            .await
            .map_err(db_err)
    }

    async fn merge_user(&self, uid: &str, patch: &UserPatch) -> Result<(), AppError> {
        self.merge_doc(collections::USERS, uid, patch).await
    }

    async fn find_users(
        &self,
        field: UserSearchField,
        value: &str,
        limit: u32,
    ) -> Result<Vec<UserRecord>, AppError> {
        let name = field.field_name();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(|q| q.for_all([q.field(name).eq(value)]))
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(db_err)
    }

    // ─── Pros ────────────────────────────────────────────────────

    async fn get_pro(&self, id: &str) -> Result<Option<ProRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PROS)
            .obj()
            .one(id)
            .await
            .map_err(db_err)
    }

    async fn merge_pro(&self, id: &str, patch: &ProPatch) -> Result<(), AppError> {
        self.merge_doc(collections::PROS, id, patch).await
    }

    async fn find_pro_by_owner(&self, owner_uid: &str) -> Result<Option<ProRecord>, AppError> {
        let found: Vec<ProRecord> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::PROS)
            .filter(|q| q.for_all([q.field("ownerUid").eq(owner_uid)]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(db_err)?;
        Ok(found.into_iter().next())
    }

    async fn visible_pros_in_city(&self, city: &str) -> Result<Vec<ProRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::PROS)
            .filter(|q| {
                q.for_all([
                    q.field("isVisible").eq(true),
                    q.field("cities").array_contains(city),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(db_err)
    }

    // ─── Portfolio & Reviews ─────────────────────────────────────

    async fn list_portfolio(
        &self,
        pro_id: &str,
        limit: u32,
    ) -> Result<Vec<PortfolioItem>, AppError> {
        let parent = self.pro_parent(pro_id)?;
        self.get_client()?
            .fluent()
            .select()
            .from(collections::PORTFOLIO)
            .parent(&parent)
            .order_by([("createdAt", FirestoreQueryDirection::Descending)])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(db_err)
    }

    async fn add_portfolio_item(
        &self,
        pro_id: &str,
        item: &PortfolioItem,
    ) -> Result<(), AppError> {
        let parent = self.pro_parent(pro_id)?;
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::PORTFOLIO)
            .document_id(&item.id)
            .parent(&parent)
            .object(item)
            .execute()
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn delete_portfolio_item(&self, pro_id: &str, item_id: &str) -> Result<(), AppError> {
        let parent = self.pro_parent(pro_id)?;
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::PORTFOLIO)
            .document_id(item_id)
            .parent(&parent)
            .execute()
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn list_reviews(&self, pro_id: &str, limit: u32) -> Result<Vec<Review>, AppError> {
        let parent = self.pro_parent(pro_id)?;
        self.get_client()?
            .fluent()
            .select()
            .from(collections::REVIEWS)
            .parent(&parent)
            .order_by([("createdAt", FirestoreQueryDirection::Descending)])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(db_err)
    }
}
