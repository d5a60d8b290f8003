// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process document store used for local runs and tests.
//!
//! Documents are kept as JSON objects per collection path, so records written
//! by other clients (with extra or oddly typed fields) can be seeded as-is
//! and decode through the same tolerant models as Firestore documents.

use crate::db::{collections, patch_fields, DirectoryStore, UserSearchField};
use crate::error::AppError;
use crate::models::{PortfolioItem, ProPatch, ProRecord, Review, UserPatch, UserRecord};
use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

type Document = Map<String, Value>;

/// Collection path ("users", "pros/abc/portfolio") -> document ID -> fields.
#[derive(Default)]
pub struct MemoryDb {
    collections: DashMap<String, BTreeMap<String, Document>>,
    failing_fields: DashSet<UserSearchField>,
    failing_docs: DashSet<(String, String)>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw document, replacing any existing one.
    pub fn insert_raw(&self, collection: &str, id: &str, doc: Value) {
        let doc = match doc {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), doc);
    }

    pub fn seed_user(&self, uid: &str, doc: Value) {
        self.insert_raw(collections::USERS, uid, doc);
    }

    pub fn seed_pro(&self, id: &str, doc: Value) {
        self.insert_raw(collections::PROS, id, doc);
    }

    pub fn seed_review(&self, pro_id: &str, review_id: &str, doc: Value) {
        self.insert_raw(&sub_path(pro_id, collections::REVIEWS), review_id, doc);
    }

    pub fn seed_portfolio(&self, pro_id: &str, item_id: &str, doc: Value) {
        self.insert_raw(&sub_path(pro_id, collections::PORTFOLIO), item_id, doc);
    }

    /// Raw stored document, for assertions on exactly what was written.
    pub fn raw(&self, collection: &str, id: &str) -> Option<Value> {
        self.collections
            .get(collection)
            .and_then(|docs| docs.get(id).cloned())
            .map(Value::Object)
    }

    /// Make every user query on `field` fail, like a missing index would.
    pub fn fail_queries_on(&self, field: UserSearchField) {
        self.failing_fields.insert(field);
    }

    /// Make reads of one document fail, like a permission error would.
    pub fn fail_reads_of(&self, collection: &str, id: &str) {
        self.failing_docs
            .insert((collection.to_string(), id.to_string()));
    }

    fn get_doc<T: DeserializeOwned>(&self, collection: &str, id: &str) -> Result<Option<T>, AppError> {
        if self
            .failing_docs
            .contains(&(collection.to_string(), id.to_string()))
        {
            return Err(AppError::Database(format!(
                "read of {collection}/{id} denied"
            )));
        }
        let doc = self
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id).cloned());
        doc.map(|doc| decode(id, doc)).transpose()
    }

    fn merge<P: Serialize>(&self, collection: &str, id: &str, patch: &P) -> Result<(), AppError> {
        if patch_fields(patch)?.is_empty() {
            return Ok(());
        }
        let fields = match serde_json::to_value(patch) {
            Ok(Value::Object(map)) => map,
            _ => return Err(AppError::Database("patch is not an object".to_string())),
        };

        let mut docs = self.collections.entry(collection.to_string()).or_default();
        let doc = docs.entry(id.to_string()).or_default();
        for (key, value) in fields {
            doc.insert(key, value);
        }
        Ok(())
    }

    /// Documents matching `pred`, in document ID order.
    fn query<T: DeserializeOwned>(
        &self,
        collection: &str,
        pred: impl Fn(&Document) -> bool,
        limit: Option<usize>,
    ) -> Result<Vec<T>, AppError> {
        let Some(docs) = self.collections.get(collection) else {
            return Ok(Vec::new());
        };
        docs.iter()
            .filter(|(_, doc)| pred(doc))
            .take(limit.unwrap_or(usize::MAX))
            .map(|(id, doc)| decode(id, doc.clone()))
            .collect()
    }

    /// Newest first by `createdAt`; documents without it are not returned.
    fn newest_first<T: DeserializeOwned>(
        &self,
        collection: &str,
        limit: u32,
    ) -> Result<Vec<T>, AppError> {
        let Some(docs) = self.collections.get(collection) else {
            return Ok(Vec::new());
        };
        let mut dated: Vec<(&str, &String, &Document)> = docs
            .iter()
            .filter_map(|(id, doc)| match doc.get("createdAt") {
                Some(Value::String(at)) => Some((at.as_str(), id, doc)),
                _ => None,
            })
            .collect();
        dated.sort_by(|a, b| b.0.cmp(a.0).then_with(|| b.1.cmp(a.1)));
        dated
            .into_iter()
            .take(limit as usize)
            .map(|(_, id, doc)| decode(id, doc.clone()))
            .collect()
    }
}

fn sub_path(pro_id: &str, sub: &str) -> String {
    format!("{}/{}/{}", collections::PROS, pro_id, sub)
}

fn decode<T: DeserializeOwned>(id: &str, mut doc: Document) -> Result<T, AppError> {
    doc.insert("_firestore_id".to_string(), Value::String(id.to_string()));
    serde_json::from_value(Value::Object(doc))
        .map_err(|e| AppError::Database(format!("failed to decode document {id}: {e}")))
}

#[async_trait]
impl DirectoryStore for MemoryDb {
    async fn get_user(&self, uid: &str) -> Result<Option<UserRecord>, AppError> {
        self.get_doc(collections::USERS, uid)
    }

    async fn merge_user(&self, uid: &str, patch: &UserPatch) -> Result<(), AppError> {
        self.merge(collections::USERS, uid, patch)
    }

    async fn find_users(
        &self,
        field: UserSearchField,
        value: &str,
        limit: u32,
    ) -> Result<Vec<UserRecord>, AppError> {
        if self.failing_fields.contains(&field) {
            return Err(AppError::Database(format!(
                "query on {} is not available",
                field.field_name()
            )));
        }
        let name = field.field_name();
        self.query(
            collections::USERS,
            |doc| matches!(doc.get(name), Some(Value::String(s)) if s == value),
            Some(limit as usize),
        )
    }

    async fn get_pro(&self, id: &str) -> Result<Option<ProRecord>, AppError> {
        self.get_doc(collections::PROS, id)
    }

    async fn merge_pro(&self, id: &str, patch: &ProPatch) -> Result<(), AppError> {
        self.merge(collections::PROS, id, patch)
    }

    async fn find_pro_by_owner(&self, owner_uid: &str) -> Result<Option<ProRecord>, AppError> {
        let mut found: Vec<ProRecord> = self.query(
            collections::PROS,
            |doc| matches!(doc.get("ownerUid"), Some(Value::String(s)) if s == owner_uid),
            Some(1),
        )?;
        Ok(found.pop())
    }

    async fn visible_pros_in_city(&self, city: &str) -> Result<Vec<ProRecord>, AppError> {
        self.query(
            collections::PROS,
            |doc| {
                doc.get("isVisible") == Some(&Value::Bool(true))
                    && matches!(doc.get("cities"), Some(Value::Array(list))
                        if list.iter().any(|c| c.as_str() == Some(city)))
            },
            None,
        )
    }

    async fn list_portfolio(
        &self,
        pro_id: &str,
        limit: u32,
    ) -> Result<Vec<PortfolioItem>, AppError> {
        self.newest_first(&sub_path(pro_id, collections::PORTFOLIO), limit)
    }

    async fn add_portfolio_item(
        &self,
        pro_id: &str,
        item: &PortfolioItem,
    ) -> Result<(), AppError> {
        self.merge(&sub_path(pro_id, collections::PORTFOLIO), &item.id, item)
    }

    async fn delete_portfolio_item(&self, pro_id: &str, item_id: &str) -> Result<(), AppError> {
        if let Some(mut docs) = self
            .collections
            .get_mut(&sub_path(pro_id, collections::PORTFOLIO))
        {
            docs.remove(item_id);
        }
        Ok(())
    }

    async fn list_reviews(&self, pro_id: &str, limit: u32) -> Result<Vec<Review>, AppError> {
        self.newest_first(&sub_path(pro_id, collections::REVIEWS), limit)
    }
}
