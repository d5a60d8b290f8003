// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Provider discovery for a chosen category and city.

use crate::db::DirectoryStore;
use crate::error::AppError;
use crate::models::pro::{DEFAULT_COMPANY_NAME, DEFAULT_PRO_NAME, DEFAULT_RATING};
use crate::models::ProRecord;
use crate::services::catalog::{Category, City};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One provider card in the discovery results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProListing {
    pub id: String,
    pub company_name: String,
    pub display_name: String,
    pub city: String,
    pub category_id: String,
    pub rating: f64,
    pub reviews: u32,
    pub sponsored: bool,
}

fn non_empty_or(value: &Option<String>, fallback: &str) -> String {
    value
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

impl ProListing {
    fn from_record(record: &ProRecord, category: &Category, city: &City) -> Self {
        Self {
            id: record.id.clone(),
            company_name: non_empty_or(&record.company_name, DEFAULT_COMPANY_NAME),
            display_name: non_empty_or(&record.display_name, DEFAULT_PRO_NAME),
            city: non_empty_or(&record.city, &city.name),
            category_id: category.id.clone(),
            rating: record.rating.unwrap_or(DEFAULT_RATING),
            reviews: record.reviews.map(|n| n.max(0.0) as u32).unwrap_or(0),
            sponsored: record.is_sponsored,
        }
    }
}

/// Keep providers offering `category`, sponsored ones first.
///
/// The partition is stable: relative order within the sponsored and the
/// regular group is the order of `records`.
pub fn filter_and_rank(records: &[ProRecord], category: &Category, city: &City) -> Vec<ProListing> {
    let (sponsored, regular): (Vec<ProListing>, Vec<ProListing>) = records
        .iter()
        .filter(|r| r.professions.iter().any(|p| *p == category.name))
        .map(|r| ProListing::from_record(r, category, city))
        .partition(|l| l.sponsored);

    let mut out = sponsored;
    out.extend(regular);
    out
}

/// Visible providers in `city` offering `category`.
pub async fn discover(
    db: &dyn DirectoryStore,
    category: &Category,
    city: &City,
) -> Result<Vec<ProListing>, AppError> {
    let records = db.visible_pros_in_city(&city.name).await?;
    let listings = filter_and_rank(&records, category, city);

    tracing::debug!(
        category = %category.id,
        city = %city.name,
        candidates = records.len(),
        matched = listings.len(),
        "Discovery query"
    );

    Ok(listings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category() -> Category {
        Category {
            id: "fayans".to_string(),
            name: "Fayans".to_string(),
            emoji: "🧩".to_string(),
            group: "Zemin • Fayans • Şap".to_string(),
        }
    }

    fn city() -> City {
        City {
            plate: "35".to_string(),
            name: "İzmir".to_string(),
        }
    }

    fn pro(id: &str, sponsored: bool, professions: &[&str]) -> ProRecord {
        ProRecord {
            id: id.to_string(),
            is_sponsored: sponsored,
            professions: professions.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_sponsored_first_stable() {
        let records = vec![
            pro("a", false, &["Fayans"]),
            pro("b", true, &["Fayans"]),
            pro("c", false, &["Fayans", "Sıva"]),
            pro("d", true, &["Seramik", "Fayans"]),
            pro("e", false, &["Sıva"]),
        ];

        let ids: Vec<_> = filter_and_rank(&records, &category(), &city())
            .into_iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(ids, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_profession_match_is_exact() {
        let records = vec![pro("a", false, &["fayans"]), pro("b", false, &["Fayans "])];
        assert!(filter_and_rank(&records, &category(), &city()).is_empty());
    }

    #[test]
    fn test_listing_fallbacks() {
        let mut record = pro("x", false, &["Fayans"]);
        record.company_name = Some(String::new());

        let listing = &filter_and_rank(&[record], &category(), &city())[0];
        assert_eq!(listing.company_name, DEFAULT_COMPANY_NAME);
        assert_eq!(listing.display_name, DEFAULT_PRO_NAME);
        assert_eq!(listing.city, "İzmir");
        assert_eq!(listing.rating, DEFAULT_RATING);
        assert_eq!(listing.reviews, 0);
        assert_eq!(listing.category_id, "fayans");
    }

    #[test]
    fn test_listing_uses_stored_values() {
        let mut record = pro("x", true, &["Fayans"]);
        record.company_name = Some("Ege Yapı".to_string());
        record.display_name = Some("Mehmet Usta".to_string());
        record.city = Some("Manisa".to_string());
        record.rating = Some(4.2);
        record.reviews = Some(17.0);

        let listing = &filter_and_rank(&[record], &category(), &city())[0];
        assert_eq!(listing.company_name, "Ege Yapı");
        assert_eq!(listing.display_name, "Mehmet Usta");
        assert_eq!(listing.city, "Manisa");
        assert_eq!(listing.rating, 4.2);
        assert_eq!(listing.reviews, 17);
        assert!(listing.sponsored);
    }
}
