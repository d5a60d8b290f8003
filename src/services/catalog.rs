// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Static catalog of provinces and service categories.

use crate::services::text::{normalize_tr, tr_lower};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Group filter value meaning "every group".
pub const ALL_GROUPS: &str = "Tümü";

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

/// Province with its licence plate code ("01".."81").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct City {
    pub plate: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub emoji: String,
    pub group: String,
}

/// Categories of one group, in catalog order.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CategoryGroup {
    pub group: String,
    pub categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    cities: Vec<City>,
    categories: Vec<Category>,
}

/// Errors that can occur while loading the catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to parse catalog: {0}")]
    Parse(String),
    #[error("Catalog is empty")]
    Empty,
}

/// Provinces and categories, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    cities: Vec<City>,
    categories: Vec<Category>,
}

impl Catalog {
    /// Catalog compiled into the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::load_from_json(BUILTIN_CATALOG)
    }

    pub fn load_from_json(json_data: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            serde_json::from_str(json_data).map_err(|e| CatalogError::Parse(e.to_string()))?;
        if file.cities.is_empty() || file.categories.is_empty() {
            return Err(CatalogError::Empty);
        }

        tracing::info!(
            cities = file.cities.len(),
            categories = file.categories.len(),
            "Loaded catalog"
        );
        Ok(Self {
            cities: file.cities,
            categories: file.categories,
        })
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Distinct group names in catalog order.
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for c in &self.categories {
            if !groups.contains(&c.group.as_str()) {
                groups.push(&c.group);
            }
        }
        groups
    }

    /// Cities whose plate or Turkish-lowercased name contains the query.
    pub fn search_cities(&self, query: &str) -> Vec<&City> {
        let q = tr_lower(query.trim());
        if q.is_empty() {
            return self.cities.iter().collect();
        }
        self.cities
            .iter()
            .filter(|c| c.plate.contains(&q) || tr_lower(&c.name).contains(&q))
            .collect()
    }

    /// Categories matching `query` within `group`, grouped in catalog order.
    ///
    /// With `fold`, both sides are folded to ASCII and the group name is
    /// searched as well, which is what the profession picker does.
    pub fn search_categories(
        &self,
        query: &str,
        group: Option<&str>,
        fold: bool,
    ) -> Vec<CategoryGroup> {
        let query = query.trim();
        let q = if fold {
            normalize_tr(query)
        } else {
            tr_lower(query)
        };
        let group = group.filter(|g| !g.is_empty() && *g != ALL_GROUPS);

        let mut out: Vec<CategoryGroup> = Vec::new();
        for c in &self.categories {
            if group.is_some_and(|g| c.group != g) {
                continue;
            }
            let matches = q.is_empty()
                || if fold {
                    normalize_tr(&c.name).contains(&q) || normalize_tr(&c.group).contains(&q)
                } else {
                    tr_lower(&c.name).contains(&q)
                };
            if !matches {
                continue;
            }
            match out.iter_mut().find(|g| g.group == c.group) {
                Some(g) => g.categories.push(c.clone()),
                None => out.push(CategoryGroup {
                    group: c.group.clone(),
                    categories: vec![c.clone()],
                }),
            }
        }
        out
    }

    /// Category by id or exact display name.
    pub fn find_category(&self, key: &str) -> Option<&Category> {
        let key = key.trim();
        self.categories
            .iter()
            .find(|c| c.id == key || c.name == key)
    }

    /// City by plate, exact name or Turkish-lowercased name.
    pub fn find_city(&self, key: &str) -> Option<&City> {
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        let lowered = tr_lower(key);
        self.cities
            .iter()
            .find(|c| c.plate == key || c.name == key || tr_lower(&c.name) == lowered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    #[test]
    fn test_builtin_catalog_sizes() {
        let c = catalog();
        assert_eq!(c.cities().len(), 81);
        assert_eq!(c.categories().len(), 67);
        assert_eq!(c.cities()[0].plate, "01");
        assert_eq!(c.cities()[80].name, "Düzce");
    }

    #[test]
    fn test_city_search_by_plate_and_name() {
        let c = catalog();
        let by_plate: Vec<_> = c.search_cities("35").iter().map(|c| c.name.as_str()).collect();
        assert_eq!(by_plate, vec!["İzmir"]);

        let by_name: Vec<_> = c.search_cities("IĞDIR").iter().map(|c| c.plate.as_str()).collect();
        assert_eq!(by_name, vec!["76"]);

        assert_eq!(c.search_cities("  ").len(), 81);
    }

    #[test]
    fn test_category_search_groups_in_catalog_order() {
        let c = catalog();
        let groups = c.search_categories("acil", None, false);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].group, "Acil Arıza (7/24)");
        assert_eq!(groups[0].categories.len(), 3);

        let all = c.search_categories("", Some(ALL_GROUPS), false);
        let total: usize = all.iter().map(|g| g.categories.len()).sum();
        assert_eq!(total, 67);
        assert_eq!(all[0].group, "Elektrik & Arıza");
    }

    #[test]
    fn test_category_group_filter() {
        let c = catalog();
        let groups = c.search_categories("", Some("Klima & Havalandırma"), false);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].categories.len(), 3);
    }

    #[test]
    fn test_folded_search_matches_ascii_input() {
        let c = catalog();
        let groups = c.search_categories("cati", None, true);
        let names: Vec<_> = groups
            .iter()
            .flat_map(|g| g.categories.iter().map(|c| c.name.as_str()))
            .collect();
        assert!(names.contains(&"Çatı Ustası"));
        // Unfolded search does not match the ASCII spelling.
        assert!(c
            .search_categories("cati", None, false)
            .iter()
            .all(|g| g.categories.iter().all(|c| c.name != "Çatı Ustası")));
    }

    #[test]
    fn test_find_category_and_city() {
        let c = catalog();
        assert_eq!(c.find_category("fayans").unwrap().name, "Fayans");
        assert_eq!(c.find_category("Kombi Servisi").unwrap().id, "kombi_servis");
        assert!(c.find_category("uzay_muhendisi").is_none());

        assert_eq!(c.find_city("06").unwrap().name, "Ankara");
        assert_eq!(c.find_city("istanbul").unwrap().plate, "34");
        assert!(c.find_city("Atlantis").is_none());
        assert!(c.find_city("").is_none());
    }

    #[test]
    fn test_groups_are_distinct() {
        let c = catalog();
        let groups = c.groups();
        assert_eq!(groups.len(), 13);
        assert_eq!(groups[0], "Elektrik & Arıza");
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let err = Catalog::load_from_json(r#"{"cities": [], "categories": []}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Empty));
    }
}
