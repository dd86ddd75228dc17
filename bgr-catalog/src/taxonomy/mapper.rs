//! Source vocabulary → site vocabulary
//!
//! Unmapped categories and mechanics are dropped on purpose: the site shows a
//! curated taxonomy only. Publishers are never dropped; unknown names pass
//! through unchanged.

use super::tables::MappingTables;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Derived site-vocabulary attributes for one game
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaxonomyMapping {
    pub site_categories: BTreeSet<String>,
    pub site_mechanics: BTreeSet<String>,
    pub player_count_categories: BTreeSet<String>,
    pub normalized_publishers: Vec<String>,
}

/// Applies shared mapping tables to source terms
#[derive(Debug, Clone)]
pub struct TaxonomyMapper {
    tables: Arc<MappingTables>,
}

impl TaxonomyMapper {
    pub fn new(tables: Arc<MappingTables>) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &MappingTables {
        &self.tables
    }

    /// Map source terms and poll counts into site vocabulary
    pub fn map(
        &self,
        categories: &[String],
        mechanics: &[String],
        publishers: &[String],
        best_counts: &[u32],
        recommended_counts: &[u32],
    ) -> TaxonomyMapping {
        let mut mapping = TaxonomyMapping::default();

        // A single source term may land in both site sets
        for category in categories {
            if let Some(site) = self.tables.site_category_for_category(category) {
                mapping.site_categories.insert(site.to_string());
            }
            if let Some(site) = self.tables.site_mechanic_for_category(category) {
                mapping.site_mechanics.insert(site.to_string());
            }
        }

        for mechanic in mechanics {
            if let Some(site) = self.tables.site_category_for_mechanic(mechanic) {
                mapping.site_categories.insert(site.to_string());
            }
            if let Some(site) = self.tables.site_mechanic_for_mechanic(mechanic) {
                mapping.site_mechanics.insert(site.to_string());
            }
        }

        for count in best_counts.iter().chain(recommended_counts) {
            if let Some(site) = self.tables.site_category_for_player_count(*count) {
                mapping.player_count_categories.insert(site.to_string());
            }
        }

        mapping.normalized_publishers = publishers
            .iter()
            .map(|publisher| self.normalize_publisher(publisher))
            .collect();

        debug!(
            "Mapped {} categories / {} mechanics to {} site categories, {} site mechanics",
            categories.len(),
            mechanics.len(),
            mapping.site_categories.len(),
            mapping.site_mechanics.len()
        );

        mapping
    }

    /// Canonical name for a known publisher, else the input unchanged
    pub fn normalize_publisher(&self, publisher: &str) -> String {
        self.tables
            .canonical_publisher(publisher)
            .map(str::to_string)
            .unwrap_or_else(|| publisher.to_string())
    }
}
