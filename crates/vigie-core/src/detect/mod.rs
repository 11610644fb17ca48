pub mod additives;
pub mod markers;

use crate::model::Product;
use crate::tables::TableSet;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Keyword markers and additive codes found in a product's ingredient text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    /// Marker group -> keywords of that group found in the text.
    pub markers: BTreeMap<String, BTreeSet<String>>,
    /// Canonical additive codes, first occurrence order.
    pub additive_codes: Vec<String>,
    /// Number of distinct additive codes, whether or not the table knows them.
    pub raw_additive_count: usize,
}

impl DetectionReport {
    /// All matched keywords across groups.
    pub fn matched_markers(&self) -> BTreeSet<&str> {
        self.markers
            .values()
            .flatten()
            .map(String::as_str)
            .collect()
    }

    pub fn has_group(&self, group: &str) -> bool {
        self.markers.contains_key(group)
    }

    pub fn group(&self, group: &str) -> Option<&BTreeSet<String>> {
        self.markers.get(group)
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty() && self.additive_codes.is_empty()
    }
}

/// Scan the full ingredient text for the category's marker keywords and
/// for additive codes.
///
/// Matching is plain lowercase substring containment. Finding nothing is a
/// valid outcome.
pub fn detect(product: &Product, tables: &TableSet) -> DetectionReport {
    let text = product.raw_text.to_lowercase();

    let mut markers: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for group in tables.markers.groups(product.category) {
        let found: BTreeSet<String> = group
            .keywords
            .iter()
            .filter(|kw| text.contains(kw.as_str()))
            .cloned()
            .collect();
        if !found.is_empty() {
            markers
                .entry(group.group.clone())
                .or_default()
                .extend(found);
        }
    }

    let additive_codes = additives::extract_additive_codes(&text);
    let raw_additive_count = additive_codes.len();

    debug!(
        category = %product.category,
        groups = markers.len(),
        additives = raw_additive_count,
        "detection done"
    );

    DetectionReport {
        markers,
        additive_codes,
        raw_additive_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, ProductInput};
    use crate::parsing::prepare_product;

    fn report(category: Category, text: &str) -> DetectionReport {
        let input = ProductInput::new("t", category).with_ingredients_text(text);
        let product = prepare_product(&input).unwrap();
        detect(&product, &TableSet::builtin())
    }

    #[test]
    fn test_food_groups_detected() {
        let r = report(Category::Food, "Sirop de glucose, huile de palme, sel");
        assert!(r.has_group("ultra_processing"));
        assert!(r.has_group("processed"));
        assert!(r.has_group("culinary"));
        assert!(r.matched_markers().contains("sirop de glucose"));
    }

    #[test]
    fn test_category_scoping() {
        let r = report(Category::Cosmetics, "Aqua, Sirop de glucose, Parfum");
        assert!(!r.has_group("ultra_processing"));
        assert!(r.group("fragrance").unwrap().contains("parfum"));
    }

    #[test]
    fn test_additives_counted_without_table() {
        let r = report(Category::Food, "eau, E102, e999, en:e330, E102");
        assert_eq!(r.additive_codes, vec!["E102", "E999", "E330"]);
        assert_eq!(r.raw_additive_count, 3);
    }

    #[test]
    fn test_nothing_found_is_valid() {
        let r = report(Category::Food, "pommes");
        assert!(r.is_empty());
        assert_eq!(r.raw_additive_count, 0);
    }
}
