use super::TableSet;
use std::path::Path;
use std::sync::{Arc, LazyLock};

const MARKERS_JSON: &str = include_str!("../../../../rules/markers.json");
const ADDITIVES_JSON: &str = include_str!("../../../../rules/additives.json");
const ALLERGENS_JSON: &str = include_str!("../../../../rules/allergens.json");
const COSMETICS_JSON: &str = include_str!("../../../../rules/cosmetics.json");
const DETERGENTS_JSON: &str = include_str!("../../../../rules/detergents.json");

static BUILTIN: LazyLock<Arc<TableSet>> = LazyLock::new(|| {
    let tables = TableSet::from_json(
        Path::new("<builtin>"),
        MARKERS_JSON,
        ADDITIVES_JSON,
        ALLERGENS_JSON,
        COSMETICS_JSON,
        DETERGENTS_JSON,
    )
    .expect("embedded rule tables are valid");
    Arc::new(tables)
});

/// The tables shipped with the crate, parsed once per process.
pub fn builtin_tables() -> Arc<TableSet> {
    Arc::clone(&BUILTIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, RiskTier};
    use crate::tables::schema::Evidence;

    #[test]
    fn test_builtin_tables_load() {
        let tables = builtin_tables();
        assert!(!tables.additives.additives.is_empty());
        assert!(!tables.allergens.food.is_empty());
        assert!(!tables.cosmetics.disruptors.is_empty());
        assert!(!tables.detergents.toxicants.is_empty());
    }

    #[test]
    fn test_food_marker_tiers_present() {
        let tables = builtin_tables();
        let floors: Vec<u8> = tables
            .markers
            .groups(Category::Food)
            .iter()
            .filter_map(|g| g.nova_floor)
            .collect();
        assert!(floors.contains(&4));
        assert!(floors.contains(&3));
        assert!(floors.contains(&2));
    }

    #[test]
    fn test_triclosan_is_confirmed() {
        let tables = builtin_tables();
        let triclosan = tables
            .cosmetics
            .disruptors
            .iter()
            .find(|d| d.name == "Triclosan")
            .unwrap();
        assert_eq!(triclosan.evidence, Evidence::Confirmed);
    }

    #[test]
    fn test_phosphates_weigh_three() {
        let tables = builtin_tables();
        let phosphates = tables
            .detergents
            .toxicants
            .iter()
            .find(|t| t.name == "Phosphates")
            .unwrap();
        assert_eq!(phosphates.weight, 3);
        assert!(tables
            .detergents
            .toxicants
            .iter()
            .filter(|t| t.name != "Phosphates")
            .all(|t| t.weight == 2));
    }

    #[test]
    fn test_lookup_e320() {
        let tables = builtin_tables();
        let bha = tables.lookup_additive("en:e320").unwrap();
        assert_eq!(bha.code, "E320");
        assert_eq!(bha.risk_tier, RiskTier::High);
    }

    #[test]
    fn test_builtin_is_shared() {
        assert!(Arc::ptr_eq(&builtin_tables(), &builtin_tables()));
    }
}
