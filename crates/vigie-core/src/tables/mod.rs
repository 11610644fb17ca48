pub mod builtin;
pub mod schema;

use crate::detect::additives::canonical_code;
use crate::error::VigieError;
use crate::model::Category;
use schema::{
    AdditiveRecord, AdditiveTable, AllergenTable, CosmeticTable, DetergentTable, Keyworded,
    MarkerTable,
};
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::info;

pub const MARKERS_FILE: &str = "markers.json";
pub const ADDITIVES_FILE: &str = "additives.json";
pub const ALLERGENS_FILE: &str = "allergens.json";
pub const COSMETICS_FILE: &str = "cosmetics.json";
pub const DETERGENTS_FILE: &str = "detergents.json";

/// Every file a table directory must contain.
pub const TABLE_FILES: [&str; 5] = [
    MARKERS_FILE,
    ADDITIVES_FILE,
    ALLERGENS_FILE,
    COSMETICS_FILE,
    DETERGENTS_FILE,
];

/// The complete, validated set of lookup tables one analysis runs against.
#[derive(Debug, Clone)]
pub struct TableSet {
    pub markers: MarkerTable,
    pub additives: AdditiveTable,
    pub allergens: AllergenTable,
    pub cosmetics: CosmeticTable,
    pub detergents: DetergentTable,
}

impl TableSet {
    /// The tables embedded in the binary.
    pub fn builtin() -> Arc<TableSet> {
        builtin::builtin_tables()
    }

    /// Load and validate all five tables from a directory.
    pub fn load_dir(dir: &Path) -> Result<TableSet, VigieError> {
        let read = |file: &str| {
            let path = dir.join(file);
            std::fs::read_to_string(&path).map_err(|e| VigieError::TableLoad {
                path,
                reason: e.to_string(),
            })
        };

        let tables = TableSet::from_json(
            dir,
            &read(MARKERS_FILE)?,
            &read(ADDITIVES_FILE)?,
            &read(ALLERGENS_FILE)?,
            &read(COSMETICS_FILE)?,
            &read(DETERGENTS_FILE)?,
        )?;
        info!(dir = %dir.display(), version = %tables.version(), "loaded tables");
        Ok(tables)
    }

    pub(crate) fn from_json(
        dir: &Path,
        markers: &str,
        additives: &str,
        allergens: &str,
        cosmetics: &str,
        detergents: &str,
    ) -> Result<TableSet, VigieError> {
        let tables = TableSet {
            markers: parse_table(markers, &dir.join(MARKERS_FILE))?,
            additives: parse_table(additives, &dir.join(ADDITIVES_FILE))?,
            allergens: parse_table(allergens, &dir.join(ALLERGENS_FILE))?,
            cosmetics: parse_table(cosmetics, &dir.join(COSMETICS_FILE))?,
            detergents: parse_table(detergents, &dir.join(DETERGENTS_FILE))?,
        };
        tables.validate()?;
        Ok(tables)
    }

    /// Validate every table. A set that fails is never handed to an analysis.
    pub fn validate(&self) -> Result<(), VigieError> {
        validate_markers(&self.markers)?;
        validate_additives(&self.additives)?;
        validate_allergens(&self.allergens)?;
        validate_cosmetics(&self.cosmetics)?;
        validate_detergents(&self.detergents)?;
        Ok(())
    }

    /// Combined version string, e.g. `markers@2024.2,additives@2024.2,...`.
    pub fn version(&self) -> String {
        [
            ("markers", &self.markers.version),
            ("additives", &self.additives.version),
            ("allergens", &self.allergens.version),
            ("cosmetics", &self.cosmetics.version),
            ("detergents", &self.detergents.version),
        ]
        .iter()
        .map(|(name, version)| format!("{name}@{version}"))
        .collect::<Vec<_>>()
        .join(",")
    }

    /// Look up an additive by code. Accepts `e320`, `E320` and `en:e320`.
    pub fn lookup_additive(&self, code: &str) -> Option<&AdditiveRecord> {
        let code = canonical_code(code)?;
        self.additives.additives.iter().find(|a| a.code == code)
    }
}

/// Parse one table from JSON, attributing errors to its source path.
pub fn parse_table<T: DeserializeOwned>(json: &str, source: &Path) -> Result<T, VigieError> {
    serde_json::from_str(json).map_err(|e| VigieError::TableLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })
}

fn validate_version(table: &str, version: &str) -> Result<(), VigieError> {
    if version.trim().is_empty() {
        return Err(VigieError::TableInvalid(format!(
            "{table}: version must not be empty"
        )));
    }
    Ok(())
}

fn validate_keywords(table: &str, entry: &str, keywords: &[String]) -> Result<(), VigieError> {
    if keywords.is_empty() {
        return Err(VigieError::TableInvalid(format!(
            "{table}: '{entry}' has no keywords"
        )));
    }
    for kw in keywords {
        if kw.trim().is_empty() {
            return Err(VigieError::TableInvalid(format!(
                "{table}: '{entry}' has an empty keyword"
            )));
        }
        if kw.trim() != kw || kw.to_lowercase() != *kw {
            return Err(VigieError::TableInvalid(format!(
                "{table}: keyword '{kw}' of '{entry}' must be trimmed lowercase"
            )));
        }
    }
    Ok(())
}

fn validate_entries<T: Keyworded>(
    table: &str,
    entries: &[T],
    name: impl Fn(&T) -> &str,
) -> Result<(), VigieError> {
    let mut seen = BTreeSet::new();
    for entry in entries {
        let entry_name = name(entry);
        if entry_name.trim().is_empty() {
            return Err(VigieError::TableInvalid(format!(
                "{table}: entry name must not be empty"
            )));
        }
        if !seen.insert(entry_name) {
            return Err(VigieError::TableInvalid(format!(
                "{table}: duplicate entry '{entry_name}'"
            )));
        }
        validate_keywords(table, entry_name, entry.keywords())?;
        for exclusion in entry.exclusions() {
            if exclusion.trim().is_empty() || exclusion.trim().to_lowercase() != *exclusion {
                return Err(VigieError::TableInvalid(format!(
                    "{table}: exclusion '{exclusion}' of '{entry_name}' must be trimmed lowercase"
                )));
            }
        }
    }
    Ok(())
}

pub fn validate_markers(table: &MarkerTable) -> Result<(), VigieError> {
    validate_version("markers", &table.version)?;

    for (category, groups) in &table.categories {
        let label = format!("markers.{category}");
        validate_entries(&label, groups, |g| g.group.as_str())?;

        for group in groups {
            match group.nova_floor {
                Some(_) if *category != Category::Food => {
                    return Err(VigieError::TableInvalid(format!(
                        "{label}: group '{}' sets nova_floor outside the food category",
                        group.group
                    )));
                }
                Some(floor) if !(1..=4).contains(&floor) => {
                    return Err(VigieError::TableInvalid(format!(
                        "{label}: group '{}' has nova_floor {floor} (expected 1-4)",
                        group.group
                    )));
                }
                _ => {}
            }
        }
    }
    Ok(())
}

pub fn validate_additives(table: &AdditiveTable) -> Result<(), VigieError> {
    validate_version("additives", &table.version)?;

    if table.additives.is_empty() {
        return Err(VigieError::TableInvalid(
            "additives: table must not be empty".into(),
        ));
    }

    let mut seen = BTreeSet::new();
    for additive in &table.additives {
        if canonical_code(&additive.code).as_deref() != Some(additive.code.as_str()) {
            return Err(VigieError::TableInvalid(format!(
                "additives: '{}' is not a canonical E-number (expected e.g. E320)",
                additive.code
            )));
        }
        if !seen.insert(additive.code.as_str()) {
            return Err(VigieError::TableInvalid(format!(
                "additives: duplicate code '{}'",
                additive.code
            )));
        }
    }
    Ok(())
}

pub fn validate_allergens(table: &AllergenTable) -> Result<(), VigieError> {
    validate_version("allergens", &table.version)?;
    validate_entries("allergens.food", &table.food, |a| a.name.as_str())?;
    validate_entries("allergens.cosmetics", &table.cosmetics, |a| a.name.as_str())?;
    Ok(())
}

pub fn validate_cosmetics(table: &CosmeticTable) -> Result<(), VigieError> {
    validate_version("cosmetics", &table.version)?;
    validate_entries("cosmetics.disruptors", &table.disruptors, |d| {
        d.name.as_str()
    })?;
    validate_entries(
        "cosmetics.ingredient_risks",
        &table.ingredient_risks,
        |r| r.keyword.as_str(),
    )?;
    validate_keywords("cosmetics", "natural_vocabulary", &table.natural_vocabulary)?;
    validate_keywords(
        "cosmetics",
        "synthetic_vocabulary",
        &table.synthetic_vocabulary,
    )?;
    Ok(())
}

pub fn validate_detergents(table: &DetergentTable) -> Result<(), VigieError> {
    validate_version("detergents", &table.version)?;
    validate_entries("detergents.toxicants", &table.toxicants, |t| {
        t.name.as_str()
    })?;
    validate_entries("detergents.eco_labels", &table.eco_labels, |l| {
        l.name.as_str()
    })?;
    validate_keywords("detergents", "biodegradable", &table.biodegradable)?;

    if let Some(t) = table.toxicants.iter().find(|t| t.weight == 0) {
        return Err(VigieError::TableInvalid(format!(
            "detergents.toxicants: '{}' must have a weight > 0",
            t.name
        )));
    }
    Ok(())
}

/// Shared handle on the active table set.
///
/// Readers take an `Arc` snapshot and keep it for the whole analysis, so a
/// concurrent reload never changes tables under a running analysis.
#[derive(Debug)]
pub struct TableStore {
    current: RwLock<Arc<TableSet>>,
}

impl TableStore {
    pub fn new(tables: Arc<TableSet>) -> Self {
        TableStore {
            current: RwLock::new(tables),
        }
    }

    pub fn builtin() -> Self {
        TableStore::new(TableSet::builtin())
    }

    pub fn from_dir(dir: &Path) -> Result<Self, VigieError> {
        Ok(TableStore::new(Arc::new(TableSet::load_dir(dir)?)))
    }

    pub fn snapshot(&self) -> Arc<TableSet> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    pub fn replace(&self, tables: Arc<TableSet>) {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = tables;
    }

    /// Load and validate a full table set from `dir`, then swap it in.
    ///
    /// On error the current tables stay active.
    pub fn reload_from(&self, dir: &Path) -> Result<String, VigieError> {
        let tables = TableSet::load_dir(dir)?;
        let version = tables.version();
        self.replace(Arc::new(tables));
        info!(dir = %dir.display(), %version, "tables reloaded");
        Ok(version)
    }
}

impl Default for TableStore {
    fn default() -> Self {
        TableStore::builtin()
    }
}
