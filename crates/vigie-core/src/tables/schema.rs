use crate::model::{Category, RiskTier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A table entry matched by lowercase keyword substrings.
pub trait Keyworded {
    fn keywords(&self) -> &[String];

    /// Phrases inside which a keyword occurrence does not count,
    /// e.g. `noix de coco` for `noix`.
    fn exclusions(&self) -> &[String] {
        &[]
    }
}

/// Keyword marker groups per product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerTable {
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    pub categories: BTreeMap<Category, Vec<MarkerGroup>>,
}

impl MarkerTable {
    /// Marker groups for a category (empty when the category has none).
    pub fn groups(&self, category: Category) -> &[MarkerGroup] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerGroup {
    pub group: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Minimum NOVA group implied by any keyword of this group (food only).
    #[serde(default)]
    pub nova_floor: Option<u8>,
    pub keywords: Vec<String>,
}

impl Keyworded for MarkerGroup {
    fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

/// Additives with a documented concern, keyed by canonical E-number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditiveTable {
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    pub additives: Vec<AdditiveRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditiveRecord {
    /// Canonical key, e.g. "E320".
    pub code: String,
    pub name: String,
    pub risk_tier: RiskTier,
    pub concern: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllergenTable {
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    pub food: Vec<AllergenEntry>,
    pub cosmetics: Vec<AllergenEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllergenEntry {
    pub name: String,
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclusions: Vec<String>,
}

impl Keyworded for AllergenEntry {
    fn keywords(&self) -> &[String] {
        &self.keywords
    }

    fn exclusions(&self) -> &[String] {
        &self.exclusions
    }
}

/// Strength of evidence for an endocrine disruptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Evidence {
    Suspected,
    Probable,
    Confirmed,
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evidence::Suspected => write!(f, "SUSPECTED"),
            Evidence::Probable => write!(f, "PROBABLE"),
            Evidence::Confirmed => write!(f, "CONFIRMED"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CosmeticTable {
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    pub disruptors: Vec<DisruptorEntry>,
    pub ingredient_risks: Vec<IngredientRisk>,
    pub natural_vocabulary: Vec<String>,
    pub synthetic_vocabulary: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisruptorEntry {
    pub name: String,
    pub keywords: Vec<String>,
    pub evidence: Evidence,
    #[serde(default)]
    pub effects: Vec<String>,
    #[serde(default)]
    pub regulatory_status: Option<String>,
}

impl Keyworded for DisruptorEntry {
    fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

/// Skin-compatibility risk of a single cosmetic ingredient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientRisk {
    pub keyword: String,
    pub tier: RiskTier,
    #[serde(default)]
    pub reason: Option<String>,
}

impl Keyworded for IngredientRisk {
    fn keywords(&self) -> &[String] {
        std::slice::from_ref(&self.keyword)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetergentTable {
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    pub toxicants: Vec<ToxicantEntry>,
    pub biodegradable: Vec<String>,
    pub eco_labels: Vec<EcoLabelEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToxicantEntry {
    pub name: String,
    pub keywords: Vec<String>,
    /// Contribution to the aquatic toxicity accumulator.
    pub weight: u32,
}

impl Keyworded for ToxicantEntry {
    fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EcoLabelEntry {
    pub name: String,
    pub keywords: Vec<String>,
}

impl Keyworded for EcoLabelEntry {
    fn keywords(&self) -> &[String] {
        &self.keywords
    }
}
