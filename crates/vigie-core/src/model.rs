use crate::classify::outcome::Classification;
use crate::grade::{Grade, RiskLabel};
use crate::parsing::nutrition::NutritionFacts;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

pub const DEFAULT_PRODUCT_NAME: &str = "Produit sans nom";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Cosmetics,
    Detergents,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Food, Category::Cosmetics, Category::Detergents];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Cosmetics => "cosmetics",
            Category::Detergents => "detergents",
        }
    }

    /// Accepts the canonical names plus common English/French variants.
    pub fn from_str_loose(s: &str) -> Option<Category> {
        match s.trim().to_lowercase().as_str() {
            "food" | "foods" | "alimentaire" | "aliment" | "alimentation" => Some(Category::Food),
            "cosmetics" | "cosmetic" | "cosmétique" | "cosmétiques" | "cosmetique" => {
                Some(Category::Cosmetics)
            }
            "detergents"
            | "detergent"
            | "détergent"
            | "détergents"
            | "household"
            | "ménager"
            | "menager"
            | "entretien" => Some(Category::Detergents),
            _ => None,
        }
    }
}

/// Risk tier shared by additive records and the per-category summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskTier::Low => write!(f, "low"),
            RiskTier::Medium => write!(f, "medium"),
            RiskTier::High => write!(f, "high"),
        }
    }
}

/// Product description as received from the request layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub ingredients_text: Option<String>,
    #[serde(default)]
    pub ingredients_list: Option<Vec<String>>,
    #[serde(default)]
    pub certifications: BTreeSet<String>,
    /// Nutrient name -> value per 100g (food only).
    #[serde(default)]
    pub nutrition_facts: BTreeMap<String, Decimal>,
}

impl ProductInput {
    pub fn new(name: &str, category: Category) -> Self {
        ProductInput {
            name: Some(name.to_string()),
            category: category.as_str().to_string(),
            ..Default::default()
        }
    }

    pub fn with_ingredients_text(mut self, text: &str) -> Self {
        self.ingredients_text = Some(text.to_string());
        self
    }

    pub fn with_ingredients<S: AsRef<str>>(mut self, list: &[S]) -> Self {
        self.ingredients_list = Some(list.iter().map(|s| s.as_ref().to_string()).collect());
        self
    }

    pub fn with_brand(mut self, brand: &str) -> Self {
        self.brand = Some(brand.to_string());
        self
    }

    pub fn with_certification(mut self, certification: &str) -> Self {
        self.certifications.insert(certification.to_string());
        self
    }

    pub fn with_nutrient(mut self, nutrient: &str, per_100g: Decimal) -> Self {
        self.nutrition_facts.insert(nutrient.to_string(), per_100g);
        self
    }
}

/// One ingredient token: original casing for display, lowercase for matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub display: String,
    pub normalized: String,
}

/// A validated product: category resolved and ingredients reconciled into one sequence.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub name: String,
    pub brand: Option<String>,
    pub barcode: Option<String>,
    pub category: Category,
    pub ingredients: Vec<Ingredient>,
    /// Full ingredient text used for phrase-level marker and additive detection.
    pub raw_text: String,
    pub certifications: BTreeSet<String>,
    pub nutrition: NutritionFacts,
}

impl Product {
    pub fn has_brand(&self) -> bool {
        self.brand.as_deref().is_some_and(|b| !b.trim().is_empty())
    }

    pub fn has_barcode_or_certification(&self) -> bool {
        let has_barcode = self
            .barcode
            .as_deref()
            .is_some_and(|b| !b.trim().is_empty());
        has_barcode || !self.certifications.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMeta {
    pub category: Category,
    pub product_name: String,
    pub analyzer_version: String,
    pub tables_version: String,
    pub analyzed_at: DateTime<Utc>,
    pub ingredient_count: usize,
    pub enrichment_available: bool,
}

/// Final result handed to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub score: u8,
    pub grade: Grade,
    pub risk_label: RiskLabel,
    pub confidence: f64,
    pub breakdown: Classification,
    pub insights: Vec<String>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
    pub meta: AnalysisMeta,
}
