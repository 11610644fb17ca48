use crate::model::{Category, RiskTier};
use crate::parsing::nutrition::Nutrient;
use crate::tables::schema::{AdditiveRecord, Evidence};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Capability shared by every category classification.
pub trait Scored {
    /// Category score, 0-100, higher is better.
    fn score(&self) -> u8;
    /// Classifier confidence, when the classifier can state one.
    fn confidence(&self) -> Option<f64>;
    /// Coarse risk summary.
    fn risk_tier(&self) -> RiskTier;
    /// Human-readable reasons behind the score, in evaluation order.
    fn explanation(&self) -> &[String];
}

/// A nutrient value that crossed a concern or positive threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionFlag {
    pub nutrient: Nutrient,
    /// Value per 100g.
    pub value: Decimal,
    /// Threshold that was exceeded, per 100g.
    pub threshold: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionAssessment {
    pub concerns: Vec<NutritionFlag>,
    pub positives: Vec<NutritionFlag>,
}

/// Keywords of one food marker group found in the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerTier {
    pub group: String,
    pub nova_floor: u8,
    pub keywords: BTreeSet<String>,
}

/// Food processing and nutrition assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodClassification {
    /// NOVA group, 1 (unprocessed) to 4 (ultra-processed).
    pub nova_group: u8,
    /// Matched marker groups, highest NOVA floor first.
    pub markers_by_tier: Vec<MarkerTier>,
    /// Distinct additive codes found in the text.
    pub raw_additive_count: usize,
    /// Detected additives with a documented concern.
    pub problematic_additives: Vec<AdditiveRecord>,
    /// Detected additive codes the additive table does not know.
    pub unclassified_additives: Vec<String>,
    pub nutrition: NutritionAssessment,
    /// Declared allergen families found in the ingredients.
    pub allergens: BTreeSet<String>,
    pub score: u8,
    pub confidence: f64,
    pub explanation: Vec<String>,
}

impl FoodClassification {
    pub fn additive_count(&self, tier: RiskTier) -> usize {
        self.problematic_additives
            .iter()
            .filter(|a| a.risk_tier == tier)
            .count()
    }
}

impl Scored for FoodClassification {
    fn score(&self) -> u8 {
        self.score
    }

    fn confidence(&self) -> Option<f64> {
        Some(self.confidence)
    }

    fn risk_tier(&self) -> RiskTier {
        match self.nova_group {
            0..=2 => RiskTier::Low,
            3 => RiskTier::Medium,
            _ => RiskTier::High,
        }
    }

    fn explanation(&self) -> &[String] {
        &self.explanation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EndocrineRiskLevel {
    None,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl fmt::Display for EndocrineRiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EndocrineRiskLevel::None => "NONE",
            EndocrineRiskLevel::Low => "LOW",
            EndocrineRiskLevel::Moderate => "MODERATE",
            EndocrineRiskLevel::High => "HIGH",
            EndocrineRiskLevel::VeryHigh => "VERY_HIGH",
        };
        f.write_str(s)
    }
}

/// A disruptor found in one of the ingredients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisruptorHit {
    pub name: String,
    pub evidence: Evidence,
    pub effects: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regulatory_status: Option<String>,
    /// Ingredient as written on the product.
    pub ingredient: String,
}

/// An ingredient carrying a skin-compatibility risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientFlag {
    pub ingredient: String,
    pub tier: RiskTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Cosmetic hazard assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CosmeticClassification {
    pub endocrine_risk_level: EndocrineRiskLevel,
    pub disruptors: Vec<DisruptorHit>,
    /// Mandatory-labelling fragrance allergens found.
    pub allergens: BTreeSet<String>,
    /// 0 (fully synthetic) to 10 (fully natural), 5 when undetermined.
    pub naturalness_score: u8,
    /// 0 to 10, starts at 10 and drops per risky ingredient.
    pub skin_compatibility: u8,
    pub risky_ingredients: Vec<IngredientFlag>,
    /// Marker groups found (fragrance, microplastics, ...).
    pub flagged_groups: BTreeSet<String>,
    pub unclassified_ingredients: Vec<String>,
    pub score: u8,
    pub explanation: Vec<String>,
}

impl Scored for CosmeticClassification {
    fn score(&self) -> u8 {
        self.score
    }

    fn confidence(&self) -> Option<f64> {
        None
    }

    fn risk_tier(&self) -> RiskTier {
        match self.endocrine_risk_level {
            EndocrineRiskLevel::None | EndocrineRiskLevel::Low => RiskTier::Low,
            EndocrineRiskLevel::Moderate => RiskTier::Medium,
            EndocrineRiskLevel::High | EndocrineRiskLevel::VeryHigh => RiskTier::High,
        }
    }

    fn explanation(&self) -> &[String] {
        &self.explanation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AquaticToxicityLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl fmt::Display for AquaticToxicityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AquaticToxicityLevel::Low => "LOW",
            AquaticToxicityLevel::Moderate => "MODERATE",
            AquaticToxicityLevel::High => "HIGH",
            AquaticToxicityLevel::VeryHigh => "VERY_HIGH",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToxicantHit {
    pub name: String,
    pub weight: u32,
    pub ingredient: String,
}

/// Detergent environmental assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetergentClassification {
    pub aquatic_toxicity_level: AquaticToxicityLevel,
    /// Sum of toxicant weights, each toxicant counted once.
    pub toxicity_points: u32,
    pub toxicants: Vec<ToxicantHit>,
    /// 0 to 10, share of readily biodegradable ingredients.
    pub biodegradability_score: u8,
    pub eco_labels: BTreeSet<String>,
    /// Primary score for this category.
    pub environmental_score: u8,
    /// Secondary, informational.
    pub health_score: u8,
    pub flagged_groups: BTreeSet<String>,
    pub unclassified_ingredients: Vec<String>,
    pub explanation: Vec<String>,
}

impl Scored for DetergentClassification {
    fn score(&self) -> u8 {
        self.environmental_score
    }

    fn confidence(&self) -> Option<f64> {
        None
    }

    fn risk_tier(&self) -> RiskTier {
        match self.aquatic_toxicity_level {
            AquaticToxicityLevel::Low => RiskTier::Low,
            AquaticToxicityLevel::Moderate => RiskTier::Medium,
            AquaticToxicityLevel::High | AquaticToxicityLevel::VeryHigh => RiskTier::High,
        }
    }

    fn explanation(&self) -> &[String] {
        &self.explanation
    }
}

/// Output of exactly one category classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum Classification {
    Food(FoodClassification),
    Cosmetics(CosmeticClassification),
    Detergents(DetergentClassification),
}

impl Classification {
    pub fn category(&self) -> Category {
        match self {
            Classification::Food(_) => Category::Food,
            Classification::Cosmetics(_) => Category::Cosmetics,
            Classification::Detergents(_) => Category::Detergents,
        }
    }

    fn scored(&self) -> &dyn Scored {
        match self {
            Classification::Food(c) => c,
            Classification::Cosmetics(c) => c,
            Classification::Detergents(c) => c,
        }
    }
}

impl Scored for Classification {
    fn score(&self) -> u8 {
        self.scored().score()
    }

    fn confidence(&self) -> Option<f64> {
        self.scored().confidence()
    }

    fn risk_tier(&self) -> RiskTier {
        self.scored().risk_tier()
    }

    fn explanation(&self) -> &[String] {
        self.scored().explanation()
    }
}
