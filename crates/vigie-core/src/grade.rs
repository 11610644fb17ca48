use crate::model::Product;
use serde::{Deserialize, Serialize};
use std::fmt;

const BASE_CONFIDENCE: f64 = 0.3;
const MAX_DERIVED_CONFIDENCE: f64 = 0.95;
const RICH_INGREDIENT_LIST: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
        };
        f.write_str(s)
    }
}

/// Risk label shown next to the score. Inverse of the score: a high score is a low risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLabel {
    #[serde(rename = "FAIBLE")]
    Low,
    #[serde(rename = "MODÉRÉ")]
    Moderate,
    #[serde(rename = "ÉLEVÉ")]
    High,
    #[serde(rename = "TRÈS ÉLEVÉ")]
    VeryHigh,
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLabel::Low => "FAIBLE",
            RiskLabel::Moderate => "MODÉRÉ",
            RiskLabel::High => "ÉLEVÉ",
            RiskLabel::VeryHigh => "TRÈS ÉLEVÉ",
        };
        f.write_str(s)
    }
}

pub fn grade_for(score: u8) -> Grade {
    match score {
        80.. => Grade::A,
        60..=79 => Grade::B,
        40..=59 => Grade::C,
        20..=39 => Grade::D,
        _ => Grade::E,
    }
}

pub fn risk_label_for(score: u8) -> RiskLabel {
    match score {
        80.. => RiskLabel::Low,
        60..=79 => RiskLabel::Moderate,
        40..=59 => RiskLabel::High,
        _ => RiskLabel::VeryHigh,
    }
}

/// Confidence from data completeness, for classifiers that state none.
pub fn derived_confidence(product: &Product) -> f64 {
    let mut confidence = BASE_CONFIDENCE;
    if product.ingredients.len() > RICH_INGREDIENT_LIST {
        confidence += 0.2;
    }
    if product.has_barcode_or_certification() {
        confidence += 0.1;
    }
    if product.has_brand() {
        confidence += 0.1;
    }
    confidence.min(MAX_DERIVED_CONFIDENCE)
}

/// Classifier confidence when present, otherwise derived. Always within 0.0-1.0.
pub fn resolve_confidence(classifier: Option<f64>, product: &Product) -> f64 {
    let confidence = match classifier {
        Some(c) if c.is_finite() => c,
        _ => derived_confidence(product),
    };
    confidence.clamp(0.0, 1.0)
}
