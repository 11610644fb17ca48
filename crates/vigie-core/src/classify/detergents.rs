use super::clamp_score;
use super::outcome::{AquaticToxicityLevel, DetergentClassification, ToxicantHit};
use crate::detect::markers::{contains_any, match_entries};
use crate::detect::DetectionReport;
use crate::model::Product;
use crate::tables::TableSet;
use std::collections::BTreeSet;
use tracing::debug;

const BIODEGRADABILITY_WEIGHT: i32 = 4;
const ECO_LABEL_BONUS: i32 = 10;
const HEALTH_BASE: i32 = 85;

pub fn aquatic_level(points: u32) -> AquaticToxicityLevel {
    match points {
        0 => AquaticToxicityLevel::Low,
        1..=2 => AquaticToxicityLevel::Moderate,
        3..=5 => AquaticToxicityLevel::High,
        _ => AquaticToxicityLevel::VeryHigh,
    }
}

fn environmental_penalty(level: AquaticToxicityLevel) -> i32 {
    match level {
        AquaticToxicityLevel::Low => 0,
        AquaticToxicityLevel::Moderate => 15,
        AquaticToxicityLevel::High => 35,
        AquaticToxicityLevel::VeryHigh => 60,
    }
}

fn health_penalty(level: AquaticToxicityLevel) -> i32 {
    match level {
        AquaticToxicityLevel::Low => 0,
        AquaticToxicityLevel::Moderate => 5,
        AquaticToxicityLevel::High => 15,
        AquaticToxicityLevel::VeryHigh => 25,
    }
}

/// Eco-labels named in the product name or its certifications.
fn find_eco_labels(product: &Product, tables: &TableSet) -> BTreeSet<String> {
    let mut haystack = product.name.to_lowercase();
    for cert in &product.certifications {
        haystack.push(' ');
        haystack.push_str(&cert.to_lowercase());
    }

    tables
        .detergents
        .eco_labels
        .iter()
        .filter(|label| contains_any(&haystack, &label.keywords))
        .map(|label| label.name.clone())
        .collect()
}

pub fn classify_detergents(
    product: &Product,
    report: &DetectionReport,
    tables: &TableSet,
) -> DetergentClassification {
    let table = &tables.detergents;

    let mut toxicants: Vec<ToxicantHit> = Vec::new();
    let mut biodegradable = 0usize;
    let mut unclassified_ingredients = Vec::new();
    let markers = report.matched_markers();

    for ing in &product.ingredients {
        let text = ing.normalized.as_str();
        let hits = match_entries(text, &table.toxicants);

        if hits.is_empty() {
            if contains_any(text, &table.biodegradable) {
                biodegradable += 1;
            } else if !markers.iter().any(|kw| text.contains(kw)) {
                debug!(ingredient = %ing.display, "detergent ingredient not in tables");
                unclassified_ingredients.push(ing.display.clone());
            }
            continue;
        }

        for (entry, _) in hits {
            if toxicants.iter().any(|t| t.name == entry.name) {
                continue;
            }
            toxicants.push(ToxicantHit {
                name: entry.name.clone(),
                weight: entry.weight,
                ingredient: ing.display.clone(),
            });
        }
    }

    let toxicity_points: u32 = toxicants.iter().map(|t| t.weight).sum();
    let level = aquatic_level(toxicity_points);

    let total = product.ingredients.len();
    let biodegradability_score = if total == 0 {
        0
    } else {
        (10.0 * biodegradable as f64 / total as f64).round() as u8
    };

    let eco_labels = find_eco_labels(product, tables);

    let environmental = 100 - environmental_penalty(level)
        + (i32::from(biodegradability_score) - 5) * BIODEGRADABILITY_WEIGHT
        + ECO_LABEL_BONUS * eco_labels.len() as i32;
    let health = HEALTH_BASE - health_penalty(level);

    let mut explanation = Vec::new();
    for t in &toxicants {
        explanation.push(format!("{} ({} pt) : {}", t.name, t.weight, t.ingredient));
    }
    explanation.push(format!("Toxicité aquatique {level} ({toxicity_points} pt)"));
    explanation.push(format!(
        "Biodégradabilité : {biodegradability_score}/10 ({biodegradable}/{total} ingrédients)"
    ));
    if !eco_labels.is_empty() {
        explanation.push(format!(
            "Écolabel(s) : {}",
            eco_labels.iter().cloned().collect::<Vec<_>>().join(", ")
        ));
    }

    debug!(
        points = toxicity_points,
        biodegradable,
        labels = eco_labels.len(),
        "detergents classified"
    );

    DetergentClassification {
        aquatic_toxicity_level: level,
        toxicity_points,
        toxicants,
        biodegradability_score,
        eco_labels,
        environmental_score: clamp_score(environmental),
        health_score: clamp_score(health),
        flagged_groups: report.markers.keys().cloned().collect(),
        unclassified_ingredients,
        explanation,
    }
}
