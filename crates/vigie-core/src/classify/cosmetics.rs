use super::clamp_score;
use super::outcome::{CosmeticClassification, DisruptorHit, EndocrineRiskLevel, IngredientFlag};
use crate::detect::markers::{contains_any, match_entries};
use crate::detect::DetectionReport;
use crate::model::{Product, RiskTier};
use crate::tables::schema::Evidence;
use crate::tables::TableSet;
use std::collections::BTreeSet;
use tracing::debug;

const ALLERGEN_PENALTY: i32 = 5;
const SKIN_PENALTY: i32 = 3;
const NATURALNESS_WEIGHT: i32 = 2;

fn evidence_penalty(evidence: Evidence) -> i32 {
    match evidence {
        Evidence::Confirmed => 25,
        Evidence::Probable => 15,
        Evidence::Suspected => 8,
    }
}

fn skin_penalty(tier: RiskTier) -> u8 {
    match tier {
        RiskTier::Low => 1,
        RiskTier::Medium => 2,
        RiskTier::High => 3,
    }
}

/// Endocrine risk level from the strongest evidence and the number of disruptors.
pub fn endocrine_level(disruptors: &[DisruptorHit]) -> EndocrineRiskLevel {
    let Some(strongest) = disruptors.iter().map(|d| d.evidence).max() else {
        return EndocrineRiskLevel::None;
    };
    match (strongest, disruptors.len()) {
        (Evidence::Confirmed, _) => EndocrineRiskLevel::VeryHigh,
        (Evidence::Probable, n) if n >= 2 => EndocrineRiskLevel::VeryHigh,
        (Evidence::Probable, _) => EndocrineRiskLevel::High,
        (Evidence::Suspected, 1) => EndocrineRiskLevel::Low,
        (Evidence::Suspected, 2) => EndocrineRiskLevel::Moderate,
        (Evidence::Suspected, _) => EndocrineRiskLevel::High,
    }
}

/// `round(10 * natural / (natural + synthetic))`, or 5 when nothing is known.
pub fn naturalness_score(natural: usize, synthetic: usize) -> u8 {
    let total = natural + synthetic;
    if total == 0 {
        return 5;
    }
    (10.0 * natural as f64 / total as f64).round() as u8
}

pub fn classify_cosmetics(
    product: &Product,
    report: &DetectionReport,
    tables: &TableSet,
) -> CosmeticClassification {
    let table = &tables.cosmetics;

    let mut disruptors: Vec<DisruptorHit> = Vec::new();
    let mut allergens = BTreeSet::new();
    let mut risky_ingredients = Vec::new();
    let mut unclassified_ingredients = Vec::new();
    let mut skin_compatibility: u8 = 10;
    let (mut natural, mut synthetic) = (0usize, 0usize);

    for ing in &product.ingredients {
        let text = ing.normalized.as_str();
        let mut known = false;

        for (entry, _) in match_entries(text, &table.disruptors) {
            known = true;
            if disruptors.iter().any(|d| d.name == entry.name) {
                continue;
            }
            disruptors.push(DisruptorHit {
                name: entry.name.clone(),
                evidence: entry.evidence,
                effects: entry.effects.clone(),
                regulatory_status: entry.regulatory_status.clone(),
                ingredient: ing.display.clone(),
            });
        }

        for (entry, _) in match_entries(text, &tables.allergens.cosmetics) {
            known = true;
            allergens.insert(entry.name.clone());
        }

        let worst = match_entries(text, &table.ingredient_risks)
            .into_iter()
            .map(|(risk, _)| risk)
            .max_by_key(|risk| risk.tier);
        if let Some(risk) = worst {
            known = true;
            skin_compatibility = skin_compatibility.saturating_sub(skin_penalty(risk.tier));
            risky_ingredients.push(IngredientFlag {
                ingredient: ing.display.clone(),
                tier: risk.tier,
                reason: risk.reason.clone(),
            });
        }

        if contains_any(text, &table.synthetic_vocabulary) {
            known = true;
            synthetic += 1;
        } else if contains_any(text, &table.natural_vocabulary) {
            known = true;
            natural += 1;
        }

        if !known {
            debug!(ingredient = %ing.display, "cosmetic ingredient not in tables");
            unclassified_ingredients.push(ing.display.clone());
        }
    }

    let endocrine_risk_level = endocrine_level(&disruptors);
    let naturalness = naturalness_score(natural, synthetic);

    let mut explanation = Vec::new();
    let mut score = 100;
    for d in &disruptors {
        score -= evidence_penalty(d.evidence);
        explanation.push(format!(
            "Perturbateur endocrinien {} ({}) : {}",
            d.name, d.evidence, d.ingredient
        ));
    }

    score -= ALLERGEN_PENALTY * allergens.len() as i32;
    if !allergens.is_empty() {
        explanation.push(format!(
            "{} allergène(s) parfumant(s) : {}",
            allergens.len(),
            allergens.iter().cloned().collect::<Vec<_>>().join(", ")
        ));
    }

    score -= (10 - i32::from(skin_compatibility)) * SKIN_PENALTY;
    explanation.push(format!("Tolérance cutanée : {skin_compatibility}/10"));

    score += (i32::from(naturalness) - 5) * NATURALNESS_WEIGHT;
    explanation.push(format!(
        "Naturalité : {naturalness}/10 ({natural} naturel(s), {synthetic} synthétique(s))"
    ));

    let flagged_groups: BTreeSet<String> = report.markers.keys().cloned().collect();

    debug!(
        disruptors = disruptors.len(),
        allergens = allergens.len(),
        level = %endocrine_risk_level,
        "cosmetics classified"
    );

    CosmeticClassification {
        endocrine_risk_level,
        disruptors,
        allergens,
        naturalness_score: naturalness,
        skin_compatibility,
        risky_ingredients,
        flagged_groups,
        unclassified_ingredients,
        score: clamp_score(score),
        explanation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::detect;
    use crate::model::{Category, ProductInput};
    use crate::parsing::prepare_product;

    fn classify(list: &[&str]) -> CosmeticClassification {
        let tables = TableSet::builtin();
        let input = ProductInput::new("Crème", Category::Cosmetics).with_ingredients(list);
        let product = prepare_product(&input).unwrap();
        let report = detect(&product, &tables);
        classify_cosmetics(&product, &report, &tables)
    }

    fn hit(evidence: Evidence) -> DisruptorHit {
        DisruptorHit {
            name: format!("{evidence:?}"),
            evidence,
            effects: vec![],
            regulatory_status: None,
            ingredient: String::new(),
        }
    }

    #[test]
    fn test_endocrine_levels() {
        use Evidence::*;
        assert_eq!(endocrine_level(&[]), EndocrineRiskLevel::None);
        assert_eq!(endocrine_level(&[hit(Suspected)]), EndocrineRiskLevel::Low);
        assert_eq!(
            endocrine_level(&[hit(Suspected), hit(Suspected)]),
            EndocrineRiskLevel::Moderate
        );
        assert_eq!(
            endocrine_level(&[hit(Suspected), hit(Suspected), hit(Suspected)]),
            EndocrineRiskLevel::High
        );
        assert_eq!(endocrine_level(&[hit(Probable)]), EndocrineRiskLevel::High);
        assert_eq!(
            endocrine_level(&[hit(Probable), hit(Suspected)]),
            EndocrineRiskLevel::VeryHigh
        );
        assert_eq!(
            endocrine_level(&[hit(Confirmed)]),
            EndocrineRiskLevel::VeryHigh
        );
    }

    #[test]
    fn test_naturalness() {
        assert_eq!(naturalness_score(0, 0), 5);
        assert_eq!(naturalness_score(3, 0), 10);
        assert_eq!(naturalness_score(0, 2), 0);
        assert_eq!(naturalness_score(1, 2), 3);
        assert_eq!(naturalness_score(1, 1), 5);
    }

    #[test]
    fn test_triclosan_is_very_high() {
        let c = classify(&["Aqua", "Glycerin", "Triclosan"]);
        assert_eq!(c.endocrine_risk_level, EndocrineRiskLevel::VeryHigh);
        assert_eq!(c.disruptors[0].ingredient, "Triclosan");
        assert_eq!(c.skin_compatibility, 7);
    }

    #[test]
    fn test_clean_balm_scores_high() {
        let c = classify(&[
            "Butyrospermum Parkii Butter",
            "Simmondsia Chinensis Oil",
            "Cera Alba",
        ]);
        assert_eq!(c.endocrine_risk_level, EndocrineRiskLevel::None);
        assert_eq!(c.naturalness_score, 10);
        assert_eq!(c.score, 100);
    }

    #[test]
    fn test_fragrance_allergens_counted_once() {
        let c = classify(&["Aqua", "Parfum", "Limonene", "Linalool", "Limonene"]);
        assert_eq!(c.allergens.len(), 2);
        assert!(c.flagged_groups.contains("fragrance"));
    }

    #[test]
    fn test_synthetic_wins_over_natural() {
        let c = classify(&["PEG-40 Hydrogenated Castor Oil"]);
        assert_eq!(c.naturalness_score, 0);
    }

    #[test]
    fn test_phthalates_reported_by_name() {
        let c = classify(&["Aqua", "Diethylhexyl Phthalate"]);
        let names: Vec<&str> = c.disruptors.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Diethylhexyl phthalate"]);

        let c = classify(&["Aqua", "Phthalate"]);
        assert_eq!(c.disruptors[0].name, "Unspecified phthalate");
        assert_eq!(c.disruptors[0].evidence, Evidence::Suspected);
    }

    #[test]
    fn test_unknown_ingredient_recorded() {
        let c = classify(&["Aqua", "Mystery Complex"]);
        assert!(c
            .unclassified_ingredients
            .contains(&"Mystery Complex".to_string()));
    }
}
