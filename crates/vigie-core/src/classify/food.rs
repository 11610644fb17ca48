use super::clamp_score;
use super::outcome::{FoodClassification, MarkerTier, NutritionAssessment, NutritionFlag};
use crate::detect::markers::match_entries;
use crate::detect::DetectionReport;
use crate::model::{Category, Product, RiskTier};
use crate::parsing::nutrition::{Nutrient, NutritionFacts};
use crate::tables::TableSet;
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use tracing::debug;

/// More than this many distinct additives forces NOVA group 4.
///
/// Calibration constant inherited from the heuristic classifier; revisit
/// against the published NOVA criteria.
pub const ULTRA_PROCESSED_ADDITIVE_THRESHOLD: usize = 5;

/// More than this many distinct additives raises the NOVA group to at least 3.
pub const PROCESSED_ADDITIVE_THRESHOLD: usize = 2;

const SUGARS_CONCERN: Decimal = Decimal::from_parts(15, 0, 0, false, 0);
const SATURATED_FAT_CONCERN: Decimal = Decimal::from_parts(5, 0, 0, false, 0);
const SALT_CONCERN: Decimal = Decimal::from_parts(15, 0, 0, false, 1);
const FIBER_POSITIVE: Decimal = Decimal::from_parts(3, 0, 0, false, 0);
const PROTEINS_POSITIVE: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

const CONCERN_PENALTY: i32 = 8;
const POSITIVE_BONUS: i32 = 3;

/// NOVA group from the highest marker floor and the additive count.
///
/// The additive overrides only ever raise the group.
pub fn nova_group(marker_floor: u8, additive_count: usize) -> u8 {
    let additive_floor = if additive_count > ULTRA_PROCESSED_ADDITIVE_THRESHOLD {
        4
    } else if additive_count > PROCESSED_ADDITIVE_THRESHOLD {
        3
    } else {
        1
    };
    marker_floor.max(additive_floor).clamp(1, 4)
}

fn nova_penalty(nova: u8) -> i32 {
    match nova {
        0 | 1 => 0,
        2 => 10,
        3 => 25,
        _ => 45,
    }
}

fn additive_penalty(tier: RiskTier) -> i32 {
    match tier {
        RiskTier::High => 10,
        RiskTier::Medium => 5,
        RiskTier::Low => 2,
    }
}

/// Compare nutrition facts against the concern and positive thresholds.
pub fn assess_nutrition(facts: &NutritionFacts) -> NutritionAssessment {
    let check = |nutrient, threshold: Decimal| {
        facts
            .get(nutrient)
            .filter(|value| *value > threshold)
            .map(|value| NutritionFlag {
                nutrient,
                value,
                threshold,
            })
    };

    NutritionAssessment {
        concerns: [
            (Nutrient::Sugars, SUGARS_CONCERN),
            (Nutrient::SaturatedFat, SATURATED_FAT_CONCERN),
            (Nutrient::Salt, SALT_CONCERN),
        ]
        .into_iter()
        .filter_map(|(n, t)| check(n, t))
        .collect(),
        positives: [
            (Nutrient::Fiber, FIBER_POSITIVE),
            (Nutrient::Proteins, PROTEINS_POSITIVE),
        ]
        .into_iter()
        .filter_map(|(n, t)| check(n, t))
        .collect(),
    }
}

pub fn classify_food(
    product: &Product,
    report: &DetectionReport,
    tables: &TableSet,
) -> FoodClassification {
    let mut markers_by_tier: Vec<MarkerTier> = tables
        .markers
        .groups(Category::Food)
        .iter()
        .filter_map(|group| {
            let floor = group.nova_floor?;
            let keywords = report.group(&group.group)?;
            Some(MarkerTier {
                group: group.group.clone(),
                nova_floor: floor,
                keywords: keywords.clone(),
            })
        })
        .collect();
    markers_by_tier.sort_by(|a, b| b.nova_floor.cmp(&a.nova_floor));

    let marker_floor = markers_by_tier.first().map_or(1, |t| t.nova_floor);
    let nova = nova_group(marker_floor, report.raw_additive_count);
    let confidence = if report.markers.is_empty() { 0.7 } else { 0.9 };

    let mut problematic_additives = Vec::new();
    let mut unclassified_additives = Vec::new();
    for code in &report.additive_codes {
        match tables.lookup_additive(code) {
            Some(record) => problematic_additives.push(record.clone()),
            None => {
                debug!(code = %code, "additive not in table");
                unclassified_additives.push(code.clone());
            }
        }
    }

    let nutrition = assess_nutrition(&product.nutrition);

    let allergens: BTreeSet<String> = product
        .ingredients
        .iter()
        .flat_map(|ing| match_entries(&ing.normalized, &tables.allergens.food))
        .map(|(entry, _)| entry.name.clone())
        .collect();

    let mut explanation = Vec::new();
    let mut score = 100 - nova_penalty(nova);
    match markers_by_tier.first() {
        Some(top) if top.nova_floor == nova => explanation.push(format!(
            "NOVA {nova} : marqueurs {}",
            top.keywords.iter().cloned().collect::<Vec<_>>().join(", ")
        )),
        _ if nova > marker_floor => explanation.push(format!(
            "NOVA {nova} : {} additifs détectés",
            report.raw_additive_count
        )),
        _ => explanation.push(format!("NOVA {nova} : aucun marqueur de transformation")),
    }

    for additive in &problematic_additives {
        score -= additive_penalty(additive.risk_tier);
        explanation.push(format!(
            "{} ({}) : risque {}, {}",
            additive.code, additive.name, additive.risk_tier, additive.concern
        ));
    }

    for flag in &nutrition.concerns {
        score -= CONCERN_PENALTY;
        explanation.push(format!(
            "{} élevé : {} g/100g (seuil {})",
            flag.nutrient, flag.value, flag.threshold
        ));
    }
    for flag in &nutrition.positives {
        score += POSITIVE_BONUS;
        explanation.push(format!(
            "{} : {} g/100g (au-dessus de {})",
            flag.nutrient, flag.value, flag.threshold
        ));
    }

    if !allergens.is_empty() {
        explanation.push(format!(
            "Allergènes : {}",
            allergens.iter().cloned().collect::<Vec<_>>().join(", ")
        ));
    }

    debug!(
        nova,
        additives = problematic_additives.len(),
        concerns = nutrition.concerns.len(),
        "food classified"
    );

    FoodClassification {
        nova_group: nova,
        markers_by_tier,
        raw_additive_count: report.raw_additive_count,
        problematic_additives,
        unclassified_additives,
        nutrition,
        allergens,
        score: clamp_score(score),
        confidence,
        explanation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::detect;
    use crate::model::ProductInput;
    use crate::parsing::prepare_product;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn classify(input: ProductInput) -> FoodClassification {
        let tables = TableSet::builtin();
        let product = prepare_product(&input).unwrap();
        let report = detect(&product, &tables);
        classify_food(&product, &report, &tables)
    }

    fn food(text: &str) -> ProductInput {
        ProductInput::new("Test", Category::Food).with_ingredients_text(text)
    }

    #[test]
    fn test_additive_override_thresholds() {
        assert_eq!(nova_group(1, 0), 1);
        assert_eq!(nova_group(1, 2), 1);
        assert_eq!(nova_group(1, 3), 3);
        assert_eq!(nova_group(1, 5), 3);
        assert_eq!(nova_group(1, 6), 4);
        assert_eq!(nova_group(4, 0), 4);
        assert_eq!(nova_group(2, 3), 3);
    }

    #[test]
    fn test_raw_food_is_nova_one() {
        let c = classify(food("pommes, poires"));
        assert_eq!(c.nova_group, 1);
        assert_eq!(c.confidence, 0.7);
        assert_eq!(c.score, 100);
    }

    #[test]
    fn test_bread_is_culinary() {
        let input = ProductInput::new("Pain", Category::Food)
            .with_ingredients(&["eau", "farine de blé", "levure", "sel"]);
        let c = classify(input);
        assert_eq!(c.nova_group, 2);
        assert_eq!(c.confidence, 0.9);
        assert_eq!(c.score, 90);
        assert!(c.allergens.contains("gluten"));
    }

    #[test]
    fn test_allergen_lookalikes_not_flagged() {
        let c = classify(food("laitue, beurre de cacao, noix de coco râpée, sel"));
        assert!(!c.allergens.contains("lait"));
        assert!(!c.allergens.contains("fruits à coque"));

        let c = classify(food("laitue, lait écrémé, noix de coco, noix de pécan"));
        assert!(c.allergens.contains("lait"));
        assert!(c.allergens.contains("fruits à coque"));
    }

    #[test]
    fn test_ultra_processed_marker() {
        let c = classify(food("sucre, sirop de glucose, huile de palme"));
        assert_eq!(c.nova_group, 4);
        assert_eq!(c.markers_by_tier[0].nova_floor, 4);
        assert!(c.markers_by_tier[0].keywords.contains("sirop de glucose"));
    }

    #[test]
    fn test_additives_split_by_table() {
        let c = classify(food("eau, E102, E999"));
        assert_eq!(c.problematic_additives.len(), 1);
        assert_eq!(c.problematic_additives[0].code, "E102");
        assert_eq!(c.unclassified_additives, vec!["E999"]);
        assert_eq!(c.additive_count(RiskTier::High), 1);
    }

    #[test]
    fn test_nutrition_thresholds_are_strict() {
        let raw: BTreeMap<String, Decimal> = [
            ("sugars".to_string(), dec!(15)),
            ("salt".to_string(), dec!(1.6)),
            ("fiber".to_string(), dec!(3.5)),
        ]
        .into_iter()
        .collect();
        let facts = crate::parsing::nutrition::parse_nutrition(&raw).unwrap();
        let assessment = assess_nutrition(&facts);
        assert_eq!(assessment.concerns.len(), 1);
        assert_eq!(assessment.concerns[0].nutrient, Nutrient::Salt);
        assert_eq!(assessment.positives.len(), 1);
    }

    #[test]
    fn test_nutrition_moves_score() {
        let input = food("pommes")
            .with_nutrient("sugars_100g", dec!(30))
            .with_nutrient("proteins", dec!(8));
        let c = classify(input);
        assert_eq!(c.score, 100 - 8 + 3);
    }

    #[test]
    fn test_score_floor() {
        let text = "sirop de glucose, E102, E104, E110, E122, E123, E124, E127, E129";
        let c = classify(food(text));
        assert_eq!(c.nova_group, 4);
        assert_eq!(c.score, 0);
    }
}
