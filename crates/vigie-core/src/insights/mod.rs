pub mod templates;

use crate::classify::outcome::{
    Classification, CosmeticClassification, DetergentClassification, EndocrineRiskLevel,
    FoodClassification, NutritionFlag,
};
use crate::model::RiskTier;
use serde::{Deserialize, Serialize};
use templates::{Bracket, Condition, Kind, Template, TEMPLATES};

/// Messages produced for one analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub insights: Vec<String>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

impl Insights {
    fn push(&mut self, kind: Kind, message: String) {
        let list = match kind {
            Kind::Insight => &mut self.insights,
            Kind::Warning => &mut self.warnings,
            Kind::Recommendation => &mut self.recommendations,
        };
        if !list.contains(&message) {
            list.push(message);
        }
    }
}

/// Append narrative text from an enrichment provider as one extra insight.
///
/// Returns false when nothing was added: blank text, or text already present.
pub fn add_narrative(insights: &mut Vec<String>, narrative: &str) -> bool {
    let narrative = narrative.trim();
    if narrative.is_empty() || insights.iter().any(|i| i == narrative) {
        return false;
    }
    insights.push(narrative.to_string());
    true
}

/// Select and render the templates that apply to a classification.
///
/// Reads the classification only; nothing here changes the score.
pub fn generate(classification: &Classification, score: u8) -> Insights {
    let bracket = Bracket::for_score(score);
    let mut out = Insights::default();

    for template in TEMPLATES {
        if template
            .category
            .is_some_and(|c| c != classification.category())
        {
            continue;
        }
        if template.bracket.is_some_and(|b| b != bracket) {
            continue;
        }
        if !holds(template.condition, classification) {
            continue;
        }
        out.push(template.kind, render(template, classification, score));
    }
    out
}

fn holds(condition: Condition, classification: &Classification) -> bool {
    use Condition::*;

    match (condition, classification) {
        (Always, _) => true,
        (Group(group), Classification::Cosmetics(c)) => c.flagged_groups.contains(group),
        (Group(group), Classification::Detergents(d)) => d.flagged_groups.contains(group),
        (_, Classification::Food(f)) => holds_food(condition, f),
        (_, Classification::Cosmetics(c)) => holds_cosmetics(condition, c),
        (_, Classification::Detergents(d)) => holds_detergents(condition, d),
    }
}

fn holds_food(condition: Condition, f: &FoodClassification) -> bool {
    use Condition::*;

    match condition {
        NovaAtMost(n) => f.nova_group <= n,
        NovaIs(n) => f.nova_group == n,
        AdditivesOfTier(tier) => f.additive_count(tier) > 0,
        UnclassifiedAdditives => !f.unclassified_additives.is_empty(),
        NutritionConcerns => !f.nutrition.concerns.is_empty(),
        NutritionPositives => !f.nutrition.positives.is_empty(),
        FoodAllergens => !f.allergens.is_empty(),
        _ => false,
    }
}

fn holds_cosmetics(condition: Condition, c: &CosmeticClassification) -> bool {
    use Condition::*;

    match condition {
        EndocrineAtLeast(level) => c.endocrine_risk_level >= level,
        MildEndocrineRisk => matches!(
            c.endocrine_risk_level,
            EndocrineRiskLevel::Low | EndocrineRiskLevel::Moderate
        ),
        NoDisruptors => c.disruptors.is_empty(),
        FragranceAllergens => !c.allergens.is_empty(),
        NaturalnessAtLeast(n) => c.naturalness_score >= n,
        NaturalnessAtMost(n) => c.naturalness_score <= n,
        SkinCompatibilityAtMost(n) => c.skin_compatibility <= n,
        _ => false,
    }
}

fn holds_detergents(condition: Condition, d: &DetergentClassification) -> bool {
    use Condition::*;

    match condition {
        ToxicityAtLeast(level) => d.aquatic_toxicity_level >= level,
        ToxicityIs(level) => d.aquatic_toxicity_level == level,
        BiodegradabilityAtLeast(n) => d.biodegradability_score >= n,
        BiodegradabilityAtMost(n) => d.biodegradability_score <= n,
        EcoLabels => !d.eco_labels.is_empty(),
        NoEcoLabel => d.eco_labels.is_empty(),
        _ => false,
    }
}

fn join<I: IntoIterator<Item = S>, S: AsRef<str>>(items: I) -> String {
    items
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn nutrients(flags: &[NutritionFlag]) -> String {
    join(flags.iter().map(|f| f.nutrient.to_string()))
}

fn render(template: &Template, classification: &Classification, score: u8) -> String {
    let mut values: Vec<(&str, String)> = vec![("{score}", score.to_string())];

    match classification {
        Classification::Food(f) => {
            let tier = match template.condition {
                Condition::AdditivesOfTier(tier) => tier,
                _ => RiskTier::High,
            };
            values.push(("{nova}", f.nova_group.to_string()));
            values.push(("{count}", f.unclassified_additives.len().to_string()));
            let additives = f
                .problematic_additives
                .iter()
                .filter(|a| a.risk_tier == tier)
                .map(|a| format!("{} ({})", a.code, a.name));
            values.push(("{additives}", join(additives)));
            values.push(("{concerns}", nutrients(&f.nutrition.concerns)));
            values.push(("{positives}", nutrients(&f.nutrition.positives)));
            values.push(("{allergens}", join(&f.allergens)));
        }
        Classification::Cosmetics(c) => {
            values.push(("{disruptors}", join(c.disruptors.iter().map(|d| &d.name))));
            values.push(("{allergens}", join(&c.allergens)));
            values.push(("{naturalness}", c.naturalness_score.to_string()));
            values.push(("{skin}", c.skin_compatibility.to_string()));
        }
        Classification::Detergents(d) => {
            values.push(("{toxicants}", join(d.toxicants.iter().map(|t| &t.name))));
            values.push(("{bio}", d.biodegradability_score.to_string()));
            values.push(("{labels}", join(&d.eco_labels)));
        }
    }

    let mut text = template.text.to_string();
    for (key, value) in values {
        if text.contains(key) {
            text = text.replace(key, &value);
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::detect::detect;
    use crate::model::{Category, ProductInput};
    use crate::parsing::prepare_product;
    use crate::tables::TableSet;

    fn run(input: ProductInput) -> (Classification, Insights) {
        let tables = TableSet::builtin();
        let product = prepare_product(&input).unwrap();
        let report = detect(&product, &tables);
        let c = classify(&product, &report, &tables);
        let insights = generate(&c, crate::classify::Scored::score(&c));
        (c, insights)
    }

    #[test]
    fn test_food_additive_warning_rendered() {
        let input = ProductInput::new("Bonbons", Category::Food)
            .with_ingredients_text("sucre, sirop de glucose, E102, E129");
        let (_, out) = run(input);
        assert!(out
            .warnings
            .iter()
            .any(|w| w.contains("E102 (Tartrazine)")));
        assert!(out.warnings.iter().any(|w| w.contains("NOVA 4")));
        assert!(out.recommendations.iter().all(|r| !r.contains('{')));
    }

    #[test]
    fn test_bracket_insight_first() {
        let input = ProductInput::new("Pain", Category::Food)
            .with_ingredients(&["eau", "farine de blé", "levure", "sel"]);
        let (_, out) = run(input);
        assert_eq!(out.insights[0], "Excellent profil : 90/100.");
        assert!(out.warnings.iter().any(|w| w.contains("gluten")));
    }

    #[test]
    fn test_cosmetic_disruptor_recommendation() {
        let input = ProductInput::new("Savon", Category::Cosmetics)
            .with_ingredients(&["aqua", "triclosan"]);
        let (_, out) = run(input);
        assert!(out.warnings.iter().any(|w| w.contains("Triclosan")));
        assert!(out.recommendations.iter().any(|r| r.contains("grossesse")));
    }

    #[test]
    fn test_detergent_without_label_gets_recommendation() {
        let input = ProductInput::new("Lessive", Category::Detergents)
            .with_ingredients(&["eau", "phosphates", "sodium lauryl sulfate", "parfum"]);
        let (_, out) = run(input);
        assert!(out.warnings.iter().any(|w| w.contains("Phosphates")));
        assert!(out.recommendations.iter().any(|r| r.contains("Écolabel")));
        assert!(out
            .recommendations
            .iter()
            .any(|r| r.contains("sans parfum")));
    }

    #[test]
    fn test_narrative_appended_once() {
        let mut insights = vec!["Excellent profil : 90/100.".to_string()];
        assert!(add_narrative(&mut insights, "Un produit simple."));
        assert!(!add_narrative(&mut insights, " Un produit simple. "));
        assert!(!add_narrative(&mut insights, "   "));
        assert_eq!(
            insights,
            vec!["Excellent profil : 90/100.", "Un produit simple."]
        );
    }

    #[test]
    fn test_duplicate_narrative_not_added() {
        let mut insights = vec!["Excellent profil : 90/100.".to_string()];
        assert!(!add_narrative(&mut insights, "Excellent profil : 90/100."));
        assert_eq!(insights.len(), 1);
    }

    #[test]
    fn test_no_cross_category_messages() {
        let input = ProductInput::new("Crème", Category::Cosmetics)
            .with_ingredients(&["aqua", "glycerin"]);
        let (_, out) = run(input);
        let all: Vec<&String> = out
            .insights
            .iter()
            .chain(&out.warnings)
            .chain(&out.recommendations)
            .collect();
        assert!(all
            .iter()
            .all(|m| !m.contains("NOVA") && !m.contains("aquatique")));
    }
}
