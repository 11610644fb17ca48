use vigie_core::classify::outcome::{
    CosmeticClassification, DetergentClassification, FoodClassification,
};
use vigie_core::classify::Classification;
use vigie_core::detect::DetectionReport;
use vigie_core::model::{AnalysisResult, Product};

pub fn print_result(result: &AnalysisResult, verbose: bool) {
    println!(
        "=== {} ({}) ===\n",
        result.meta.product_name, result.meta.category
    );
    println!(
        "  Score: {}/100  Grade: {}  Risk: {}  Confidence: {:.2}\n",
        result.score, result.grade, result.risk_label, result.confidence
    );

    match &result.breakdown {
        Classification::Food(food) => print_food(food),
        Classification::Cosmetics(cosmetic) => print_cosmetics(cosmetic),
        Classification::Detergents(detergent) => print_detergents(detergent),
    }

    print_section("Insights", &result.insights);
    print_section("Warnings", &result.warnings);
    print_section("Recommendations", &result.recommendations);

    if verbose {
        print_section("Explanation", explanation(&result.breakdown));
        println!(
            "  {} | tables {} | {}",
            result.meta.analyzer_version,
            result.meta.tables_version,
            result.meta.analyzed_at.to_rfc3339()
        );
    }
}

fn explanation(breakdown: &Classification) -> &[String] {
    match breakdown {
        Classification::Food(food) => &food.explanation,
        Classification::Cosmetics(cosmetic) => &cosmetic.explanation,
        Classification::Detergents(detergent) => &detergent.explanation,
    }
}

fn print_food(food: &FoodClassification) {
    println!("  NOVA group: {}", food.nova_group);
    for tier in &food.markers_by_tier {
        let keywords: Vec<&str> = tier.keywords.iter().map(String::as_str).collect();
        println!(
            "    [NOVA {}] {}: {}",
            tier.nova_floor,
            tier.group,
            keywords.join(", ")
        );
    }
    println!("  Additives: {}", food.raw_additive_count);
    if !food.problematic_additives.is_empty() {
        let width = food
            .problematic_additives
            .iter()
            .map(|a| a.code.len())
            .max()
            .unwrap_or(4);
        for additive in &food.problematic_additives {
            println!(
                "    {:<width$}  {:<6}  {} ({})",
                additive.code,
                additive.risk_tier.to_string(),
                additive.name,
                additive.concern,
                width = width
            );
        }
    }
    if !food.unclassified_additives.is_empty() {
        println!("    unlisted: {}", food.unclassified_additives.join(", "));
    }
    for flag in &food.nutrition.concerns {
        println!(
            "  Nutrition concern: {} {} > {}",
            flag.nutrient, flag.value, flag.threshold
        );
    }
    for flag in &food.nutrition.positives {
        println!(
            "  Nutrition positive: {} {} (>= {})",
            flag.nutrient, flag.value, flag.threshold
        );
    }
    print_list("Allergens", food.allergens.iter());
    println!();
}

fn print_cosmetics(cosmetic: &CosmeticClassification) {
    println!("  Endocrine risk: {}", cosmetic.endocrine_risk_level);
    for hit in &cosmetic.disruptors {
        println!(
            "    {} [{}] in '{}'",
            hit.name, hit.evidence, hit.ingredient
        );
    }
    println!("  Naturalness: {}/10", cosmetic.naturalness_score);
    println!("  Skin compatibility: {}/10", cosmetic.skin_compatibility);
    for flag in &cosmetic.risky_ingredients {
        match &flag.reason {
            Some(reason) => println!("    {} ({}): {}", flag.ingredient, flag.tier, reason),
            None => println!("    {} ({})", flag.ingredient, flag.tier),
        }
    }
    print_list("Allergens", cosmetic.allergens.iter());
    print_list("Unclassified", cosmetic.unclassified_ingredients.iter());
    println!();
}

fn print_detergents(detergent: &DetergentClassification) {
    println!(
        "  Aquatic toxicity: {} ({} points)",
        detergent.aquatic_toxicity_level, detergent.toxicity_points
    );
    for hit in &detergent.toxicants {
        println!(
            "    {} (weight {}) in '{}'",
            hit.name, hit.weight, hit.ingredient
        );
    }
    println!(
        "  Biodegradability: {}/10",
        detergent.biodegradability_score
    );
    println!("  Environmental score: {}", detergent.environmental_score);
    println!("  Health score: {}", detergent.health_score);
    print_list("Eco labels", detergent.eco_labels.iter());
    print_list("Unclassified", detergent.unclassified_ingredients.iter());
    println!();
}

pub fn print_detection(product: &Product, report: &DetectionReport) {
    println!("=== {} ({}) ===\n", product.name, product.category);

    if !product.ingredients.is_empty() {
        let width = product
            .ingredients
            .iter()
            .map(|i| i.display.chars().count())
            .max()
            .unwrap_or(10);
        for ingredient in &product.ingredients {
            println!(
                "  {:<width$}  -> {}",
                ingredient.display,
                ingredient.normalized,
                width = width
            );
        }
        println!();
    }

    if report.markers.is_empty() {
        println!("  No markers detected.");
    }
    for (group, keywords) in &report.markers {
        let keywords: Vec<&str> = keywords.iter().map(String::as_str).collect();
        println!("  {group}: {}", keywords.join(", "));
    }
    print_list("Additives", report.additive_codes.iter());
}

fn print_section(title: &str, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    println!("  {title}:");
    for line in lines {
        println!("    - {line}");
    }
    println!();
}

fn print_list<'a>(label: &str, items: impl Iterator<Item = &'a String>) {
    let items: Vec<&str> = items.map(String::as_str).collect();
    if !items.is_empty() {
        println!("  {label}: {}", items.join(", "));
    }
}
