use super::Settings;
use std::path::Path;
use vigie_core::error::VigieError;
use vigie_core::model::Category;
use vigie_core::tables::{
    TableSet, ADDITIVES_FILE, ALLERGENS_FILE, COSMETICS_FILE, DETERGENTS_FILE, MARKERS_FILE,
};

pub fn list(settings: &Settings) -> Result<(), VigieError> {
    let analyzer = settings.analyzer()?;
    let tables = analyzer.tables().snapshot();
    let source = match &analyzer.config().tables_dir {
        Some(dir) => dir.display().to_string(),
        None => "built-in".to_string(),
    };
    println!("Active tables ({source}):\n");
    print_summary(&tables);
    Ok(())
}

pub fn validate(dir: &Path) -> Result<(), VigieError> {
    let tables = TableSet::load_dir(dir)?;
    println!("Tables in {} are valid.\n", dir.display());
    print_summary(&tables);
    Ok(())
}

pub fn additive(settings: &Settings, code: &str) -> Result<(), VigieError> {
    let analyzer = settings.analyzer()?;
    let tables = analyzer.tables().snapshot();
    match tables.lookup_additive(code) {
        Some(record) => {
            println!("{} {}", record.code, record.name);
            println!("  Risk tier: {}", record.risk_tier);
            println!("  Concern:   {}", record.concern);
        }
        None => println!(
            "'{code}' is not listed in additives v{}",
            tables.additives.version
        ),
    }
    Ok(())
}

fn print_summary(tables: &TableSet) {
    let marker_groups: usize = Category::ALL
        .iter()
        .map(|c| tables.markers.groups(*c).len())
        .sum();
    let rows = [
        (
            MARKERS_FILE,
            &tables.markers.version,
            format!("{marker_groups} marker groups"),
        ),
        (
            ADDITIVES_FILE,
            &tables.additives.version,
            format!("{} additives", tables.additives.additives.len()),
        ),
        (
            ALLERGENS_FILE,
            &tables.allergens.version,
            format!(
                "{} food / {} cosmetic allergens",
                tables.allergens.food.len(),
                tables.allergens.cosmetics.len()
            ),
        ),
        (
            COSMETICS_FILE,
            &tables.cosmetics.version,
            format!(
                "{} disruptors, {} ingredient risks",
                tables.cosmetics.disruptors.len(),
                tables.cosmetics.ingredient_risks.len()
            ),
        ),
        (
            DETERGENTS_FILE,
            &tables.detergents.version,
            format!(
                "{} toxicants, {} eco labels",
                tables.detergents.toxicants.len(),
                tables.detergents.eco_labels.len()
            ),
        ),
    ];

    for (file, version, summary) in &rows {
        println!("  {:<16} v{:<8} {}", file, version, summary);
    }
    println!();
    println!("  Version string: {}", tables.version());
}
