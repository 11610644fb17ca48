use super::{read_products, Settings};
use crate::output;
use serde::Serialize;
use std::path::Path;
use vigie_core::detect::DetectionReport;
use vigie_core::error::VigieError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DetectionOutput<'a> {
    product_name: &'a str,
    category: &'a str,
    ingredients: Vec<&'a str>,
    detection: &'a DetectionReport,
}

pub fn run(settings: &Settings, input_file: &Path, format: &str) -> Result<(), VigieError> {
    let analyzer = settings.analyzer()?;
    let products = read_products(input_file)?;

    for (i, input) in products.iter().enumerate() {
        let (product, report) = analyzer.detect(input)?;
        match format {
            "json" => output::json::print(&DetectionOutput {
                product_name: &product.name,
                category: product.category.as_str(),
                ingredients: product
                    .ingredients
                    .iter()
                    .map(|i| i.normalized.as_str())
                    .collect(),
                detection: &report,
            })?,
            _ => {
                if i > 0 {
                    println!();
                }
                output::table::print_detection(&product, &report);
            }
        }
    }
    Ok(())
}
