pub mod cosmetics;
pub mod detergents;
pub mod food;
pub mod outcome;

use crate::detect::DetectionReport;
use crate::model::{Category, Product};
use crate::tables::TableSet;
pub use outcome::{Classification, Scored};

/// Run the one classifier that matches the product's category.
pub fn classify(product: &Product, report: &DetectionReport, tables: &TableSet) -> Classification {
    match product.category {
        Category::Food => Classification::Food(food::classify_food(product, report, tables)),
        Category::Cosmetics => {
            Classification::Cosmetics(cosmetics::classify_cosmetics(product, report, tables))
        }
        Category::Detergents => {
            Classification::Detergents(detergents::classify_detergents(product, report, tables))
        }
    }
}

pub(crate) fn clamp_score(raw: i32) -> u8 {
    raw.clamp(0, 100) as u8
}
