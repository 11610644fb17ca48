pub mod normalize;
pub mod nutrition;

use crate::error::VigieError;
use crate::model::{Category, Product, ProductInput, DEFAULT_PRODUCT_NAME};
use normalize::{normalize_list, normalize_text};
use nutrition::parse_nutrition;

/// Validate a product input and reconcile its ingredients into one canonical sequence.
///
/// When both a list and a text are given, the list provides the tokens (it is
/// already split by the caller) while the text is kept as the raw full text for
/// phrase-level detection. Nothing downstream runs if this fails.
pub fn prepare_product(input: &ProductInput) -> Result<Product, VigieError> {
    if input.category.trim().is_empty() {
        return Err(VigieError::validation("category", "category is required"));
    }
    let Some(category) = Category::from_str_loose(&input.category) else {
        let name = input.category.trim().to_string();
        return Err(VigieError::UnsupportedCategory(name));
    };

    let text = input
        .ingredients_text
        .as_deref()
        .filter(|t| !t.trim().is_empty());
    let from_list = input
        .ingredients_list
        .as_deref()
        .map(normalize_list)
        .unwrap_or_default();

    // A list of blank entries does not hide a usable text.
    let ingredients = match (from_list.is_empty(), text) {
        (false, _) => from_list,
        (true, Some(text)) => normalize_text(text),
        (true, None) => Vec::new(),
    };

    if ingredients.is_empty() {
        return Err(VigieError::validation(
            "ingredients",
            "no ingredient left after normalization",
        ));
    }

    let raw_text = match text {
        Some(text) => text.to_string(),
        None => ingredients
            .iter()
            .map(|i| i.display.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    };

    let nutrition = parse_nutrition(&input.nutrition_facts)?;
    if category != Category::Food && !nutrition.is_empty() {
        tracing::debug!(%category, "nutrition facts ignored outside the food category");
    }

    let name = input
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_PRODUCT_NAME)
        .to_string();

    Ok(Product {
        name,
        brand: input.brand.clone(),
        barcode: input.barcode.clone(),
        category,
        ingredients,
        raw_text,
        certifications: input.certifications.clone(),
        nutrition,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_input_reconciled() {
        let input = ProductInput::new("Pain", Category::Food)
            .with_ingredients_text("eau, farine, sel");
        let product = prepare_product(&input).unwrap();
        assert_eq!(product.ingredients.len(), 3);
        assert_eq!(product.raw_text, "eau, farine, sel");
    }

    #[test]
    fn test_list_wins_over_text() {
        let input = ProductInput::new("Pain", Category::Food)
            .with_ingredients_text("eau, farine de blé complète, sel")
            .with_ingredients(&["eau", "farine", "sel", "levure"]);
        let product = prepare_product(&input).unwrap();
        assert_eq!(product.ingredients.len(), 4);
        assert!(product.raw_text.contains("complète"));
    }

    #[test]
    fn test_blank_list_falls_back_to_text() {
        let input = ProductInput::new("Pain", Category::Food)
            .with_ingredients_text("eau, farine de blé, sel")
            .with_ingredients(&["", "  "]);
        let product = prepare_product(&input).unwrap();
        let names: Vec<&str> = product
            .ingredients
            .iter()
            .map(|i| i.normalized.as_str())
            .collect();
        assert_eq!(names, vec!["eau", "farine de blé", "sel"]);
        assert_eq!(product.raw_text, "eau, farine de blé, sel");
    }

    #[test]
    fn test_list_joined_as_raw_text() {
        let input = ProductInput::new("Savon", Category::Cosmetics)
            .with_ingredients(&["Sodium Cocoate", "Aqua"]);
        let product = prepare_product(&input).unwrap();
        assert_eq!(product.raw_text, "Sodium Cocoate, Aqua");
    }

    #[test]
    fn test_missing_name_defaulted() {
        let mut input = ProductInput::new("  ", Category::Food).with_ingredients(&["eau"]);
        assert_eq!(prepare_product(&input).unwrap().name, DEFAULT_PRODUCT_NAME);
        input.name = None;
        assert_eq!(prepare_product(&input).unwrap().name, DEFAULT_PRODUCT_NAME);
    }

    #[test]
    fn test_empty_ingredients_rejected() {
        let input = ProductInput::new("Vide", Category::Food).with_ingredients_text(" ; , ");
        match prepare_product(&input) {
            Err(VigieError::Validation { field, .. }) => assert_eq!(field, "ingredients"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_category_rejected() {
        let mut input = ProductInput::new("X", Category::Food).with_ingredients(&["eau"]);
        input.category = String::new();
        assert!(prepare_product(&input).unwrap_err().is_validation());
    }

    #[test]
    fn test_unknown_category_rejected() {
        let mut input = ProductInput::new("X", Category::Food).with_ingredients(&["eau"]);
        input.category = "electronics".into();
        assert!(matches!(
            prepare_product(&input),
            Err(VigieError::UnsupportedCategory(c)) if c == "electronics"
        ));
    }
}
