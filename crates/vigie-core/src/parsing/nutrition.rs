use crate::error::VigieError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Salt = sodium x 2.5 (EU Regulation 1169/2011, Annex I).
const SODIUM_TO_SALT: Decimal = Decimal::from_parts(25, 0, 0, false, 1);
const MAX_PER_100G: Decimal = Decimal::ONE_HUNDRED;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nutrient {
    Energy,
    Fat,
    SaturatedFat,
    Carbohydrates,
    Sugars,
    Fiber,
    Proteins,
    Salt,
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Nutrient::Energy => "energy",
            Nutrient::Fat => "fat",
            Nutrient::SaturatedFat => "saturated fat",
            Nutrient::Carbohydrates => "carbohydrates",
            Nutrient::Sugars => "sugars",
            Nutrient::Fiber => "fiber",
            Nutrient::Proteins => "proteins",
            Nutrient::Salt => "salt",
        };
        f.write_str(label)
    }
}

/// Nutrient values per 100g, keyed by canonical nutrient.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NutritionFacts(BTreeMap<Nutrient, Decimal>);

impl NutritionFacts {
    pub fn get(&self, nutrient: Nutrient) -> Option<Decimal> {
        self.0.get(&nutrient).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Resolve a free-form nutrient key to a canonical nutrient.
///
/// Accepts Open Food Facts style keys (`saturated-fat_100g`), plain English
/// and French labels. Sodium is reported separately so it can be converted.
fn resolve_key(key: &str) -> Option<KeyKind> {
    let mut k = key.trim().to_lowercase().replace(['-', ' '], "_");
    for suffix in ["_100g", "_g", "_value"] {
        if let Some(stripped) = k.strip_suffix(suffix) {
            k = stripped.to_string();
        }
    }

    let nutrient = match k.as_str() {
        "energy" | "energy_kcal" | "energy_kj" | "énergie" | "energie" | "kcal" => Nutrient::Energy,
        "fat" | "fats" | "matières_grasses" | "matieres_grasses" | "lipides" | "graisses" => {
            Nutrient::Fat
        }
        "saturated_fat"
        | "saturated_fats"
        | "saturates"
        | "acides_gras_saturés"
        | "acides_gras_satures"
        | "graisses_saturées"
        | "graisses_saturees"
        | "dont_saturés" => Nutrient::SaturatedFat,
        "carbohydrates" | "carbs" | "glucides" => Nutrient::Carbohydrates,
        "sugars" | "sugar" | "sucres" | "sucre" | "dont_sucres" => Nutrient::Sugars,
        "fiber" | "fibre" | "fibers" | "fibres" | "fibres_alimentaires" | "dietary_fiber" => {
            Nutrient::Fiber
        }
        "proteins" | "protein" | "protéines" | "proteines" => Nutrient::Proteins,
        "salt" | "sel" => Nutrient::Salt,
        "sodium" => return Some(KeyKind::Sodium),
        _ => return None,
    };
    Some(KeyKind::Direct(nutrient))
}

enum KeyKind {
    Direct(Nutrient),
    Sodium,
}

/// Build canonical nutrition facts from the raw input map.
///
/// Unknown keys are ignored. Negative values, and mass values above 100g per
/// 100g, are rejected. Sodium is converted to salt when no salt value is given.
pub fn parse_nutrition(raw: &BTreeMap<String, Decimal>) -> Result<NutritionFacts, VigieError> {
    let mut facts = BTreeMap::new();
    let mut sodium = None;

    for (key, &value) in raw {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(VigieError::validation(
                &format!("nutritionFacts.{key}"),
                format!("value must not be negative (got {value})"),
            ));
        }

        match resolve_key(key) {
            Some(KeyKind::Direct(nutrient)) => {
                if nutrient != Nutrient::Energy && value > MAX_PER_100G {
                    return Err(VigieError::validation(
                        &format!("nutritionFacts.{key}"),
                        format!("{value}g exceeds 100g per 100g"),
                    ));
                }
                facts.insert(nutrient, value);
            }
            Some(KeyKind::Sodium) => sodium = Some(value),
            None => {
                tracing::debug!(key = %key, "ignoring unknown nutrient key");
            }
        }
    }

    if let Some(sodium) = sodium {
        facts
            .entry(Nutrient::Salt)
            .or_insert(sodium * SODIUM_TO_SALT);
    }

    Ok(NutritionFacts(facts))
}
