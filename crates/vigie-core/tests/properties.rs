//! Property tests over the analysis pipeline.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use vigie_core::analyze_product;
use vigie_core::classify::food::nova_group;
use vigie_core::classify::outcome::Classification;
use vigie_core::grade::{grade_for, Grade};
use vigie_core::model::{Category, ProductInput};
use vigie_core::parsing::normalize::{normalize_list, normalize_text};
use vigie_core::tables::TableSet;

const VOCABULARY: &[&str] = &[
    "eau",
    "farine de blé",
    "sel",
    "sucre",
    "sirop de glucose",
    "huile de palme",
    "E102",
    "E330",
    "E621",
    "aqua",
    "glycerin",
    "triclosan",
    "parfum",
    "limonene",
    "methylparaben",
    "butyrospermum parkii butter",
    "phosphates",
    "sodium lauryl sulfate",
    "coco-glucoside",
    "citric acid",
    "polyethylene",
    "levure",
];

fn category() -> impl Strategy<Value = Category> {
    prop_oneof![
        Just(Category::Food),
        Just(Category::Cosmetics),
        Just(Category::Detergents),
    ]
}

fn ingredient() -> impl Strategy<Value = &'static str> {
    prop::sample::select(VOCABULARY)
}

fn ingredients() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(ingredient(), 1..16)
}

fn analyze(category: Category, list: &[&str]) -> vigie_core::model::AnalysisResult {
    let input = ProductInput::new("p", category).with_ingredients(list);
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    analyze_product(&input, &TableSet::builtin(), at).unwrap()
}

fn expected_grade(score: u8) -> Grade {
    if score >= 80 {
        Grade::A
    } else if score >= 60 {
        Grade::B
    } else if score >= 40 {
        Grade::C
    } else if score >= 20 {
        Grade::D
    } else {
        Grade::E
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_score_and_confidence_bounded(category in category(), list in ingredients()) {
        let result = analyze(category, &list);
        prop_assert!(result.score <= 100);
        prop_assert!((0.0..=1.0).contains(&result.confidence));
    }

    #[test]
    fn prop_grade_matches_score(category in category(), list in ingredients()) {
        let result = analyze(category, &list);
        prop_assert_eq!(result.grade, expected_grade(result.score));
    }

    #[test]
    fn prop_analysis_is_deterministic(category in category(), list in ingredients()) {
        prop_assert_eq!(analyze(category, &list), analyze(category, &list));
    }

    #[test]
    fn prop_grade_for_is_monotonic(a in 0u8..=100, b in 0u8..=100) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(grade_for(hi) <= grade_for(lo));
    }

    #[test]
    fn prop_normalization_idempotent(text in "[A-Za-zéè ,;()*.\n]{0,80}") {
        let once = normalize_text(&text);
        let tokens: Vec<&str> = once.iter().map(|i| i.normalized.as_str()).collect();
        let twice = normalize_list(&tokens);
        prop_assert_eq!(
            tokens,
            twice.iter().map(|i| i.normalized.as_str()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn prop_more_markers_never_lower_nova(list in ingredients(), extra in ingredient()) {
        let base = analyze(Category::Food, &list);
        let mut extended = list.clone();
        extended.push(extra);
        let more = analyze(Category::Food, &extended);
        let Classification::Food(b) = &base.breakdown else {
            panic!("expected food breakdown");
        };
        let Classification::Food(m) = &more.breakdown else {
            panic!("expected food breakdown");
        };
        prop_assert!(m.nova_group >= b.nova_group);
    }

    #[test]
    fn prop_additive_override(floor in 1u8..=4, count in 0usize..12) {
        let nova = nova_group(floor, count);
        prop_assert!(nova >= floor);
        if count > 5 {
            prop_assert_eq!(nova, 4);
        } else if count > 2 {
            prop_assert!(nova >= 3);
        }
    }
}
