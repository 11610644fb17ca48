use crate::model::Ingredient;

/// Labels that commonly prefix a printed ingredient list.
const LIST_LABELS: &[&str] = &[
    "ingrédients",
    "ingredients",
    "ingredienti",
    "zutaten",
    "ingr.",
];

/// Split a free-text ingredient list into raw tokens.
///
/// Separators are `,`, `;` and line breaks, but only at the top level:
/// a compound ingredient such as `chocolat (sucre, cacao)` stays one token.
pub fn split_ingredients(text: &str) -> Vec<&str> {
    let text = strip_list_label(text);
    let mut tokens = Vec::new();
    let mut depth: usize = 0;
    let mut start = 0;

    for (idx, c) in text.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' | ';' | '\n' | '\r' if depth == 0 => {
                tokens.push(&text[start..idx]);
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }
    tokens.push(&text[start..]);

    tokens
}

/// Drop a leading "Ingrédients :" style label.
fn strip_list_label(text: &str) -> &str {
    let trimmed = text.trim_start();
    if let Some(colon) = trimmed.find(':') {
        let label = trimmed[..colon].trim().to_lowercase();
        if LIST_LABELS.contains(&label.as_str()) {
            return &trimmed[colon + 1..];
        }
    }
    trimmed
}

/// Clean one raw token. Returns `None` when nothing is left.
///
/// Steps:
/// 1. Collapse internal whitespace
/// 2. Strip trailing `.`/`*` (end of list, organic markers)
/// 3. Lowercase a copy for matching
pub fn normalize_ingredient(raw: &str) -> Option<Ingredient> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let display = collapsed
        .trim_end_matches(|c: char| c == '.' || c == '*' || c.is_whitespace())
        .trim_start()
        .to_string();

    if display.is_empty() {
        return None;
    }

    let normalized = display.to_lowercase();
    Some(Ingredient {
        display,
        normalized,
    })
}

/// Normalize a free-text ingredient list.
pub fn normalize_text(text: &str) -> Vec<Ingredient> {
    split_ingredients(text)
        .into_iter()
        .filter_map(normalize_ingredient)
        .collect()
}

/// Normalize an already tokenised ingredient list. Entries are not split further.
pub fn normalize_list<S: AsRef<str>>(list: &[S]) -> Vec<Ingredient> {
    list.iter()
        .filter_map(|s| normalize_ingredient(s.as_ref()))
        .collect()
}
