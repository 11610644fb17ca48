use regex::Regex;
use std::sync::LazyLock;

/// E-number anywhere in a text, optionally with the Open Food Facts `en:` prefix.
static ADDITIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:en:)?(e\d{3,4}[a-z]?)\b").expect("additive pattern is valid")
});

static CANONICAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^E\d{3,4}[A-Z]?$").expect("canonical pattern is valid")
});

/// Extract additive codes from free text.
///
/// Codes are upper-cased with the `en:` prefix stripped, and de-duplicated
/// keeping the first occurrence order.
pub fn extract_additive_codes(text: &str) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    for caps in ADDITIVE_RE.captures_iter(text) {
        let code = caps[1].to_uppercase();
        if !codes.contains(&code) {
            codes.push(code);
        }
    }
    codes
}

/// Canonical table key for a single code (`en:e150c` -> `E150C`).
pub fn canonical_code(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let lower = trimmed.to_lowercase();
    let without_prefix = lower.strip_prefix("en:").unwrap_or(&lower);
    let code = without_prefix.replace(['-', ' '], "").to_uppercase();
    CANONICAL_RE.is_match(&code).then_some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_extracted_in_order() {
        let codes = extract_additive_codes("sucre, colorant: E150c, conservateur (e211), E102");
        assert_eq!(codes, vec!["E150C", "E211", "E102"]);
    }

    #[test]
    fn test_off_prefix_stripped() {
        let codes = extract_additive_codes("en:e330, en:E322i");
        assert_eq!(codes, vec!["E330", "E322I"]);
    }

    #[test]
    fn test_duplicates_collapsed() {
        let codes = extract_additive_codes("E621, e621, E 621, E621");
        assert_eq!(codes, vec!["E621"]);
    }

    #[test]
    fn test_embedded_digits_ignored() {
        let codes = extract_additive_codes("vitamine b12, omega3, type00");
        assert!(codes.is_empty());
        assert!(extract_additive_codes("code 1E1020").is_empty());
    }

    #[test]
    fn test_canonical_code() {
        assert_eq!(canonical_code("en:e150c").as_deref(), Some("E150C"));
        assert_eq!(canonical_code(" E-320 ").as_deref(), Some("E320"));
        assert_eq!(canonical_code("E1520").as_deref(), Some("E1520"));
        assert_eq!(canonical_code("E12"), None);
        assert_eq!(canonical_code("salt"), None);
    }
}
