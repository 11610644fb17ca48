use crate::tables::schema::Keyworded;

/// Match table entries against one normalized ingredient.
///
/// Each entry contributes at most once, with its longest matching keyword.
/// Occurrences inside one of the entry's exclusions do not count. An entry
/// whose keyword only appears as part of another entry's longer match in
/// the same text is dropped, so `hexyl cinnamal` does not also report
/// `cinnamal`.
pub fn match_entries<'a, T: Keyworded>(text: &str, entries: &'a [T]) -> Vec<(&'a T, &'a str)> {
    let mut hits: Vec<(&'a T, &'a str)> = Vec::new();

    for entry in entries {
        let exclusions: Vec<&str> = entry.exclusions().iter().map(String::as_str).collect();
        let best = entry
            .keywords()
            .iter()
            .filter(|kw| occurs_outside(text, kw, &exclusions))
            .max_by_key(|kw| kw.len());
        if let Some(kw) = best {
            hits.push((entry, kw.as_str()));
        }
    }

    if hits.len() < 2 {
        return hits;
    }

    let keywords: Vec<&str> = hits.iter().map(|(_, kw)| *kw).collect();
    hits.retain(|(_, kw)| {
        !keywords.iter().any(|other| {
            other.len() > kw.len() && other.contains(kw) && !occurs_outside(text, kw, &[*other])
        })
    });
    hits
}

/// True when `kw` occurs in `text` outside every occurrence of the `covers`.
fn occurs_outside(text: &str, kw: &str, covers: &[&str]) -> bool {
    let covered: Vec<(usize, usize)> = covers
        .iter()
        .flat_map(|cover| text.match_indices(cover))
        .map(|(start, m)| (start, start + m.len()))
        .collect();
    text.match_indices(kw).any(|(start, m)| {
        let end = start + m.len();
        !covered.iter().any(|&(s, e)| s <= start && end <= e)
    })
}

/// True when any keyword occurs in the text.
pub fn contains_any(text: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|kw| text.contains(kw.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::schema::AllergenEntry;

    fn entry(name: &str, keywords: &[&str]) -> AllergenEntry {
        AllergenEntry {
            name: name.to_string(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            exclusions: Vec::new(),
        }
    }

    fn names<'a>(hits: &[(&'a AllergenEntry, &'a str)]) -> Vec<&'a str> {
        hits.iter().map(|(e, _)| e.name.as_str()).collect()
    }

    #[test]
    fn test_longest_keyword_reported() {
        let entries = [entry("lait", &["lait", "lait écrémé"])];
        let hits = match_entries("lait écrémé en poudre", &entries);
        assert_eq!(hits[0].1, "lait écrémé");
    }

    #[test]
    fn test_shadowed_entry_dropped() {
        let entries = [
            entry("cinnamal", &["cinnamal"]),
            entry("hexyl cinnamal", &["hexyl cinnamal"]),
        ];
        let hits = match_entries("hexyl cinnamal", &entries);
        assert_eq!(names(&hits), vec!["hexyl cinnamal"]);
    }

    #[test]
    fn test_independent_occurrence_kept() {
        let entries = [
            entry("eugenol", &["eugenol"]),
            entry("isoeugenol", &["isoeugenol"]),
        ];
        let hits = match_entries("isoeugenol/eugenol", &entries);
        assert_eq!(names(&hits), vec!["eugenol", "isoeugenol"]);
    }

    #[test]
    fn test_exclusion_suppresses_keyword() {
        let mut nuts = entry("fruits à coque", &["noix", "noisette"]);
        nuts.exclusions = vec!["noix de coco".to_string()];
        let hits = match_entries("noix de coco râpée", std::slice::from_ref(&nuts));
        assert!(hits.is_empty());

        let hits = match_entries("noix de coco, noix", std::slice::from_ref(&nuts));
        assert_eq!(hits[0].1, "noix");
    }

    #[test]
    fn test_no_match() {
        let entries = [entry("soja", &["soja", "soy"])];
        assert!(match_entries("farine de riz", &entries).is_empty());
    }

    #[test]
    fn test_contains_any() {
        let kws = vec!["ecocert".to_string(), "ecolabel".to_string()];
        assert!(contains_any("certifié ecocert", &kws));
        assert!(!contains_any("bio", &kws));
    }
}
