use unicode_general_category::{get_general_category, GeneralCategory};
use unicode_normalization::UnicodeNormalization;

/// Fold text for search comparison: lowercase, canonical decomposition with
/// non-spacing marks dropped, whitespace runs collapsed to a single space.
///
/// Lowercasing runs before decomposition so that characters whose lowercase
/// form carries a combining mark (e.g. `İ`) fold the same way on every pass.
pub fn normalize(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let folded: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| get_general_category(*c) != GeneralCategory::NonspacingMark)
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}

/// Case-insensitive substring test without any accent folding.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents_and_case() {
        assert_eq!(normalize("Tiranë"), "tirane");
        assert_eq!(normalize("TIRANE"), "tirane");
        assert_eq!(normalize("Korçë"), "korce");
        assert_eq!(normalize("Gjirokastër"), "gjirokaster");
    }

    #[test]
    fn empty_and_absent_fold_to_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t\n"), "");
        assert_eq!(normalize_opt(None), "");
        assert_eq!(normalize_opt(Some("Durrës")), "durres");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(normalize("  Rruga   e\tKavajës \n"), "rruga e kavajes");
    }

    #[test]
    fn is_idempotent() {
        for input in ["Tiranë", "  ŞKODËR  e Re", "İstanbul", "Vlorë,  Albania", "ñandú", ""] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input {:?}", input);
        }
    }

    #[test]
    fn keeps_base_letters_of_non_latin_scripts() {
        assert_eq!(normalize("Αθήνα"), "αθηνα");
        assert_eq!(normalize("Москва"), "москва");
    }

    #[test]
    fn contains_ignore_case_does_not_fold_accents() {
        assert!(contains_ignore_case("Brooklyn Heights, Brooklyn", "brooklyn"));
        assert!(!contains_ignore_case("Korçë", "korce"));
    }
}
