use std::collections::HashSet;

use crate::search::normalizer::normalize;

/// URL slug for a listing title: accents folded, ASCII letters/digits kept,
/// punctuation dropped, whitespace and hyphen runs joined by a single `-`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for ch in normalize(title).chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else if ch.is_whitespace() || ch == '-' {
            pending_dash = true;
        }
    }

    let slug = slug.trim_matches(|c| c == '-' || c == '_').to_string();
    if slug.is_empty() {
        "property".to_string()
    } else {
        slug
    }
}

/// First of `base`, `base-1`, `base-2`, ... not already in `taken`.
pub fn next_free_slug(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Sunny Flat in Tiranë"), "sunny-flat-in-tirane");
        assert_eq!(slugify("  Villa -- Korçë, 3 bed!  "), "villa-korce-3-bed");
        assert_eq!(slugify("Loft & Studio"), "loft-studio");
        assert_eq!(slugify("Квартира"), "property");
        assert_eq!(slugify(""), "property");
    }

    #[test]
    fn test_next_free_slug() {
        let mut taken = HashSet::new();
        assert_eq!(next_free_slug("sea-view", &taken), "sea-view");

        taken.insert("sea-view".to_string());
        taken.insert("sea-view-1".to_string());
        assert_eq!(next_free_slug("sea-view", &taken), "sea-view-2");
    }
}
