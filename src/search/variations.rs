use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use super::normalizer::normalize;

/// Albanian place names and the spellings visitors actually type for them.
/// Each row is one place; every spelling in a row is equivalent to the others.
const ALBANIAN_LOCATIONS: &[&[&str]] = &[
    &["tirana", "tirane", "tirona", "tirone"],
    &["vlora", "vlore"],
    &["shkodra", "shkoder", "shkodre"],
    &["durres", "durresi", "durrs"],
    &["elbasan", "elbasani"],
    &["korce", "korca", "korcha"],
    &["fier", "fieri"],
    &["berat", "berati"],
    &["lushnje", "lushnja"],
    &["pogradec", "pogradeci"],
    &["kavaje", "kavaja"],
    &["gjirokaster", "gjirokastra", "gjirokastre"],
    &["sarande", "saranda", "sarand"],
    &["lezhe", "lezha"],
    &["kukes", "kukesi"],
    &["peshkopi", "peshkopia"],
    &["permet", "permeti"],
    &["tepelene", "tepelena"],
    &["kruje", "kruja"],
];

#[derive(Debug, Error)]
pub enum VariationLoadError {
    #[error("Failed to read variation file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid variation file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// On-disk shape of a locale resource.
///
/// ```json
/// { "locale": "sq", "classes": [["tirana", "tirane"], ["vlora", "vlore"]] }
/// ```
#[derive(Debug, Deserialize)]
pub struct VariationFile {
    #[serde(default)]
    pub locale: Option<String>,
    pub classes: Vec<Vec<String>>,
}

/// Immutable lookup from a normalized spelling to every spelling of the same
/// place. Built from equivalence classes, so `a` expands to a set containing
/// `b` exactly when `b` expands to a set containing `a`.
#[derive(Debug, Clone, Default)]
pub struct VariationTable {
    locale: Option<String>,
    entries: HashMap<String, Arc<BTreeSet<String>>>,
}

impl VariationTable {
    /// Build a table from groups of equivalent spellings. Spellings are
    /// normalized on the way in; groups sharing a spelling are merged.
    pub fn from_classes<I, C, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut groups: Vec<BTreeSet<String>> = Vec::new();

        for class in classes {
            let mut merged: BTreeSet<String> = class
                .into_iter()
                .map(|spelling| normalize(spelling.as_ref()))
                .filter(|spelling| !spelling.is_empty())
                .collect();

            if merged.is_empty() {
                continue;
            }

            let mut kept = Vec::with_capacity(groups.len());
            for group in groups.drain(..) {
                if group.is_disjoint(&merged) {
                    kept.push(group);
                } else {
                    merged.extend(group);
                }
            }
            kept.push(merged);
            groups = kept;
        }

        let mut entries = HashMap::new();
        for group in groups {
            let shared = Arc::new(group);
            for spelling in shared.iter() {
                entries.insert(spelling.clone(), Arc::clone(&shared));
            }
        }

        Self { locale: None, entries }
    }

    /// The bundled Albanian place-name table.
    pub fn albanian() -> Self {
        let mut table = Self::from_classes(ALBANIAN_LOCATIONS.iter().map(|row| row.iter()));
        table.locale = Some("sq".to_string());
        table
    }

    pub fn from_json_str(raw: &str) -> Result<Self, VariationLoadError> {
        let file: VariationFile = serde_json::from_str(raw)?;
        let mut table = Self::from_classes(file.classes);
        table.locale = file.locale;
        Ok(table)
    }

    pub fn load(path: &Path) -> Result<Self, VariationLoadError> {
        let raw = std::fs::read_to_string(path).map_err(|source| VariationLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// Number of distinct spellings the table knows about.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every spelling known to be equivalent to an already-normalized term.
    pub fn variations_of(&self, normalized: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(normalized).map(|group| group.as_ref())
    }

    /// Spellings to try for a raw search term: the term's equivalence class if
    /// the table knows it, the normalized term alone otherwise, nothing if the
    /// term folds to the empty string.
    pub fn expand(&self, term: &str) -> BTreeSet<String> {
        let normalized = normalize(term);
        if normalized.is_empty() {
            return BTreeSet::new();
        }

        match self.variations_of(&normalized) {
            Some(group) => group.clone(),
            None => BTreeSet::from([normalized]),
        }
    }

    pub fn spellings(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_known_place_to_its_class() {
        let table = VariationTable::albanian();
        let korca = table.expand("Korça");
        assert_eq!(
            korca,
            BTreeSet::from(["korca".to_string(), "korce".to_string(), "korcha".to_string()])
        );
    }

    #[test]
    fn expansion_always_contains_the_key() {
        let table = VariationTable::albanian();
        for spelling in table.spellings() {
            assert!(table.expand(spelling).contains(spelling), "{}", spelling);
        }
    }

    #[test]
    fn lookups_are_symmetric() {
        let table = VariationTable::albanian();
        for a in table.spellings() {
            for b in table.expand(a) {
                assert!(table.expand(&b).contains(a), "{} -> {} is one-way", a, b);
            }
        }
    }

    #[test]
    fn spellings_missing_from_the_source_data_are_still_symmetric() {
        let table = VariationTable::albanian();
        assert!(table.expand("durrs").contains("durres"));
        assert!(table.expand("durres").contains("durrs"));
        assert!(table.expand("sarand").contains("saranda"));
    }

    #[test]
    fn unknown_place_expands_to_itself() {
        let table = VariationTable::albanian();
        assert_eq!(table.expand("unknownplace"), BTreeSet::from(["unknownplace".to_string()]));
        assert_eq!(table.expand("  Brooklyn  Heights "), BTreeSet::from(["brooklyn heights".to_string()]));
    }

    #[test]
    fn blank_term_expands_to_nothing() {
        let table = VariationTable::albanian();
        assert!(table.expand("").is_empty());
        assert!(table.expand("   ").is_empty());
    }

    #[test]
    fn overlapping_classes_are_merged() {
        let table = VariationTable::from_classes(vec![vec!["a", "b"], vec!["c", "d"], vec!["B", "c"]]);
        assert_eq!(table.expand("a").len(), 4);
        assert_eq!(table.expand("d"), table.expand("a"));
    }

    #[test]
    fn loads_from_json() {
        let table = VariationTable::from_json_str(
            r#"{ "locale": "it", "classes": [["Firenze", "Florence", "Fiorenza"], [""]] }"#,
        )
        .unwrap();
        assert_eq!(table.locale(), Some("it"));
        assert_eq!(table.len(), 3);
        assert!(table.expand("FLORENCE").contains("firenze"));
    }

    #[test]
    fn bundled_locale_file_matches_builtin_table() {
        let file = VariationTable::from_json_str(include_str!("../../locale/albanian_locations.json")).unwrap();
        let builtin = VariationTable::albanian();
        assert_eq!(file.locale(), builtin.locale());
        assert_eq!(file.len(), builtin.len());
        for spelling in builtin.spellings() {
            assert_eq!(file.expand(spelling), builtin.expand(spelling), "{}", spelling);
        }
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            VariationTable::from_json_str("{\"classes\": 3}"),
            Err(VariationLoadError::Parse(_))
        ));
    }
}
