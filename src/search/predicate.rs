use sqlx::{types::BigDecimal, Postgres, QueryBuilder};

use super::normalizer::{contains_ignore_case, normalize};
use super::variations::VariationTable;
use crate::models::propertymodel::{Category, ListingStatus, Property};

/// Free-text columns a predicate can look into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Title,
    LocationText,
    Address,
}

impl TextField {
    pub fn value<'a>(&self, property: &'a Property) -> &'a str {
        match self {
            TextField::Title => &property.title,
            TextField::LocationText => &property.location_text,
            TextField::Address => &property.address,
        }
    }
}

/// How a needle is compared with field text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMatch {
    /// Plain case-insensitive substring.
    IgnoreCase,
    /// The field is normalized first; needles must already be normalized.
    Folded,
}

/// One filter criterion over a property, or an AND/OR of criteria.
///
/// `All(vec![])` is true and `Any(vec![])` is false, so an empty set of
/// alternatives matches nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    All(Vec<Predicate>),
    Any(Vec<Predicate>),
    /// Field contains at least one of the needles.
    Contains {
        field: TextField,
        needles: Vec<String>,
        mode: TextMatch,
    },
    ListingStatusIs(ListingStatus),
    CategoryIn(Vec<Category>),
    PriceAtLeast(BigDecimal),
    PriceAtMost(BigDecimal),
    SizeAtLeast(BigDecimal),
    SizeAtMost(BigDecimal),
    BedroomsEq(i32),
    BedroomsAtLeast(i32),
    BedroomsAtMost(i32),
    Featured(bool),
}

impl Predicate {
    pub fn always() -> Self {
        Predicate::All(Vec::new())
    }

    pub fn never() -> Self {
        Predicate::Any(Vec::new())
    }

    pub fn is_always(&self) -> bool {
        matches!(self, Predicate::All(parts) if parts.is_empty())
    }

    pub fn and(self, other: Predicate) -> Self {
        if other.is_always() {
            return self;
        }
        match self {
            Predicate::All(mut parts) => {
                parts.push(other);
                Predicate::All(parts)
            }
            single => Predicate::All(vec![single, other]),
        }
    }

    pub fn or(self, other: Predicate) -> Self {
        match self {
            Predicate::Any(mut parts) => {
                parts.push(other);
                Predicate::Any(parts)
            }
            single => Predicate::Any(vec![single, other]),
        }
    }

    pub fn matches(&self, property: &Property) -> bool {
        match self {
            Predicate::All(parts) => parts.iter().all(|p| p.matches(property)),
            Predicate::Any(parts) => parts.iter().any(|p| p.matches(property)),
            Predicate::Contains { field, needles, mode } => {
                let haystack = field.value(property);
                match mode {
                    TextMatch::IgnoreCase => needles.iter().any(|n| contains_ignore_case(haystack, n)),
                    TextMatch::Folded => {
                        let folded = normalize(haystack);
                        needles.iter().any(|n| folded.contains(n.as_str()))
                    }
                }
            }
            Predicate::ListingStatusIs(status) => property.listing_status == *status,
            Predicate::CategoryIn(categories) => categories.contains(&property.category),
            Predicate::PriceAtLeast(min) => property.price >= *min,
            Predicate::PriceAtMost(max) => property.price <= *max,
            Predicate::SizeAtLeast(min) => property.size_sqm >= *min,
            Predicate::SizeAtMost(max) => property.size_sqm <= *max,
            Predicate::BedroomsEq(n) => property.bedrooms == *n,
            Predicate::BedroomsAtLeast(n) => property.bedrooms >= *n,
            Predicate::BedroomsAtMost(n) => property.bedrooms <= *n,
            Predicate::Featured(featured) => property.featured == *featured,
        }
    }

    /// Render the predicate as a SQL condition over the `properties` table.
    ///
    /// Text criteria render as `TRUE`: accent folding happens in-process, so
    /// the SQL condition selects a superset of the rows `matches` accepts.
    pub fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Predicate::All(parts) => push_joined(qb, parts, " AND ", "TRUE"),
            Predicate::Any(parts) => push_joined(qb, parts, " OR ", "FALSE"),
            Predicate::Contains { .. } => {
                qb.push("TRUE");
            }
            Predicate::ListingStatusIs(status) => {
                qb.push("listing_status = ").push_bind(*status);
            }
            Predicate::CategoryIn(categories) => {
                if categories.is_empty() {
                    qb.push("FALSE");
                    return;
                }
                qb.push("category IN (");
                let mut list = qb.separated(", ");
                for category in categories {
                    list.push_bind(*category);
                }
                list.push_unseparated(")");
            }
            Predicate::PriceAtLeast(min) => {
                qb.push("price >= ").push_bind(min.clone());
            }
            Predicate::PriceAtMost(max) => {
                qb.push("price <= ").push_bind(max.clone());
            }
            Predicate::SizeAtLeast(min) => {
                qb.push("size_sqm >= ").push_bind(min.clone());
            }
            Predicate::SizeAtMost(max) => {
                qb.push("size_sqm <= ").push_bind(max.clone());
            }
            Predicate::BedroomsEq(n) => {
                qb.push("bedrooms = ").push_bind(*n);
            }
            Predicate::BedroomsAtLeast(n) => {
                qb.push("bedrooms >= ").push_bind(*n);
            }
            Predicate::BedroomsAtMost(n) => {
                qb.push("bedrooms <= ").push_bind(*n);
            }
            Predicate::Featured(featured) => {
                qb.push("featured = ").push_bind(*featured);
            }
        }
    }
}

fn push_joined(qb: &mut QueryBuilder<'_, Postgres>, parts: &[Predicate], separator: &str, empty: &str) {
    if parts.is_empty() {
        qb.push(empty);
        return;
    }
    qb.push("(");
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            qb.push(separator);
        }
        part.push_sql(qb);
    }
    qb.push(")");
}

fn location_fields_contain(variations: Vec<String>) -> Predicate {
    Predicate::Any(vec![
        Predicate::Contains {
            field: TextField::LocationText,
            needles: variations.clone(),
            mode: TextMatch::Folded,
        },
        Predicate::Contains {
            field: TextField::Address,
            needles: variations,
            mode: TextMatch::Folded,
        },
    ])
}

/// Location text or address contains any spelling of `term`. A term with no
/// spellings (blank after folding) matches nothing.
pub fn location_predicate(table: &VariationTable, term: &str) -> Predicate {
    let variations: Vec<String> = table.expand(term).into_iter().collect();
    if variations.is_empty() {
        return Predicate::never();
    }
    location_fields_contain(variations)
}

/// Title contains the raw term, or location/address contains any spelling of
/// it. Only the location-ish fields get spelling expansion.
///
/// A blank term is not a search and yields the always-true predicate.
pub fn listing_predicate(table: &VariationTable, term: &str) -> Predicate {
    if term.trim().is_empty() {
        return Predicate::always();
    }

    let title = Predicate::Contains {
        field: TextField::Title,
        needles: vec![term.to_string()],
        mode: TextMatch::IgnoreCase,
    };

    let variations: Vec<String> = table.expand(term).into_iter().collect();
    if variations.is_empty() {
        return Predicate::Any(vec![title]);
    }

    match location_fields_contain(variations) {
        Predicate::Any(mut location) => {
            location.insert(0, title);
            Predicate::Any(location)
        }
        other => Predicate::Any(vec![title, other]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::test_fixtures::property;

    fn table() -> VariationTable {
        VariationTable::albanian()
    }

    #[test]
    fn location_matches_across_spellings() {
        let tirone = property("Sunny flat", "Tirone, Albania", "Rruga e Elbasanit 12");
        assert!(location_predicate(&table(), "Tirana").matches(&tirone));
        assert!(location_predicate(&table(), "tiranë").matches(&tirone));
    }

    #[test]
    fn location_ignores_unrelated_records() {
        let durres = property("Sea view", "Durrës, Albania", "Rruga Taulantia");
        assert!(!location_predicate(&table(), "Tirana").matches(&durres));
    }

    #[test]
    fn location_checks_the_address_too() {
        let flat = property("Flat", "Albania", "Bulevardi Zogu I, Tiranë");
        assert!(location_predicate(&table(), "tirona").matches(&flat));
    }

    #[test]
    fn blank_location_matches_nothing() {
        let flat = property("Flat", "Tirana", "");
        let predicate = location_predicate(&table(), "   ");
        assert_eq!(predicate, Predicate::never());
        assert!(!predicate.matches(&flat));
    }

    #[test]
    fn listing_title_uses_raw_term_only() {
        // "korca" is a known spelling, but titles are not expanded
        let titled = property("Korce Residence", "Vlorë", "");
        assert!(!listing_predicate(&table(), "korca").matches(&titled));
        assert!(listing_predicate(&table(), "KORCE res").matches(&titled));
    }

    #[test]
    fn listing_search_expands_locations() {
        let korce = property("Old town house", "Korçë", "");
        assert!(listing_predicate(&table(), "korca").matches(&korce));
        assert!(listing_predicate(&table(), "Korcha").matches(&korce));
    }

    #[test]
    fn blank_listing_term_is_no_filter() {
        assert!(listing_predicate(&table(), "").is_always());
        assert!(listing_predicate(&table(), " \t").is_always());
    }

    #[test]
    fn term_that_folds_away_still_checks_titles() {
        let accent = property("Mark \u{301} test", "Tirana", "");
        let plain = property("Plain", "Tirana", "");
        let predicate = listing_predicate(&table(), "\u{301}");
        assert!(predicate.matches(&accent));
        assert!(!predicate.matches(&plain));
    }

    #[test]
    fn combinators_follow_vacuous_truth() {
        let flat = property("Flat", "Tirana", "");
        assert!(Predicate::always().matches(&flat));
        assert!(!Predicate::never().matches(&flat));
        let both = Predicate::Featured(false).and(Predicate::BedroomsAtLeast(0));
        assert!(both.matches(&flat));
        assert!(Predicate::never().or(Predicate::Featured(false)).matches(&flat));
    }

    #[test]
    fn sql_rendering_widens_text_criteria() {
        let predicate = Predicate::ListingStatusIs(ListingStatus::Published)
            .and(Predicate::CategoryIn(vec![Category::Buy, Category::Rent]))
            .and(listing_predicate(&table(), "tirana"))
            .and(Predicate::PriceAtMost(BigDecimal::from(500_000)));

        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM properties WHERE ");
        predicate.push_sql(&mut qb);
        assert_eq!(
            qb.sql(),
            "SELECT * FROM properties WHERE (listing_status = $1 AND category IN ($2, $3) \
             AND (TRUE OR TRUE OR TRUE) AND price <= $4)"
        );
    }

    #[test]
    fn sql_rendering_of_empty_combinators() {
        let mut qb = QueryBuilder::<Postgres>::new("");
        Predicate::never().push_sql(&mut qb);
        qb.push(" / ");
        Predicate::always().push_sql(&mut qb);
        qb.push(" / ");
        Predicate::CategoryIn(vec![]).push_sql(&mut qb);
        assert_eq!(qb.sql(), "FALSE / TRUE / FALSE");
    }
}
