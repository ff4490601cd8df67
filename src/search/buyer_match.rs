use super::listing_query::ListingOrder;
use super::predicate::{Predicate, TextField, TextMatch};
use crate::models::buyersearchmodel::BuyerSearch;
use crate::models::propertymodel::{ListingStatus, Property};

/// Published listings satisfying every criterion the buyer actually set.
///
/// The city is a plain case-insensitive substring of `location_text`; it is
/// deliberately not expanded through the spelling table.
pub fn buyer_match_predicate(search: &BuyerSearch) -> Predicate {
    let mut predicate = Predicate::ListingStatusIs(ListingStatus::Published);

    if let Some(min) = search.min_bedrooms() {
        predicate = predicate.and(Predicate::BedroomsAtLeast(min));
    }
    if let Some(max) = search.max_bedrooms() {
        predicate = predicate.and(Predicate::BedroomsAtMost(max));
    }
    if let Some(min) = search.min_budget() {
        predicate = predicate.and(Predicate::PriceAtLeast(min.clone()));
    }
    if let Some(max) = search.max_budget() {
        predicate = predicate.and(Predicate::PriceAtMost(max.clone()));
    }
    if let Some(city) = search.city() {
        predicate = predicate.and(Predicate::Contains {
            field: TextField::LocationText,
            needles: vec![city.to_string()],
            mode: TextMatch::IgnoreCase,
        });
    }
    if let Some(property_type) = search.property_type {
        predicate = predicate.and(Predicate::CategoryIn(property_type.categories()));
    }

    predicate
}

/// Matching listings, newest first whatever order they were loaded in.
pub fn find_matches<'a>(search: &BuyerSearch, properties: &'a [Property]) -> Vec<&'a Property> {
    let predicate = buyer_match_predicate(search);
    let order = ListingOrder::default();
    let mut matched: Vec<&Property> = properties.iter().filter(|p| predicate.matches(p)).collect();
    matched.sort_by(|a, b| order.compare(a, b));
    matched
}

pub fn count_matches(search: &BuyerSearch, properties: &[Property]) -> usize {
    let predicate = buyer_match_predicate(search);
    properties.iter().filter(|p| predicate.matches(p)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::buyersearchmodel::BuyerPropertyType;
    use crate::search::test_fixtures::{brooklyn_garden_flat, sample_properties};
    use sqlx::types::BigDecimal;

    fn brooklyn_buyer() -> BuyerSearch {
        BuyerSearch {
            buyer_name: "Dana".to_string(),
            bedrooms_min: 2,
            budget_max: Some(BigDecimal::from(500_000)),
            location_city: "Brooklyn".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn counts_published_listings_meeting_every_bound() {
        let properties = sample_properties();
        let matches = find_matches(&brooklyn_buyer(), &properties);
        let titles: Vec<&str> = matches.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Brooklyn brownstone"]);
        assert_eq!(count_matches(&brooklyn_buyer(), &properties), 1);
    }

    #[test]
    fn recount_sees_newly_published_listing() {
        let search = brooklyn_buyer();
        let mut properties = sample_properties();

        properties.push(brooklyn_garden_flat(ListingStatus::Draft));
        assert_eq!(count_matches(&search, &properties), 1);

        if let Some(flat) = properties.last_mut() {
            flat.listing_status = ListingStatus::Published;
        }
        assert_eq!(count_matches(&search, &properties), 2);
    }

    #[test]
    fn city_is_not_spelling_expanded() {
        let properties = sample_properties();
        let korca = BuyerSearch {
            location_city: "korca".to_string(),
            ..Default::default()
        };
        assert_eq!(count_matches(&korca, &properties), 0);

        let korce = BuyerSearch {
            location_city: "KORÇË".to_string(),
            ..Default::default()
        };
        assert_eq!(count_matches(&korce, &properties), 1);
    }

    #[test]
    fn property_type_picks_the_coarse_bucket() {
        let properties = sample_properties();
        let commercial = BuyerSearch {
            property_type: Some(BuyerPropertyType::Commercial),
            ..Default::default()
        };
        let titles: Vec<&str> = find_matches(&commercial, &properties)
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Brooklyn office floor"]);

        let villa = BuyerSearch {
            property_type: Some(BuyerPropertyType::Villa),
            ..Default::default()
        };
        assert_eq!(count_matches(&villa, &properties), 2);
    }

    #[test]
    fn matches_come_back_newest_first() {
        let mut properties = sample_properties();
        properties.insert(0, brooklyn_garden_flat(ListingStatus::Published));
        properties.reverse();

        let titles: Vec<&str> = find_matches(&brooklyn_buyer(), &properties)
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Brooklyn garden flat", "Brooklyn brownstone"]);
    }

    #[test]
    fn open_search_matches_every_published_listing() {
        let properties = sample_properties();
        assert_eq!(count_matches(&BuyerSearch::default(), &properties), 3);
    }

    #[test]
    fn zero_bounds_impose_nothing() {
        let properties = sample_properties();
        let zeroed = BuyerSearch {
            bedrooms_max: Some(0),
            budget_min: Some(BigDecimal::from(0)),
            budget_max: Some(BigDecimal::from(0)),
            ..Default::default()
        };
        assert_eq!(count_matches(&zeroed, &properties), 3);
    }

    #[test]
    fn bedroom_and_budget_ranges_are_inclusive() {
        let properties = sample_properties();
        let exact = BuyerSearch {
            bedrooms_min: 3,
            bedrooms_max: Some(3),
            budget_min: Some(BigDecimal::from(1_200)),
            budget_max: Some(BigDecimal::from(1_200)),
            ..Default::default()
        };
        let titles: Vec<&str> = find_matches(&exact, &properties)
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Korçë stone house"]);
    }
}
