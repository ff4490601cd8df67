use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use validator::{Validate, ValidationError};

use super::propertydtos::{blank_or_email, non_negative, PropertyListItemDto};
use crate::models::buyersearchmodel::{BuyerPropertyType, BuyerSearch, SearchStatus};

fn default_currency() -> String {
    "EUR".to_string()
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
#[validate(schema(function = "bounds_in_order", skip_on_field_errors = true))]
pub struct BuyerSearchDto {
    #[validate(length(min = 1, max = 255, message = "Buyer name is required"))]
    pub buyer_name: String,

    #[serde(default)]
    #[validate(custom = "blank_or_email")]
    pub buyer_email: String,

    #[serde(default)]
    #[validate(length(max = 50))]
    pub buyer_phone: String,

    #[serde(default)]
    #[validate(range(min = 0, message = "Minimum bedrooms cannot be negative"))]
    pub bedrooms_min: i32,

    #[validate(range(min = 0, message = "Maximum bedrooms cannot be negative"))]
    pub bedrooms_max: Option<i32>,

    #[validate(custom = "non_negative")]
    pub budget_min: Option<BigDecimal>,

    #[validate(custom = "non_negative")]
    pub budget_max: Option<BigDecimal>,

    #[serde(default = "default_currency")]
    #[validate(length(min = 1, max = 10))]
    pub currency: String,

    #[serde(default)]
    #[validate(length(max = 100))]
    pub location_city: String,

    #[serde(default)]
    #[validate(length(max = 100))]
    pub location_area: String,

    pub property_type: Option<BuyerPropertyType>,

    #[serde(default)]
    pub parking_required: bool,
    #[serde(default)]
    pub balcony_required: bool,
    #[serde(default)]
    pub furnished_required: bool,

    #[serde(default)]
    pub notes: String,

    #[serde(default)]
    pub status: SearchStatus,
}

fn bounds_in_order(dto: &BuyerSearchDto) -> Result<(), ValidationError> {
    if let Some(max) = dto.bedrooms_max.filter(|max| *max != 0) {
        if dto.bedrooms_min > max {
            return Err(ValidationError::new("bedrooms_min_exceeds_max"));
        }
    }
    if let (Some(min), Some(max)) = (&dto.budget_min, &dto.budget_max) {
        if min > max && *max != BigDecimal::from(0) {
            return Err(ValidationError::new("budget_min_exceeds_max"));
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize, Default)]
pub struct BuyerSearchFilterParams {
    pub status: Option<String>,
    pub ordering: Option<String>,
}

/// Saved search plus the live match count and the display strings the admin
/// table shows.
#[derive(Debug, Serialize)]
pub struct BuyerSearchListItemDto {
    #[serde(flatten)]
    pub search: BuyerSearch,
    pub status_display: &'static str,
    pub property_type_display: Option<&'static str>,
    pub contact: String,
    pub bedrooms_range: String,
    pub budget_range: String,
    pub location: String,
    pub matches_count: usize,
}

impl BuyerSearchListItemDto {
    pub fn new(search: BuyerSearch, matches_count: usize) -> Self {
        Self {
            status_display: search.status.label(),
            property_type_display: search.property_type.map(|t| t.label()),
            contact: search.contact().to_string(),
            bedrooms_range: search.bedrooms_range(),
            budget_range: search.budget_range(),
            location: search.location(),
            matches_count,
            search,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BuyerMatchesDto {
    pub count: usize,
    pub results: Vec<PropertyListItemDto>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_validation() {
        let dto: BuyerSearchDto = serde_json::from_str(
            r#"{"buyer_name":"Dana","bedrooms_min":2,"budget_max":"500000","location_city":"Brooklyn"}"#,
        )
        .unwrap();
        assert_eq!(dto.currency, "EUR");
        assert_eq!(dto.status, SearchStatus::Active);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn inverted_bedroom_bounds_are_rejected() {
        let dto: BuyerSearchDto =
            serde_json::from_str(r#"{"buyer_name":"Dana","bedrooms_min":4,"bedrooms_max":2}"#).unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn list_item_carries_display_helpers() {
        let search = BuyerSearch {
            buyer_name: "Dana".to_string(),
            buyer_phone: "555-0101".to_string(),
            bedrooms_min: 2,
            location_city: "Brooklyn".to_string(),
            property_type: Some(BuyerPropertyType::Apartment),
            ..Default::default()
        };
        let item = BuyerSearchListItemDto::new(search, 3);
        assert_eq!(item.contact, "555-0101");
        assert_eq!(item.bedrooms_range, "2+");
        assert_eq!(item.location, "Brooklyn");
        assert_eq!(item.property_type_display, Some("Apartment"));

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["matches_count"], 3);
        assert_eq!(json["buyer_name"], "Dana");
        assert_eq!(json["status_display"], "Active");
    }
}
