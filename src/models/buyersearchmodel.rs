use std::str::FromStr;

use chrono::{DateTime, Utc};
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use sqlx::{types::BigDecimal, FromRow};
use uuid::Uuid;

use super::propertymodel::Category;
use crate::utils::decimal::{format_thousands, BigDecimalHelpers};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "buyer_search_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchStatus {
    #[default]
    Active,
    Paused,
    Fulfilled,
}

impl SearchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchStatus::Active => "ACTIVE",
            SearchStatus::Paused => "PAUSED",
            SearchStatus::Fulfilled => "FULFILLED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SearchStatus::Active => "Active",
            SearchStatus::Paused => "Paused",
            SearchStatus::Fulfilled => "Fulfilled",
        }
    }
}

impl FromStr for SearchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ACTIVE" => Ok(SearchStatus::Active),
            "PAUSED" => Ok(SearchStatus::Paused),
            "FULFILLED" => Ok(SearchStatus::Fulfilled),
            _ => Err(format!("Unknown buyer search status: {}", s)),
        }
    }
}

/// The kind of home a buyer asked for. Coarser than `Category`: only the
/// residential/commercial split is used when matching.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "buyer_property_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuyerPropertyType {
    Apartment,
    House,
    Villa,
    Commercial,
}

impl BuyerPropertyType {
    pub fn label(&self) -> &'static str {
        match self {
            BuyerPropertyType::Apartment => "Apartment",
            BuyerPropertyType::House => "House",
            BuyerPropertyType::Villa => "Villa",
            BuyerPropertyType::Commercial => "Commercial",
        }
    }

    /// Listing categories that can satisfy this request.
    pub fn categories(&self) -> Vec<Category> {
        match self {
            BuyerPropertyType::Commercial => vec![Category::Commercial],
            _ => vec![Category::Buy, Category::Rent],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, Default, PartialEq)]
pub struct BuyerSearch {
    pub id: Uuid,

    // Buyer
    pub buyer_name: String,
    pub buyer_email: String,
    pub buyer_phone: String,

    // Criteria
    pub bedrooms_min: i32,
    pub bedrooms_max: Option<i32>,
    pub budget_min: Option<BigDecimal>,
    pub budget_max: Option<BigDecimal>,
    pub currency: String,
    pub location_city: String,
    pub location_area: String,
    pub property_type: Option<BuyerPropertyType>,

    // Nice-to-haves, recorded for the agent
    pub parking_required: bool,
    pub balcony_required: bool,
    pub furnished_required: bool,

    pub notes: String,
    pub status: SearchStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// A zero bound counts as "not set", the same as leaving the field empty.
impl BuyerSearch {
    pub fn min_bedrooms(&self) -> Option<i32> {
        (self.bedrooms_min != 0).then_some(self.bedrooms_min)
    }

    pub fn max_bedrooms(&self) -> Option<i32> {
        self.bedrooms_max.filter(|max| *max != 0)
    }

    pub fn min_budget(&self) -> Option<&BigDecimal> {
        self.budget_min.as_ref().filter(|min| !min.is_zero())
    }

    pub fn max_budget(&self) -> Option<&BigDecimal> {
        self.budget_max.as_ref().filter(|max| !max.is_zero())
    }

    pub fn city(&self) -> Option<&str> {
        (!self.location_city.is_empty()).then_some(self.location_city.as_str())
    }

    pub fn contact(&self) -> &str {
        if !self.buyer_phone.is_empty() {
            &self.buyer_phone
        } else if !self.buyer_email.is_empty() {
            &self.buyer_email
        } else {
            "-"
        }
    }

    pub fn bedrooms_range(&self) -> String {
        match (self.max_bedrooms(), self.min_bedrooms()) {
            (Some(max), _) => format!("{}-{}", self.bedrooms_min, max),
            (None, Some(min)) => format!("{}+", min),
            (None, None) => "Any".to_string(),
        }
    }

    pub fn budget_range(&self) -> String {
        let whole = |value: &BigDecimal| format_thousands(value.to_i64_or_zero());
        match (self.min_budget(), self.max_budget()) {
            (Some(min), Some(max)) => format!("{} - {}", whole(min), whole(max)),
            (Some(min), None) => format!("{}+", whole(min)),
            (None, Some(max)) => format!("Up to {}", whole(max)),
            (None, None) => "Any".to_string(),
        }
    }

    pub fn location(&self) -> String {
        let parts: Vec<&str> = [self.location_city.as_str(), self.location_area.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            "Any".to_string()
        } else {
            parts.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search() -> BuyerSearch {
        BuyerSearch {
            buyer_name: "Arben".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn commercial_maps_to_commercial_only() {
        assert_eq!(BuyerPropertyType::Commercial.categories(), vec![Category::Commercial]);
        for residential in [BuyerPropertyType::Apartment, BuyerPropertyType::House, BuyerPropertyType::Villa] {
            assert_eq!(residential.categories(), vec![Category::Buy, Category::Rent]);
        }
    }

    #[test]
    fn zero_bounds_are_unset() {
        let s = BuyerSearch {
            bedrooms_min: 0,
            bedrooms_max: Some(0),
            budget_min: Some(BigDecimal::from(0)),
            ..search()
        };
        assert_eq!(s.min_bedrooms(), None);
        assert_eq!(s.max_bedrooms(), None);
        assert!(s.min_budget().is_none());
    }

    #[test]
    fn display_helpers() {
        let s = BuyerSearch {
            bedrooms_min: 2,
            bedrooms_max: Some(4),
            budget_min: Some(BigDecimal::from(150_000)),
            budget_max: Some(BigDecimal::from(1_250_000)),
            location_city: "Tirana".to_string(),
            location_area: "Blloku".to_string(),
            buyer_email: "arben@example.com".to_string(),
            ..search()
        };
        assert_eq!(s.bedrooms_range(), "2-4");
        assert_eq!(s.budget_range(), "150,000 - 1,250,000");
        assert_eq!(s.location(), "Tirana, Blloku");
        assert_eq!(s.contact(), "arben@example.com");

        let open = search();
        assert_eq!(open.bedrooms_range(), "Any");
        assert_eq!(open.budget_range(), "Any");
        assert_eq!(open.location(), "Any");
        assert_eq!(open.contact(), "-");

        let floor_only = BuyerSearch {
            bedrooms_min: 3,
            budget_max: Some(BigDecimal::from(90_000)),
            ..search()
        };
        assert_eq!(floor_only.bedrooms_range(), "3+");
        assert_eq!(floor_only.budget_range(), "Up to 90,000");
    }

    #[test]
    fn status_parses() {
        assert_eq!("paused".parse::<SearchStatus>(), Ok(SearchStatus::Paused));
        assert!("done".parse::<SearchStatus>().is_err());
    }
}
