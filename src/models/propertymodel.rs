use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use sqlx::{types::BigDecimal, FromRow};
use uuid::Uuid;

/// What kind of deal a listing is offered under.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Hash, Default)]
#[sqlx(type_name = "property_category", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    #[default]
    Buy,
    Rent,
    Commercial,
    Development,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Buy,
        Category::Rent,
        Category::Commercial,
        Category::Development,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Buy => "BUY",
            Category::Rent => "RENT",
            Category::Commercial => "COMMERCIAL",
            Category::Development => "DEVELOPMENT",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Buy => "For Sale",
            Category::Rent => "For Rent",
            Category::Commercial => "Commercial",
            Category::Development => "New Development",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| format!("Unknown property category: {}", s))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publication lifecycle. Only `Published` listings are visible to the public.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Hash, Default)]
#[sqlx(type_name = "listing_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingStatus {
    #[default]
    Draft,
    Published,
    Sold,
    Archived,
}

impl ListingStatus {
    pub const ALL: [ListingStatus; 4] = [
        ListingStatus::Draft,
        ListingStatus::Published,
        ListingStatus::Sold,
        ListingStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Draft => "DRAFT",
            ListingStatus::Published => "PUBLISHED",
            ListingStatus::Sold => "SOLD",
            ListingStatus::Archived => "ARCHIVED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ListingStatus::Draft => "Draft",
            ListingStatus::Published => "Published",
            ListingStatus::Sold => "Sold",
            ListingStatus::Archived => "Archived",
        }
    }

    pub fn is_public(&self) -> bool {
        *self == ListingStatus::Published
    }
}

impl FromStr for ListingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        ListingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| format!("Unknown listing status: {}", s))
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, Default, PartialEq)]
pub struct Property {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub category: Category,

    // Pricing
    pub price: BigDecimal,
    pub currency: String,

    // Location
    pub location_text: String,
    pub address: String,
    pub latitude: Option<BigDecimal>,
    pub longitude: Option<BigDecimal>,
    pub map_embed: String,

    // Specifications
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub size_sqm: BigDecimal,
    pub description: String,
    pub featured: bool,

    // Listing management
    pub listing_status: ListingStatus,
    pub views_count: i32,
    pub leads_count: i32,
    pub scheduled_publish_at: Option<DateTime<Utc>>,

    // Agent
    pub agent_name: String,
    pub agent_phone: String,
    pub agent_email: String,
    pub agent_photo_url: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct PropertyImage {
    pub id: Uuid,
    pub property_id: Uuid,
    pub image_url: String,
    pub alt_text: String,
    pub sort_order: i32,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("rent".parse::<Category>(), Ok(Category::Rent));
        assert_eq!(" Commercial ".parse::<Category>(), Ok(Category::Commercial));
        assert!("castle".parse::<Category>().is_err());
    }

    #[test]
    fn only_published_is_public() {
        for status in ListingStatus::ALL {
            assert_eq!(status.is_public(), status == ListingStatus::Published);
        }
        assert_eq!(Property::default().listing_status, ListingStatus::Draft);
    }

    #[test]
    fn enums_serialize_in_upper_case() {
        assert_eq!(serde_json::to_string(&Category::Development).unwrap(), "\"DEVELOPMENT\"");
        assert_eq!(serde_json::to_string(&ListingStatus::Published).unwrap(), "\"PUBLISHED\"");
    }
}
