use chrono::{DateTime, Utc};
use num_traits::Signed;
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::propertymodel::{Category, ListingStatus, Property, PropertyImage};

fn default_currency() -> String {
    "USD".to_string()
}

pub fn non_negative(value: &BigDecimal) -> Result<(), ValidationError> {
    if value.is_negative() {
        return Err(ValidationError::new("must_not_be_negative"));
    }
    Ok(())
}

pub fn blank_or_email(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || validator::validate_email(value) {
        Ok(())
    } else {
        Err(ValidationError::new("email"))
    }
}

/// Create/update body for a listing. `status` is accepted as an alias of
/// `category` for clients using the public field name.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct PropertyDto {
    #[validate(length(min = 1, max = 255, message = "Title is required and must be at most 255 characters"))]
    pub title: String,

    #[serde(default, alias = "status")]
    pub category: Category,

    #[serde(default)]
    pub listing_status: Option<ListingStatus>,

    //Pricing
    #[validate(custom = "non_negative")]
    pub price: BigDecimal,

    #[serde(default = "default_currency")]
    #[validate(length(min = 1, max = 10, message = "Currency must be between 1 and 10 characters"))]
    pub currency: String,

    //Location
    #[validate(length(min = 1, max = 255, message = "Location is required"))]
    pub location_text: String,

    #[serde(default)]
    #[validate(length(max = 500, message = "Address must be at most 500 characters"))]
    pub address: String,

    pub latitude: Option<BigDecimal>,
    pub longitude: Option<BigDecimal>,

    #[serde(default)]
    pub map_embed: String,

    //Specifications
    #[serde(default)]
    #[validate(range(min = 0, message = "Bedrooms cannot be negative"))]
    pub bedrooms: i32,

    #[serde(default)]
    #[validate(range(min = 0, message = "Bathrooms cannot be negative"))]
    pub bathrooms: i32,

    #[validate(custom = "non_negative")]
    pub size_sqm: BigDecimal,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub featured: bool,

    pub scheduled_publish_at: Option<DateTime<Utc>>,

    //Agent
    #[serde(default)]
    #[validate(length(max = 255))]
    pub agent_name: String,

    #[serde(default)]
    #[validate(length(max = 50))]
    pub agent_phone: String,

    #[serde(default)]
    #[validate(custom = "blank_or_email")]
    pub agent_email: String,

    #[validate(url(message = "Agent photo must be a valid URL"))]
    pub agent_photo_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListingStatusDto {
    pub listing_status: ListingStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SchedulePublishDto {
    pub scheduled_publish_at: DateTime<Utc>,
}

/// Compact listing card used by both list endpoints.
#[derive(Debug, Serialize, Clone)]
pub struct PropertyListItemDto {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub status: Category,
    pub status_display: &'static str,
    pub listing_status: ListingStatus,
    pub listing_status_display: &'static str,
    pub price: BigDecimal,
    pub currency: String,
    pub location_text: String,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub size_sqm: BigDecimal,
    pub featured: bool,
    pub cover_image: Option<String>,
    pub views_count: i32,
    pub leads_count: i32,
    pub scheduled_publish_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PropertyListItemDto {
    pub fn from_property(property: &Property, cover_image: Option<String>) -> Self {
        Self {
            id: property.id,
            title: property.title.clone(),
            slug: property.slug.clone(),
            status: property.category,
            status_display: property.category.label(),
            listing_status: property.listing_status,
            listing_status_display: property.listing_status.label(),
            price: property.price.clone(),
            currency: property.currency.clone(),
            location_text: property.location_text.clone(),
            bedrooms: property.bedrooms,
            bathrooms: property.bathrooms,
            size_sqm: property.size_sqm.clone(),
            featured: property.featured,
            cover_image,
            views_count: property.views_count,
            leads_count: property.leads_count,
            scheduled_publish_at: property.scheduled_publish_at,
            created_at: property.created_at,
            updated_at: property.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PropertyDetailDto {
    #[serde(flatten)]
    pub property: Property,
    pub status_display: &'static str,
    pub listing_status_display: &'static str,
    pub images: Vec<PropertyImage>,
}

impl PropertyDetailDto {
    pub fn new(property: Property, images: Vec<PropertyImage>) -> Self {
        Self {
            status_display: property.category.label(),
            listing_status_display: property.listing_status.label(),
            property,
            images,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateImageDto {
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: String,

    #[serde(default)]
    #[validate(length(max = 255))]
    pub alt_text: String,

    #[validate(range(min = 1))]
    pub width: Option<i32>,

    #[validate(range(min = 1))]
    pub height: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateImageDto {
    #[validate(length(max = 255))]
    pub alt_text: Option<String>,

    #[validate(range(min = 0))]
    pub sort_order: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReorderImagesDto {
    #[serde(default)]
    pub order: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body() -> serde_json::Value {
        json!({
            "title": "Sea view apartment",
            "status": "RENT",
            "price": "850.00",
            "location_text": "Durrës",
            "size_sqm": 72
        })
    }

    #[test]
    fn fills_defaults_and_accepts_status_alias() {
        let dto: PropertyDto = serde_json::from_value(body()).unwrap();
        assert_eq!(dto.category, Category::Rent);
        assert_eq!(dto.currency, "USD");
        assert_eq!(dto.listing_status, None);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn rejects_negative_price_and_bad_email() {
        let mut value = body();
        value["price"] = json!("-1");
        value["agent_email"] = json!("not-an-email");
        let dto: PropertyDto = serde_json::from_value(value).unwrap();
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("price"));
        assert!(fields.contains_key("agent_email"));
    }

    #[test]
    fn blank_title_is_invalid() {
        let mut value = body();
        value["title"] = json!("");
        let dto: PropertyDto = serde_json::from_value(value).unwrap();
        assert!(dto.validate().is_err());
    }
}
