use chrono::{TimeZone, Utc};
use sqlx::types::BigDecimal;
use uuid::Uuid;

use crate::models::propertymodel::{Category, ListingStatus, Property};

pub fn property(title: &str, location_text: &str, address: &str) -> Property {
    Property {
        id: Uuid::new_v4(),
        title: title.to_string(),
        slug: crate::utils::slug::slugify(title),
        location_text: location_text.to_string(),
        address: address.to_string(),
        listing_status: ListingStatus::Published,
        currency: "USD".to_string(),
        ..Default::default()
    }
}

fn listing(
    title: &str,
    category: Category,
    status: ListingStatus,
    location_text: &str,
    price: i64,
    bedrooms: i32,
    size_sqm: i64,
    featured: bool,
    day: u32,
) -> Property {
    Property {
        category,
        listing_status: status,
        price: BigDecimal::from(price),
        bedrooms,
        size_sqm: BigDecimal::from(size_sqm),
        featured,
        created_at: Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0).unwrap(),
        ..property(title, location_text, "")
    }
}

/// Five listings covering every category and lifecycle state that matters to
/// the public path: three published, one draft, one archived.
pub fn sample_properties() -> Vec<Property> {
    vec![
        listing(
            "Brooklyn brownstone",
            Category::Buy,
            ListingStatus::Published,
            "Brooklyn Heights, Brooklyn",
            480_000,
            4,
            240,
            true,
            1,
        ),
        listing(
            "Durrës seafront plot",
            Category::Development,
            ListingStatus::Archived,
            "Durrës, Albania",
            90_000,
            0,
            600,
            false,
            2,
        ),
        listing(
            "Korçë stone house",
            Category::Rent,
            ListingStatus::Published,
            "Korçë, Albania",
            1_200,
            3,
            140,
            false,
            3,
        ),
        listing(
            "Brooklyn office floor",
            Category::Commercial,
            ListingStatus::Published,
            "Williamsburg, Brooklyn",
            350_000,
            0,
            180,
            false,
            4,
        ),
        listing(
            "Tirone loft",
            Category::Buy,
            ListingStatus::Draft,
            "Tirone, Albania",
            120_000,
            2,
            80,
            false,
            5,
        ),
    ]
}

/// A listing that satisfies a two-bedroom Brooklyn search under 500k once
/// it is published.
pub fn brooklyn_garden_flat(status: ListingStatus) -> Property {
    listing(
        "Brooklyn garden flat",
        Category::Buy,
        status,
        "Park Slope, Brooklyn",
        450_000,
        2,
        95,
        false,
        6,
    )
}
