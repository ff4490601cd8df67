use std::cmp::Ordering;
use std::str::FromStr;

use serde::Deserialize;
use sqlx::types::BigDecimal;
use thiserror::Error;

use super::predicate::{listing_predicate, location_predicate, Predicate};
use super::variations::VariationTable;
use crate::models::propertymodel::{Category, ListingStatus, Property};

#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("{field} must be a decimal number, got '{value}'")]
    InvalidDecimal { field: &'static str, value: String },

    #[error("{field} must be a whole number, got '{value}'")]
    InvalidInteger { field: &'static str, value: String },

    #[error("Unknown listing status '{0}'")]
    UnknownListingStatus(String),
}

/// Raw query-string parameters of the listing endpoints. Everything arrives
/// as text; blank values count as absent.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ListingQueryParams {
    pub status: Option<String>,
    pub q: Option<String>,
    pub location: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub bedrooms: Option<String>,
    pub min_size: Option<String>,
    pub max_size: Option<String>,
    pub featured: Option<String>,
    pub ordering: Option<String>,
    /// Admin only.
    pub listing_status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingScope {
    /// Published listings only.
    Public,
    /// Every lifecycle state.
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingOrder {
    PriceAsc,
    PriceDesc,
    CreatedAsc,
    #[default]
    CreatedDesc,
    TitleAsc,
    TitleDesc,
}

impl ListingOrder {
    /// Resolve a requested ordering key against the scope's allow-list.
    /// Anything not on the list falls back to newest first.
    pub fn resolve(scope: ListingScope, requested: Option<&str>) -> Self {
        let order = match requested.map(str::trim) {
            Some("price") => ListingOrder::PriceAsc,
            Some("-price") => ListingOrder::PriceDesc,
            Some("created_at") => ListingOrder::CreatedAsc,
            Some("-created_at") => ListingOrder::CreatedDesc,
            Some("title") => ListingOrder::TitleAsc,
            Some("-title") => ListingOrder::TitleDesc,
            _ => ListingOrder::CreatedDesc,
        };

        match (scope, order) {
            (ListingScope::Public, ListingOrder::TitleAsc | ListingOrder::TitleDesc) => ListingOrder::CreatedDesc,
            (_, order) => order,
        }
    }

    pub fn compare(&self, a: &Property, b: &Property) -> Ordering {
        match self {
            ListingOrder::PriceAsc => a.price.cmp(&b.price),
            ListingOrder::PriceDesc => b.price.cmp(&a.price),
            ListingOrder::CreatedAsc => a.created_at.cmp(&b.created_at),
            ListingOrder::CreatedDesc => b.created_at.cmp(&a.created_at),
            ListingOrder::TitleAsc => a.title.cmp(&b.title),
            ListingOrder::TitleDesc => b.title.cmp(&a.title),
        }
    }

    /// `ORDER BY` body, with the id as a deterministic tiebreak.
    pub fn sql(&self) -> &'static str {
        match self {
            ListingOrder::PriceAsc => "price ASC, id ASC",
            ListingOrder::PriceDesc => "price DESC, id ASC",
            ListingOrder::CreatedAsc => "created_at ASC, id ASC",
            ListingOrder::CreatedDesc => "created_at DESC, id ASC",
            ListingOrder::TitleAsc => "title ASC, id ASC",
            ListingOrder::TitleDesc => "title DESC, id ASC",
        }
    }
}

/// A fully parsed listing search: what to keep and how to order it.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub predicate: Predicate,
    pub order: ListingOrder,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_decimal(field: &'static str, value: &Option<String>) -> Result<Option<BigDecimal>, ParamError> {
    present(value)
        .map(|raw| {
            BigDecimal::from_str(raw).map_err(|_| ParamError::InvalidDecimal {
                field,
                value: raw.to_string(),
            })
        })
        .transpose()
}

fn parse_integer(field: &'static str, value: &Option<String>) -> Result<Option<i32>, ParamError> {
    present(value)
        .map(|raw| {
            raw.parse::<i32>().map_err(|_| ParamError::InvalidInteger {
                field,
                value: raw.to_string(),
            })
        })
        .transpose()
}

pub fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

impl ListingQuery {
    pub fn from_params(
        scope: ListingScope,
        params: &ListingQueryParams,
        table: &VariationTable,
    ) -> Result<Self, ParamError> {
        let mut predicate = match scope {
            ListingScope::Public => Predicate::ListingStatusIs(ListingStatus::Published),
            ListingScope::Admin => match present(&params.listing_status) {
                Some(raw) => {
                    let status = ListingStatus::from_str(raw)
                        .map_err(|_| ParamError::UnknownListingStatus(raw.to_string()))?;
                    Predicate::ListingStatusIs(status)
                }
                None => Predicate::always(),
            },
        };

        if let Some(raw) = present(&params.status) {
            let categories = Category::from_str(raw).map(|c| vec![c]).unwrap_or_default();
            predicate = predicate.and(Predicate::CategoryIn(categories));
        }

        if let Some(term) = present(&params.q) {
            predicate = predicate.and(listing_predicate(table, term));
        }

        if let Some(term) = present(&params.location) {
            predicate = predicate.and(location_predicate(table, term));
        }

        if let Some(min) = parse_decimal("min_price", &params.min_price)? {
            predicate = predicate.and(Predicate::PriceAtLeast(min));
        }
        if let Some(max) = parse_decimal("max_price", &params.max_price)? {
            predicate = predicate.and(Predicate::PriceAtMost(max));
        }
        if let Some(min) = parse_decimal("min_size", &params.min_size)? {
            predicate = predicate.and(Predicate::SizeAtLeast(min));
        }
        if let Some(max) = parse_decimal("max_size", &params.max_size)? {
            predicate = predicate.and(Predicate::SizeAtMost(max));
        }
        if let Some(bedrooms) = parse_integer("bedrooms", &params.bedrooms)? {
            predicate = predicate.and(Predicate::BedroomsEq(bedrooms));
        }

        // Present but blank still filters: it reads as false
        if let Some(raw) = params.featured.as_deref() {
            predicate = predicate.and(Predicate::Featured(parse_flag(raw)));
        }

        Ok(ListingQuery {
            predicate,
            order: ListingOrder::resolve(scope, present(&params.ordering)),
        })
    }

    /// Filter and order an already-loaded set of listings.
    pub fn apply<'a>(&self, properties: &'a [Property]) -> Vec<&'a Property> {
        let mut matched: Vec<&Property> = properties.iter().filter(|p| self.predicate.matches(p)).collect();
        matched.sort_by(|a, b| self.order.compare(a, b));
        matched
    }
}
