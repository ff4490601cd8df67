//! Listing search and buyer matching over already-loaded properties.

pub mod buyer_match;
pub mod listing_query;
pub mod normalizer;
pub mod predicate;
pub mod variations;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use listing_query::{ListingOrder, ListingQuery, ListingQueryParams, ListingScope, ParamError};
pub use predicate::Predicate;
pub use variations::VariationTable;
