// service/listing_service.rs
use std::sync::Arc;

use crate::{
    db::propertydb::ListingRepository,
    models::{buyersearchmodel::BuyerSearch, propertymodel::Property},
    search::{
        buyer_match::{buyer_match_predicate, count_matches, find_matches},
        ListingOrder, ListingQuery, ListingQueryParams, ListingScope, VariationTable,
    },
    service::error::ServiceError,
};

/// Runs listing searches and buyer matching against freshly loaded rows.
/// Nothing is cached between calls.
#[derive(Clone)]
pub struct ListingService {
    repository: Arc<dyn ListingRepository>,
    variations: Arc<VariationTable>,
}

impl std::fmt::Debug for ListingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingService")
            .field("variations", &self.variations.len())
            .finish()
    }
}

impl ListingService {
    pub fn new(repository: Arc<dyn ListingRepository>, variations: Arc<VariationTable>) -> Self {
        Self { repository, variations }
    }

    pub async fn search(
        &self,
        scope: ListingScope,
        params: &ListingQueryParams,
    ) -> Result<Vec<Property>, ServiceError> {
        let query = ListingQuery::from_params(scope, params, &self.variations)?;
        let candidates = self.repository.find_properties(&query.predicate, query.order).await?;
        Ok(query.apply(&candidates).into_iter().cloned().collect())
    }

    pub async fn find_buyer_matches(&self, search: &BuyerSearch) -> Result<Vec<Property>, ServiceError> {
        let candidates = self
            .repository
            .find_properties(&buyer_match_predicate(search), ListingOrder::default())
            .await?;
        Ok(find_matches(search, &candidates).into_iter().cloned().collect())
    }

    pub async fn count_buyer_matches(&self, search: &BuyerSearch) -> Result<usize, ServiceError> {
        let candidates = self
            .repository
            .find_properties(&buyer_match_predicate(search), ListingOrder::default())
            .await?;
        Ok(count_matches(search, &candidates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::propertymodel::ListingStatus;
    use crate::search::test_fixtures::{brooklyn_garden_flat, sample_properties};
    use crate::search::Predicate;
    use async_trait::async_trait;
    use sqlx::types::BigDecimal;
    use std::sync::Mutex;

    /// Hands back every stored row regardless of the predicate, so the
    /// service has to do all of the filtering itself.
    #[derive(Default)]
    struct InMemoryListings {
        rows: Mutex<Vec<Property>>,
    }

    #[async_trait]
    impl ListingRepository for InMemoryListings {
        async fn find_properties(
            &self,
            _predicate: &Predicate,
            _order: ListingOrder,
        ) -> Result<Vec<Property>, sqlx::Error> {
            Ok(self.rows.lock().unwrap().clone())
        }
    }

    fn service(rows: Vec<Property>) -> (ListingService, Arc<InMemoryListings>) {
        let repository = Arc::new(InMemoryListings {
            rows: Mutex::new(rows),
        });
        let service = ListingService::new(repository.clone(), Arc::new(VariationTable::albanian()));
        (service, repository)
    }

    fn params(query: &str) -> ListingQueryParams {
        serde_urlencoded::from_str(query).unwrap()
    }

    #[tokio::test]
    async fn korca_search_finds_korce_listing() {
        let (service, _) = service(sample_properties());
        let results = service.search(ListingScope::Public, &params("q=korca")).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].location_text, "Korçë, Albania");
    }

    #[tokio::test]
    async fn public_search_never_leaks_drafts() {
        let (service, _) = service(sample_properties());
        let results = service
            .search(ListingScope::Public, &params("location=tirana"))
            .await
            .unwrap();
        assert!(results.is_empty());

        let admin = service
            .search(ListingScope::Admin, &params("location=tirana"))
            .await
            .unwrap();
        assert_eq!(admin.len(), 1);
    }

    #[tokio::test]
    async fn bad_numbers_are_caller_errors() {
        let (service, _) = service(sample_properties());
        let err = service
            .search(ListingScope::Public, &params("max_price=lots"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidParam(_)));
    }

    #[tokio::test]
    async fn buyer_matches_follow_publication() {
        let (service, repository) = service(sample_properties());
        let buyer = BuyerSearch {
            bedrooms_min: 2,
            budget_max: Some(BigDecimal::from(500_000)),
            location_city: "Brooklyn".to_string(),
            ..Default::default()
        };
        assert_eq!(service.count_buyer_matches(&buyer).await.unwrap(), 1);

        repository
            .rows
            .lock()
            .unwrap()
            .push(brooklyn_garden_flat(ListingStatus::Published));

        assert_eq!(service.count_buyer_matches(&buyer).await.unwrap(), 2);
        let titles: Vec<String> = service
            .find_buyer_matches(&buyer)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["Brooklyn garden flat", "Brooklyn brownstone"]);
    }
}
