use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::db::DBClient;
use crate::{
    dtos::buyersearchdtos::BuyerSearchDto,
    models::buyersearchmodel::{BuyerSearch, SearchStatus},
};

/// `ORDER BY` body for a requested ordering key; unknown keys sort newest first.
pub fn buyer_search_order(requested: Option<&str>) -> &'static str {
    match requested.map(str::trim) {
        Some("created_at") => "created_at ASC, id ASC",
        Some("updated_at") => "updated_at ASC, id ASC",
        Some("-updated_at") => "updated_at DESC, id ASC",
        Some("buyer_name") => "buyer_name ASC, id ASC",
        Some("-buyer_name") => "buyer_name DESC, id ASC",
        _ => "created_at DESC, id ASC",
    }
}

pub fn buyer_search_list_query(
    status: Option<SearchStatus>,
    ordering: Option<&str>,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT * FROM buyer_searches");
    if let Some(status) = status {
        qb.push(" WHERE status = ").push_bind(status);
    }
    qb.push(" ORDER BY ").push(buyer_search_order(ordering));
    qb
}

#[async_trait]
pub trait BuyerSearchExt {
    async fn create_buyer_search(
        &self,
        data: BuyerSearchDto,
    ) -> Result<BuyerSearch, sqlx::Error>;

    async fn get_buyer_searches(
        &self,
        status: Option<SearchStatus>,
        ordering: Option<&str>,
    ) -> Result<Vec<BuyerSearch>, sqlx::Error>;

    async fn get_buyer_search(
        &self,
        search_id: Uuid,
    ) -> Result<Option<BuyerSearch>, sqlx::Error>;

    async fn update_buyer_search(
        &self,
        search_id: Uuid,
        data: BuyerSearchDto,
    ) -> Result<Option<BuyerSearch>, sqlx::Error>;

    async fn set_buyer_search_status(
        &self,
        search_id: Uuid,
        status: SearchStatus,
    ) -> Result<Option<BuyerSearch>, sqlx::Error>;

    async fn delete_buyer_search(
        &self,
        search_id: Uuid,
    ) -> Result<bool, sqlx::Error>;
}

#[async_trait]
impl BuyerSearchExt for DBClient {
    async fn create_buyer_search(
        &self,
        data: BuyerSearchDto,
    ) -> Result<BuyerSearch, sqlx::Error> {
        sqlx::query_as::<_, BuyerSearch>(
            r#"
            INSERT INTO buyer_searches (
                buyer_name, buyer_email, buyer_phone, bedrooms_min, bedrooms_max,
                budget_min, budget_max, currency, location_city, location_area,
                property_type, parking_required, balcony_required, furnished_required,
                notes, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(&data.buyer_name)
        .bind(&data.buyer_email)
        .bind(&data.buyer_phone)
        .bind(data.bedrooms_min)
        .bind(data.bedrooms_max)
        .bind(&data.budget_min)
        .bind(&data.budget_max)
        .bind(&data.currency)
        .bind(&data.location_city)
        .bind(&data.location_area)
        .bind(data.property_type)
        .bind(data.parking_required)
        .bind(data.balcony_required)
        .bind(data.furnished_required)
        .bind(&data.notes)
        .bind(data.status)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_buyer_searches(
        &self,
        status: Option<SearchStatus>,
        ordering: Option<&str>,
    ) -> Result<Vec<BuyerSearch>, sqlx::Error> {
        let mut qb = buyer_search_list_query(status, ordering);
        qb.build_query_as::<BuyerSearch>().fetch_all(&self.pool).await
    }

    async fn get_buyer_search(
        &self,
        search_id: Uuid,
    ) -> Result<Option<BuyerSearch>, sqlx::Error> {
        sqlx::query_as::<_, BuyerSearch>("SELECT * FROM buyer_searches WHERE id = $1")
            .bind(search_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn update_buyer_search(
        &self,
        search_id: Uuid,
        data: BuyerSearchDto,
    ) -> Result<Option<BuyerSearch>, sqlx::Error> {
        sqlx::query_as::<_, BuyerSearch>(
            r#"
            UPDATE buyer_searches
            SET buyer_name = $2,
                buyer_email = $3,
                buyer_phone = $4,
                bedrooms_min = $5,
                bedrooms_max = $6,
                budget_min = $7,
                budget_max = $8,
                currency = $9,
                location_city = $10,
                location_area = $11,
                property_type = $12,
                parking_required = $13,
                balcony_required = $14,
                furnished_required = $15,
                notes = $16,
                status = $17,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(search_id)
        .bind(&data.buyer_name)
        .bind(&data.buyer_email)
        .bind(&data.buyer_phone)
        .bind(data.bedrooms_min)
        .bind(data.bedrooms_max)
        .bind(&data.budget_min)
        .bind(&data.budget_max)
        .bind(&data.currency)
        .bind(&data.location_city)
        .bind(&data.location_area)
        .bind(data.property_type)
        .bind(data.parking_required)
        .bind(data.balcony_required)
        .bind(data.furnished_required)
        .bind(&data.notes)
        .bind(data.status)
        .fetch_optional(&self.pool)
        .await
    }

    async fn set_buyer_search_status(
        &self,
        search_id: Uuid,
        status: SearchStatus,
    ) -> Result<Option<BuyerSearch>, sqlx::Error> {
        sqlx::query_as::<_, BuyerSearch>(
            r#"
            UPDATE buyer_searches
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(search_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_buyer_search(
        &self,
        search_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM buyer_searches WHERE id = $1")
            .bind(search_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buyer_search_order() {
        assert_eq!(buyer_search_order(Some("-buyer_name")), "buyer_name DESC, id ASC");
        assert_eq!(buyer_search_order(Some("budget; DROP TABLE x")), "created_at DESC, id ASC");
        assert_eq!(buyer_search_order(None), "created_at DESC, id ASC");
    }

    #[test]
    fn test_buyer_search_list_query() {
        assert_eq!(
            buyer_search_list_query(Some(SearchStatus::Active), Some("created_at")).sql(),
            "SELECT * FROM buyer_searches WHERE status = $1 ORDER BY created_at ASC, id ASC"
        );
    }
}
