use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    db::db::DBClient,
    dtos::propertydtos::{CreateImageDto, PropertyDto, UpdateImageDto},
    models::propertymodel::{ListingStatus, Property, PropertyImage},
    search::{ListingOrder, Predicate},
    utils::slug::{next_free_slug, slugify},
};

/// Source of listings for the search pipeline. The predicate is pushed down
/// as far as SQL can express it; callers re-check it in process.
#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn find_properties(
        &self,
        predicate: &Predicate,
        order: ListingOrder,
    ) -> Result<Vec<Property>, sqlx::Error>;
}

#[async_trait]
pub trait PropertyExt {
    async fn create_property(
        &self,
        property_data: PropertyDto,
    ) -> Result<Property, sqlx::Error>;

    async fn get_property_by_id(
        &self,
        property_id: Uuid,
    ) -> Result<Option<Property>, sqlx::Error>;

    /// Published listing by slug; counts the view.
    async fn view_published_property(
        &self,
        slug: &str,
    ) -> Result<Option<Property>, sqlx::Error>;

    async fn update_property(
        &self,
        property_id: Uuid,
        property_data: PropertyDto,
    ) -> Result<Option<Property>, sqlx::Error>;

    async fn delete_property(
        &self,
        property_id: Uuid,
    ) -> Result<bool, sqlx::Error>;

    async fn duplicate_property(
        &self,
        property_id: Uuid,
    ) -> Result<Option<Property>, sqlx::Error>;

    async fn set_listing_status(
        &self,
        property_id: Uuid,
        status: ListingStatus,
    ) -> Result<Option<Property>, sqlx::Error>;

    async fn toggle_featured(
        &self,
        property_id: Uuid,
    ) -> Result<Option<Property>, sqlx::Error>;

    async fn schedule_publish(
        &self,
        property_id: Uuid,
        publish_at: DateTime<Utc>,
    ) -> Result<Option<Property>, sqlx::Error>;

    /// Publish every draft whose scheduled time has passed.
    async fn publish_due_properties(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Property>, sqlx::Error>;
}

#[async_trait]
pub trait PropertyImageExt {
    async fn get_property_images(
        &self,
        property_id: Uuid,
    ) -> Result<Vec<PropertyImage>, sqlx::Error>;

    /// Lowest-`sort_order` image URL per property.
    async fn get_cover_images(
        &self,
        property_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, String>, sqlx::Error>;

    async fn add_property_image(
        &self,
        property_id: Uuid,
        image: CreateImageDto,
    ) -> Result<PropertyImage, sqlx::Error>;

    async fn update_property_image(
        &self,
        property_id: Uuid,
        image_id: Uuid,
        image: UpdateImageDto,
    ) -> Result<Option<PropertyImage>, sqlx::Error>;

    async fn delete_property_image(
        &self,
        property_id: Uuid,
        image_id: Uuid,
    ) -> Result<bool, sqlx::Error>;

    /// Assign `sort_order` = position in `order`. Ids that do not belong to
    /// the property are skipped.
    async fn reorder_property_images(
        &self,
        property_id: Uuid,
        order: &[Uuid],
    ) -> Result<(), sqlx::Error>;
}

/// `SELECT` for the listing search with the SQL-expressible part of the
/// predicate and a deterministic order.
pub fn listing_select(predicate: &Predicate, order: ListingOrder) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT * FROM properties WHERE ");
    predicate.push_sql(&mut qb);
    qb.push(" ORDER BY ");
    qb.push(order.sql());
    qb
}

impl DBClient {
    async fn unique_slug(&self, title: &str) -> Result<String, sqlx::Error> {
        let base = slugify(title);
        let taken: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT slug FROM properties
            WHERE slug = $1 OR slug LIKE $2
            "#,
        )
        .bind(&base)
        .bind(format!("{}-%", base))
        .fetch_all(&self.pool)
        .await?;

        let taken: HashSet<String> = taken.into_iter().collect();
        Ok(next_free_slug(&base, &taken))
    }
}

#[async_trait]
impl ListingRepository for DBClient {
    async fn find_properties(
        &self,
        predicate: &Predicate,
        order: ListingOrder,
    ) -> Result<Vec<Property>, sqlx::Error> {
        let mut qb = listing_select(predicate, order);
        qb.build_query_as::<Property>().fetch_all(&self.pool).await
    }
}

#[async_trait]
impl PropertyExt for DBClient {
    async fn create_property(
        &self,
        property_data: PropertyDto,
    ) -> Result<Property, sqlx::Error> {
        let slug = self.unique_slug(&property_data.title).await?;

        sqlx::query_as::<_, Property>(
            r#"
            INSERT INTO properties (
                title, slug, category, price, currency, location_text, address,
                latitude, longitude, map_embed, bedrooms, bathrooms, size_sqm,
                description, featured, listing_status, scheduled_publish_at,
                agent_name, agent_phone, agent_email, agent_photo_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21)
            RETURNING *
            "#,
        )
        .bind(&property_data.title)
        .bind(slug)
        .bind(property_data.category)
        .bind(&property_data.price)
        .bind(&property_data.currency)
        .bind(&property_data.location_text)
        .bind(&property_data.address)
        .bind(&property_data.latitude)
        .bind(&property_data.longitude)
        .bind(&property_data.map_embed)
        .bind(property_data.bedrooms)
        .bind(property_data.bathrooms)
        .bind(&property_data.size_sqm)
        .bind(&property_data.description)
        .bind(property_data.featured)
        .bind(property_data.listing_status.unwrap_or_default())
        .bind(property_data.scheduled_publish_at)
        .bind(&property_data.agent_name)
        .bind(&property_data.agent_phone)
        .bind(&property_data.agent_email)
        .bind(&property_data.agent_photo_url)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_property_by_id(
        &self,
        property_id: Uuid,
    ) -> Result<Option<Property>, sqlx::Error> {
        sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE id = $1")
            .bind(property_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn view_published_property(
        &self,
        slug: &str,
    ) -> Result<Option<Property>, sqlx::Error> {
        sqlx::query_as::<_, Property>(
            r#"
            UPDATE properties
            SET views_count = views_count + 1
            WHERE slug = $1 AND listing_status = $2
            RETURNING *
            "#,
        )
        .bind(slug)
        .bind(ListingStatus::Published)
        .fetch_optional(&self.pool)
        .await
    }

    async fn update_property(
        &self,
        property_id: Uuid,
        property_data: PropertyDto,
    ) -> Result<Option<Property>, sqlx::Error> {
        sqlx::query_as::<_, Property>(
            r#"
            UPDATE properties
            SET title = $2,
                category = $3,
                price = $4,
                currency = $5,
                location_text = $6,
                address = $7,
                latitude = $8,
                longitude = $9,
                map_embed = $10,
                bedrooms = $11,
                bathrooms = $12,
                size_sqm = $13,
                description = $14,
                featured = $15,
                listing_status = COALESCE($16, listing_status),
                scheduled_publish_at = $17,
                agent_name = $18,
                agent_phone = $19,
                agent_email = $20,
                agent_photo_url = $21,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(property_id)
        .bind(&property_data.title)
        .bind(property_data.category)
        .bind(&property_data.price)
        .bind(&property_data.currency)
        .bind(&property_data.location_text)
        .bind(&property_data.address)
        .bind(&property_data.latitude)
        .bind(&property_data.longitude)
        .bind(&property_data.map_embed)
        .bind(property_data.bedrooms)
        .bind(property_data.bathrooms)
        .bind(&property_data.size_sqm)
        .bind(&property_data.description)
        .bind(property_data.featured)
        .bind(property_data.listing_status)
        .bind(property_data.scheduled_publish_at)
        .bind(&property_data.agent_name)
        .bind(&property_data.agent_phone)
        .bind(&property_data.agent_email)
        .bind(&property_data.agent_photo_url)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_property(
        &self,
        property_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(property_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn duplicate_property(
        &self,
        property_id: Uuid,
    ) -> Result<Option<Property>, sqlx::Error> {
        let Some(original) = self.get_property_by_id(property_id).await? else {
            return Ok(None);
        };

        let title = format!("{} (Copy)", original.title);
        let slug = self.unique_slug(&title).await?;
        let mut tx = self.pool.begin().await?;

        let copy = sqlx::query_as::<_, Property>(
            r#"
            INSERT INTO properties (
                title, slug, category, price, currency, location_text, address,
                latitude, longitude, map_embed, bedrooms, bathrooms, size_sqm,
                description, featured, listing_status,
                agent_name, agent_phone, agent_email, agent_photo_url
            )
            SELECT $2, $3, category, price, currency, location_text, address,
                   latitude, longitude, map_embed, bedrooms, bathrooms, size_sqm,
                   description, FALSE, $4,
                   agent_name, agent_phone, agent_email, agent_photo_url
            FROM properties
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(property_id)
        .bind(&title)
        .bind(slug)
        .bind(ListingStatus::Draft)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO property_images (property_id, image_url, alt_text, sort_order, width, height)
            SELECT $2, image_url, alt_text, sort_order, width, height
            FROM property_images
            WHERE property_id = $1
            "#,
        )
        .bind(property_id)
        .bind(copy.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(copy))
    }

    async fn set_listing_status(
        &self,
        property_id: Uuid,
        status: ListingStatus,
    ) -> Result<Option<Property>, sqlx::Error> {
        // Publishing now supersedes any pending schedule
        sqlx::query_as::<_, Property>(
            r#"
            UPDATE properties
            SET listing_status = $2,
                scheduled_publish_at = CASE WHEN $2 = 'PUBLISHED'::listing_status
                                            THEN NULL ELSE scheduled_publish_at END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(property_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
    }

    async fn toggle_featured(
        &self,
        property_id: Uuid,
    ) -> Result<Option<Property>, sqlx::Error> {
        sqlx::query_as::<_, Property>(
            r#"
            UPDATE properties
            SET featured = NOT featured, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(property_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn schedule_publish(
        &self,
        property_id: Uuid,
        publish_at: DateTime<Utc>,
    ) -> Result<Option<Property>, sqlx::Error> {
        sqlx::query_as::<_, Property>(
            r#"
            UPDATE properties
            SET scheduled_publish_at = $2, listing_status = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(property_id)
        .bind(publish_at)
        .bind(ListingStatus::Draft)
        .fetch_optional(&self.pool)
        .await
    }

    async fn publish_due_properties(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Property>, sqlx::Error> {
        sqlx::query_as::<_, Property>(
            r#"
            UPDATE properties
            SET listing_status = $2, scheduled_publish_at = NULL, updated_at = NOW()
            WHERE listing_status = $3
              AND scheduled_publish_at IS NOT NULL
              AND scheduled_publish_at <= $1
            RETURNING *
            "#,
        )
        .bind(now)
        .bind(ListingStatus::Published)
        .bind(ListingStatus::Draft)
        .fetch_all(&self.pool)
        .await
    }
}

#[async_trait]
impl PropertyImageExt for DBClient {
    async fn get_property_images(
        &self,
        property_id: Uuid,
    ) -> Result<Vec<PropertyImage>, sqlx::Error> {
        sqlx::query_as::<_, PropertyImage>(
            r#"
            SELECT * FROM property_images
            WHERE property_id = $1
            ORDER BY sort_order ASC, created_at ASC
            "#,
        )
        .bind(property_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_cover_images(
        &self,
        property_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, String>, sqlx::Error> {
        if property_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(Uuid, String)> = sqlx::query_as(
            r#"
            SELECT DISTINCT ON (property_id) property_id, image_url
            FROM property_images
            WHERE property_id = ANY($1)
            ORDER BY property_id, sort_order ASC, created_at ASC
            "#,
        )
        .bind(property_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    async fn add_property_image(
        &self,
        property_id: Uuid,
        image: CreateImageDto,
    ) -> Result<PropertyImage, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        // Serialize concurrent uploads for the same property
        sqlx::query("SELECT id FROM properties WHERE id = $1 FOR UPDATE")
            .bind(property_id)
            .execute(&mut *tx)
            .await?;

        let image = sqlx::query_as::<_, PropertyImage>(
            r#"
            INSERT INTO property_images (property_id, image_url, alt_text, sort_order, width, height)
            VALUES (
                $1, $2, $3,
                COALESCE((SELECT MAX(sort_order) + 1 FROM property_images WHERE property_id = $1), 0),
                $4, $5
            )
            RETURNING *
            "#,
        )
        .bind(property_id)
        .bind(&image.image_url)
        .bind(&image.alt_text)
        .bind(image.width)
        .bind(image.height)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(image)
    }

    async fn update_property_image(
        &self,
        property_id: Uuid,
        image_id: Uuid,
        image: UpdateImageDto,
    ) -> Result<Option<PropertyImage>, sqlx::Error> {
        sqlx::query_as::<_, PropertyImage>(
            r#"
            UPDATE property_images
            SET alt_text = COALESCE($3, alt_text),
                sort_order = COALESCE($4, sort_order)
            WHERE id = $2 AND property_id = $1
            RETURNING *
            "#,
        )
        .bind(property_id)
        .bind(image_id)
        .bind(image.alt_text)
        .bind(image.sort_order)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_property_image(
        &self,
        property_id: Uuid,
        image_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM property_images WHERE id = $2 AND property_id = $1")
            .bind(property_id)
            .bind(image_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn reorder_property_images(
        &self,
        property_id: Uuid,
        order: &[Uuid],
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        for (index, image_id) in order.iter().enumerate() {
            sqlx::query("UPDATE property_images SET sort_order = $3 WHERE id = $2 AND property_id = $1")
                .bind(property_id)
                .bind(image_id)
                .bind(index as i32)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::propertymodel::Category;

    #[test]
    fn listing_select_pushes_down_structured_criteria() {
        let predicate = Predicate::ListingStatusIs(ListingStatus::Published)
            .and(Predicate::CategoryIn(vec![Category::Commercial]))
            .and(Predicate::BedroomsEq(2));
        let qb = listing_select(&predicate, ListingOrder::PriceDesc);
        assert_eq!(
            qb.sql(),
            "SELECT * FROM properties WHERE (listing_status = $1 AND category IN ($2) AND bedrooms = $3) \
             ORDER BY price DESC, id ASC"
        );
    }

    #[test]
    fn listing_select_without_criteria() {
        let qb = listing_select(&Predicate::always(), ListingOrder::default());
        assert_eq!(
            qb.sql(),
            "SELECT * FROM properties WHERE TRUE ORDER BY created_at DESC, id ASC"
        );
    }
}
