use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::notificationmodel::{NewNotification, Notification, NotificationType, Priority};

#[derive(Debug, Default, Clone, Copy)]
pub struct NotificationFilter {
    pub is_read: Option<bool>,
    pub notification_type: Option<NotificationType>,
    pub priority: Option<Priority>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct UnreadCounts {
    pub unread_count: i64,
    pub high_priority_count: i64,
}

pub fn notification_list_query(filter: NotificationFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT * FROM notifications WHERE TRUE");
    if let Some(is_read) = filter.is_read {
        qb.push(" AND is_read = ").push_bind(is_read);
    }
    if let Some(notification_type) = filter.notification_type {
        qb.push(" AND notification_type = ").push_bind(notification_type);
    }
    if let Some(priority) = filter.priority {
        qb.push(" AND priority = ").push_bind(priority);
    }
    qb.push(" ORDER BY created_at DESC");
    qb
}

#[async_trait]
pub trait NotificationExt {
    async fn create_notification(
        &self,
        notification: &NewNotification,
    ) -> Result<Notification, sqlx::Error>;

    async fn get_notifications(
        &self,
        filter: NotificationFilter,
    ) -> Result<Vec<Notification>, sqlx::Error>;

    async fn get_unread_counts(&self) -> Result<UnreadCounts, sqlx::Error>;

    async fn mark_notification_read(
        &self,
        notification_id: Uuid,
    ) -> Result<Option<Notification>, sqlx::Error>;

    /// Returns how many notifications changed.
    async fn mark_all_notifications_read(
        &self,
        include_high_priority: bool,
    ) -> Result<u64, sqlx::Error>;

    async fn delete_notification(
        &self,
        notification_id: Uuid,
    ) -> Result<bool, sqlx::Error>;
}

#[async_trait]
impl NotificationExt for DBClient {
    async fn create_notification(
        &self,
        notification: &NewNotification,
    ) -> Result<Notification, sqlx::Error> {
        sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (
                notification_type, priority, title, message,
                conversation_id, contact_message_id, property_id, action_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(notification.notification_type)
        .bind(notification.priority)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.conversation_id())
        .bind(notification.contact_message_id())
        .bind(notification.property_id())
        .bind(&notification.action_url)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_notifications(
        &self,
        filter: NotificationFilter,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let mut qb = notification_list_query(filter);
        qb.build_query_as::<Notification>().fetch_all(&self.pool).await
    }

    async fn get_unread_counts(&self) -> Result<UnreadCounts, sqlx::Error> {
        let (unread_count, high_priority_count): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE priority = 'HIGH'::notification_priority)
            FROM notifications
            WHERE NOT is_read
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(UnreadCounts {
            unread_count,
            high_priority_count,
        })
    }

    async fn mark_notification_read(
        &self,
        notification_id: Uuid,
    ) -> Result<Option<Notification>, sqlx::Error> {
        sqlx::query_as::<_, Notification>(
            r#"
            UPDATE notifications
            SET is_read = TRUE, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(notification_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn mark_all_notifications_read(
        &self,
        include_high_priority: bool,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = TRUE, updated_at = NOW()
            WHERE NOT is_read AND ($1 OR priority <> 'HIGH'::notification_priority)
            "#,
        )
        .bind(include_high_priority)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete_notification(
        &self,
        notification_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(notification_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_list_query() {
        let filter = NotificationFilter {
            is_read: Some(false),
            notification_type: None,
            priority: Some(Priority::High),
        };
        assert_eq!(
            notification_list_query(filter).sql(),
            "SELECT * FROM notifications WHERE TRUE AND is_read = $1 AND priority = $2 ORDER BY created_at DESC"
        );
    }
}
