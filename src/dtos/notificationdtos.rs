use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::notificationmodel::{Notification, NotificationType, Priority};

#[derive(Debug, Deserialize, Default)]
pub struct NotificationFilterParams {
    pub is_read: Option<String>,
    #[serde(rename = "type")]
    pub notification_type: Option<String>,
    pub priority: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct MarkAllReadDto {
    #[serde(default)]
    pub include_high_priority: bool,
}

/// Coarse "how long ago" label: minutes, hours, days, then weeks.
pub fn time_ago(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - created_at).num_seconds();

    if seconds < 60 {
        "Just now".to_string()
    } else if seconds < 3_600 {
        format!("{}m ago", seconds / 60)
    } else if seconds < 86_400 {
        format!("{}h ago", seconds / 3_600)
    } else if seconds < 604_800 {
        format!("{}d ago", seconds / 86_400)
    } else {
        format!("{}w ago", seconds / 604_800)
    }
}

#[derive(Debug, Serialize)]
pub struct NotificationListItemDto {
    pub id: Uuid,
    pub notification_type: NotificationType,
    pub notification_type_display: &'static str,
    pub priority: Priority,
    pub priority_display: &'static str,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub action_url: String,
    pub time_ago: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NotificationListItemDto {
    pub fn from_notification(notification: Notification, now: DateTime<Utc>) -> Self {
        Self {
            id: notification.id,
            notification_type: notification.notification_type,
            notification_type_display: notification.notification_type.label(),
            priority: notification.priority,
            priority_display: notification.priority.label(),
            time_ago: time_ago(notification.created_at, now),
            title: notification.title,
            message: notification.message,
            is_read: notification.is_read,
            action_url: notification.action_url,
            created_at: notification.created_at,
            updated_at: notification.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_time_ago_buckets() {
        let now = Utc::now();
        assert_eq!(time_ago(now - Duration::seconds(59), now), "Just now");
        assert_eq!(time_ago(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(time_ago(now - Duration::minutes(90), now), "1h ago");
        assert_eq!(time_ago(now - Duration::hours(30), now), "1d ago");
        assert_eq!(time_ago(now - Duration::days(15), now), "2w ago");
    }

    #[test]
    fn test_future_timestamp_is_just_now() {
        let now = Utc::now();
        assert_eq!(time_ago(now + Duration::minutes(3), now), "Just now");
    }
}
