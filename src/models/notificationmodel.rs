use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "notification_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    NewChat,
    NewLead,
    PropertyInquiry,
}

impl NotificationType {
    pub fn label(&self) -> &'static str {
        match self {
            NotificationType::NewChat => "New Chat Message",
            NotificationType::NewLead => "New Lead",
            NotificationType::PropertyInquiry => "Property Inquiry",
        }
    }
}

impl FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "NEW_CHAT" => Ok(NotificationType::NewChat),
            "NEW_LEAD" => Ok(NotificationType::NewLead),
            "PROPERTY_INQUIRY" => Ok(NotificationType::PropertyInquiry),
            _ => Err(format!("Unknown notification type: {}", s)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "notification_priority", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    #[default]
    Normal,
    High,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Normal => "Normal",
            Priority::High => "High",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "NORMAL" => Ok(Priority::Normal),
            "HIGH" => Ok(Priority::High),
            _ => Err(format!("Unknown notification priority: {}", s)),
        }
    }
}

/// The one record a notification points at, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationTarget {
    Conversation(Uuid),
    ContactMessage(Uuid),
    Property(Uuid),
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub notification_type: NotificationType,
    pub priority: Priority,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub conversation_id: Option<Uuid>,
    pub contact_message_id: Option<Uuid>,
    pub property_id: Option<Uuid>,
    pub action_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A notification that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub notification_type: NotificationType,
    pub priority: Priority,
    pub title: String,
    pub message: String,
    pub target: Option<NotificationTarget>,
    pub action_url: String,
}

impl NewNotification {
    pub fn conversation_id(&self) -> Option<Uuid> {
        match self.target {
            Some(NotificationTarget::Conversation(id)) => Some(id),
            _ => None,
        }
    }

    pub fn contact_message_id(&self) -> Option<Uuid> {
        match self.target {
            Some(NotificationTarget::ContactMessage(id)) => Some(id),
            _ => None,
        }
    }

    pub fn property_id(&self) -> Option<Uuid> {
        match self.target {
            Some(NotificationTarget::Property(id)) => Some(id),
            _ => None,
        }
    }
}
