use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::propertydtos::blank_or_email;
use crate::models::chatmodels::{ChatMessage, Conversation, ConversationSummary};

fn default_visitor_name() -> String {
    "Visitor".to_string()
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct StartConversationDto {
    #[validate(length(min = 1, max = 100, message = "Session id is required"))]
    pub session_id: String,

    #[serde(default = "default_visitor_name")]
    #[validate(length(min = 1, max = 255))]
    pub visitor_name: String,

    #[serde(default)]
    #[validate(custom = "blank_or_email")]
    pub visitor_email: String,

    #[serde(default)]
    #[validate(length(max = 50))]
    pub visitor_phone: String,

    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct SendChatMessageDto {
    #[validate(length(min = 1, max = 100, message = "Session id is required"))]
    pub session_id: String,

    #[validate(length(min = 1, message = "Message content cannot be empty"))]
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ReplyDto {
    #[validate(length(min = 1, message = "Message content cannot be empty"))]
    pub content: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct ConversationFilterParams {
    pub has_unread: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConversationDetailDto {
    #[serde(flatten)]
    pub conversation: Conversation,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct LastMessagePreview {
    pub content: String,
    pub is_from_visitor: bool,
    pub created_at: DateTime<Utc>,
}

const PREVIEW_CHARS: usize = 100;

#[derive(Debug, Serialize)]
pub struct ConversationListItemDto {
    pub id: Uuid,
    pub session_id: String,
    pub visitor_name: String,
    pub visitor_email: String,
    pub visitor_phone: String,
    pub is_active: bool,
    pub has_unread: bool,
    pub unread_count: i64,
    pub last_message: Option<LastMessagePreview>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ConversationSummary> for ConversationListItemDto {
    fn from(summary: ConversationSummary) -> Self {
        let last_message = match (
            summary.last_message_content,
            summary.last_message_from_visitor,
            summary.last_message_at,
        ) {
            (Some(content), Some(is_from_visitor), Some(created_at)) => Some(LastMessagePreview {
                content: content.chars().take(PREVIEW_CHARS).collect(),
                is_from_visitor,
                created_at,
            }),
            _ => None,
        };

        let c = summary.conversation;
        Self {
            id: c.id,
            session_id: c.session_id,
            visitor_name: c.visitor_name,
            visitor_email: c.visitor_email,
            visitor_phone: c.visitor_phone,
            is_active: c.is_active,
            has_unread: c.has_unread,
            unread_count: summary.unread_count,
            last_message,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visitor_name_defaults() {
        let dto: StartConversationDto =
            serde_json::from_str(r#"{"session_id":"abc-123","message":"Hello"}"#).unwrap();
        assert_eq!(dto.visitor_name, "Visitor");
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn preview_is_truncated() {
        let now = Utc::now();
        let summary = ConversationSummary {
            conversation: Conversation {
                id: Uuid::new_v4(),
                session_id: "s".to_string(),
                visitor_name: "Visitor".to_string(),
                visitor_email: String::new(),
                visitor_phone: String::new(),
                is_active: true,
                has_unread: true,
                created_at: now,
                updated_at: now,
            },
            unread_count: 2,
            last_message_content: Some("ë".repeat(150)),
            last_message_from_visitor: Some(true),
            last_message_at: Some(now),
        };
        let item = ConversationListItemDto::from(summary);
        let preview = item.last_message.unwrap();
        assert_eq!(preview.content.chars().count(), 100);
        assert_eq!(item.unread_count, 2);
    }
}
