// models/chatmodels.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Visitor chat thread, keyed by the session id the widget generates.
#[derive(Debug, Serialize, Clone, Deserialize, sqlx::FromRow, PartialEq)]
pub struct Conversation {
    pub id: Uuid,
    pub session_id: String,
    pub visitor_name: String,
    pub visitor_email: String,
    pub visitor_phone: String,
    pub is_active: bool,
    pub has_unread: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub content: String,
    pub is_from_visitor: bool,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Row shape for the admin conversation list: the conversation plus its
/// latest message and the number of visitor messages nobody has read yet.
#[derive(Debug, Serialize, Clone, sqlx::FromRow)]
pub struct ConversationSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub conversation: Conversation,
    pub unread_count: i64,
    pub last_message_content: Option<String>,
    pub last_message_from_visitor: Option<bool>,
    pub last_message_at: Option<DateTime<Utc>>,
}
