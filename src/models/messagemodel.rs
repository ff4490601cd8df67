use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A lead left through the public contact form. Only `is_read` changes after
/// the row is written.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Message {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub property_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Best way to reach the visitor, phone first.
    pub fn contact(&self) -> &str {
        if !self.phone.is_empty() {
            &self.phone
        } else if !self.email.is_empty() {
            &self.email
        } else {
            "-"
        }
    }
}
