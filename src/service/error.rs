use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::{error::HttpError, search::ParamError};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Property {0} not found")]
    PropertyNotFound(String),

    #[error("Image {0} not found")]
    ImageNotFound(Uuid),

    #[error("Message {0} not found")]
    MessageNotFound(Uuid),

    #[error("Conversation {0} not found")]
    ConversationNotFound(String),

    #[error("Buyer search {0} not found")]
    BuyerSearchNotFound(Uuid),

    #[error("Notification {0} not found")]
    NotificationNotFound(Uuid),

    #[error("Invalid query parameter: {0}")]
    InvalidParam(#[from] ParamError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Notification error: {0}")]
    Notification(String),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::PropertyNotFound(_)
            | ServiceError::ImageNotFound(_)
            | ServiceError::MessageNotFound(_)
            | ServiceError::ConversationNotFound(_)
            | ServiceError::BuyerSearchNotFound(_)
            | ServiceError::NotificationNotFound(_) => StatusCode::NOT_FOUND,

            ServiceError::InvalidParam(_) => StatusCode::BAD_REQUEST,

            ServiceError::Database(_) | ServiceError::Notification(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match &error {
            ServiceError::Database(e) => {
                tracing::error!("Database error: {}", e);
                HttpError::server_error(crate::error::ErrorMessage::ServerError.to_string())
            }
            _ => HttpError::new(error.to_string(), error.status_code()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_to_http_status() {
        let missing: HttpError = ServiceError::PropertyNotFound("sea-view".to_string()).into();
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
        assert_eq!(missing.message, "Property sea-view not found");

        let bad: HttpError = ServiceError::InvalidParam(ParamError::UnknownListingStatus("gone".into())).into();
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);

        let db: HttpError = ServiceError::Database(sqlx::Error::RowNotFound).into();
        assert_eq!(db.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!db.message.contains("no rows"));
    }
}
