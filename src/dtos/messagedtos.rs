use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::propertydtos::blank_or_email;
use crate::error::ErrorMessage;

/// Public contact form. At least one way of reaching the visitor is required.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
#[validate(schema(function = "requires_contact", skip_on_field_errors = false))]
pub struct CreateMessageDto {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    #[serde(default)]
    #[validate(custom = "blank_or_email")]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = 50, message = "Phone must be at most 50 characters"))]
    pub phone: String,

    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,

    pub property_id: Option<Uuid>,
}

fn requires_contact(dto: &CreateMessageDto) -> Result<(), ValidationError> {
    if dto.email.trim().is_empty() && dto.phone.trim().is_empty() {
        let mut error = ValidationError::new("contact_required");
        error.message = Some(ErrorMessage::ContactRequired.to_string().into());
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Default)]
pub struct MessageFilterParams {
    pub is_read: Option<String>,
}
