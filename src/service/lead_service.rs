// service/lead_service.rs
use std::sync::Arc;

use crate::{
    db::{db::DBClient, messagedb::MessageExt, propertydb::PropertyExt},
    dtos::messagedtos::CreateMessageDto,
    models::messagemodel::Message,
    service::{
        error::ServiceError,
        notification_service::{NotificationEvent, NotificationService},
    },
};

#[derive(Debug, Clone)]
pub struct LeadService {
    db_client: Arc<DBClient>,
    notification_service: Arc<NotificationService>,
}

impl LeadService {
    pub fn new(db_client: Arc<DBClient>, notification_service: Arc<NotificationService>) -> Self {
        Self {
            db_client,
            notification_service,
        }
    }

    /// Store a contact-form lead, credit the property it is about, and tell
    /// the admins.
    pub async fn submit(&self, data: CreateMessageDto) -> Result<Message, ServiceError> {
        if let Some(property_id) = data.property_id {
            if self.db_client.get_property_by_id(property_id).await?.is_none() {
                return Err(ServiceError::PropertyNotFound(property_id.to_string()));
            }
        }

        let lead = self.db_client.create_message(&data).await?;

        tracing::info!("Lead {} received from {}", lead.id, lead.contact());

        self.notification_service
            .notify_or_log(NotificationEvent::LeadReceived(&lead))
            .await;

        Ok(lead)
    }
}
