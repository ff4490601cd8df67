// service/notification_service.rs
use std::sync::Arc;

use crate::{
    db::{db::DBClient, notificationdb::NotificationExt},
    models::{
        chatmodels::{ChatMessage, Conversation},
        messagemodel::Message,
        notificationmodel::{NewNotification, Notification, NotificationTarget, NotificationType, Priority},
    },
    service::error::ServiceError,
};

const PREVIEW_CHARS: usize = 200;

pub const MESSAGES_URL: &str = "/admin/dashboard/messages";

pub fn chat_url(conversation: &Conversation) -> String {
    format!("/admin/dashboard/chats/{}", conversation.id)
}

/// Something an admin should hear about. Emitted by whoever created the
/// record, right after it is stored.
#[derive(Debug, Clone, Copy)]
pub enum NotificationEvent<'a> {
    LeadReceived(&'a Message),
    ConversationStarted(&'a Conversation),
    VisitorMessage {
        conversation: &'a Conversation,
        message: &'a ChatMessage,
        /// Visitor messages in the conversation, counting this one.
        visitor_message_count: i64,
    },
}

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

/// The notification an event produces, if any. The first visitor message of
/// a conversation is covered by the "started" notification.
pub fn draft(event: NotificationEvent<'_>) -> Option<NewNotification> {
    match event {
        NotificationEvent::LeadReceived(lead) => {
            // Leads about a listing jump the queue
            let (title, priority) = match lead.property_id {
                Some(_) => (format!("Property inquiry from {}", lead.name), Priority::High),
                None => (format!("New lead from {}", lead.name), Priority::Normal),
            };
            Some(NewNotification {
                notification_type: NotificationType::NewLead,
                priority,
                title,
                message: preview(&lead.message),
                target: Some(NotificationTarget::ContactMessage(lead.id)),
                action_url: MESSAGES_URL.to_string(),
            })
        }

        NotificationEvent::ConversationStarted(conversation) => Some(NewNotification {
            notification_type: NotificationType::NewChat,
            priority: Priority::Normal,
            title: format!("New chat from {}", conversation.visitor_name),
            message: format!("{} started a conversation", conversation.visitor_name),
            target: Some(NotificationTarget::Conversation(conversation.id)),
            action_url: chat_url(conversation),
        }),

        NotificationEvent::VisitorMessage {
            conversation,
            message,
            visitor_message_count,
        } => {
            if !message.is_from_visitor || visitor_message_count <= 1 {
                return None;
            }
            Some(NewNotification {
                notification_type: NotificationType::NewChat,
                priority: Priority::Normal,
                title: format!("New message from {}", conversation.visitor_name),
                message: preview(&message.content),
                target: Some(NotificationTarget::Conversation(conversation.id)),
                action_url: chat_url(conversation),
            })
        }
    }
}

#[derive(Debug, Clone)]
pub struct NotificationService {
    db_client: Arc<DBClient>,
}

impl NotificationService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub async fn notify(&self, event: NotificationEvent<'_>) -> Result<Option<Notification>, ServiceError> {
        let Some(new_notification) = draft(event) else {
            return Ok(None);
        };

        let notification = self
            .db_client
            .create_notification(&new_notification)
            .await
            .map_err(|e| ServiceError::Notification(e.to_string()))?;

        tracing::info!(
            "Notification {} created: {:?} ({:?}) {}",
            notification.id,
            notification.notification_type,
            notification.priority,
            notification.title
        );

        Ok(Some(notification))
    }

    /// Like `notify`, but a failure is logged instead of returned. Used where
    /// the triggering record is already stored and must still be reported.
    pub async fn notify_or_log(&self, event: NotificationEvent<'_>) {
        if let Err(e) = self.notify(event).await {
            tracing::error!("Failed to create notification: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn lead(property_id: Option<Uuid>, text: &str) -> Message {
        Message {
            id: Uuid::new_v4(),
            name: "Elira".to_string(),
            email: "elira@example.com".to_string(),
            phone: String::new(),
            message: text.to_string(),
            property_id,
            is_read: false,
            created_at: Utc::now(),
        }
    }

    fn conversation() -> Conversation {
        Conversation {
            id: Uuid::new_v4(),
            session_id: "sess-1".to_string(),
            visitor_name: "Visitor".to_string(),
            visitor_email: String::new(),
            visitor_phone: String::new(),
            is_active: true,
            has_unread: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn chat_message(conversation: &Conversation, from_visitor: bool) -> ChatMessage {
        ChatMessage {
            id: Uuid::new_v4(),
            conversation_id: conversation.id,
            content: "Is parking included?".to_string(),
            is_from_visitor: from_visitor,
            is_read: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn plain_lead_is_normal_priority() {
        let lead = lead(None, "Call me back");
        let n = draft(NotificationEvent::LeadReceived(&lead)).unwrap();
        assert_eq!(n.notification_type, NotificationType::NewLead);
        assert_eq!(n.priority, Priority::Normal);
        assert_eq!(n.title, "New lead from Elira");
        assert_eq!(n.contact_message_id(), Some(lead.id));
        assert_eq!(n.action_url, "/admin/dashboard/messages");
    }

    #[test]
    fn lead_about_a_property_is_high_priority_and_links_the_lead() {
        let lead = lead(Some(Uuid::new_v4()), "Still available?");
        let n = draft(NotificationEvent::LeadReceived(&lead)).unwrap();
        assert_eq!(n.notification_type, NotificationType::NewLead);
        assert_eq!(n.priority, Priority::High);
        assert_eq!(n.title, "Property inquiry from Elira");
        assert_eq!(n.contact_message_id(), Some(lead.id));
        assert_eq!(n.property_id(), None);
    }

    #[test]
    fn long_messages_are_truncated() {
        let lead = lead(None, &"a".repeat(250));
        let n = draft(NotificationEvent::LeadReceived(&lead)).unwrap();
        assert_eq!(n.message.len(), 203);
        assert!(n.message.ends_with("..."));

        let exact = lead_with_len(200);
        let n = draft(NotificationEvent::LeadReceived(&exact)).unwrap();
        assert_eq!(n.message.chars().count(), 200);
    }

    fn lead_with_len(len: usize) -> Message {
        lead(None, &"ë".repeat(len))
    }

    #[test]
    fn conversation_start_links_to_chat() {
        let c = conversation();
        let n = draft(NotificationEvent::ConversationStarted(&c)).unwrap();
        assert_eq!(n.notification_type, NotificationType::NewChat);
        assert_eq!(n.message, "Visitor started a conversation");
        assert_eq!(n.action_url, format!("/admin/dashboard/chats/{}", c.id));
        assert_eq!(n.conversation_id(), Some(c.id));
    }

    #[test]
    fn only_follow_up_visitor_messages_notify() {
        let c = conversation();
        let visitor = chat_message(&c, true);
        let admin = chat_message(&c, false);

        let first = NotificationEvent::VisitorMessage {
            conversation: &c,
            message: &visitor,
            visitor_message_count: 1,
        };
        assert!(draft(first).is_none());

        let follow_up = NotificationEvent::VisitorMessage {
            conversation: &c,
            message: &visitor,
            visitor_message_count: 2,
        };
        let n = draft(follow_up).unwrap();
        assert_eq!(n.title, "New message from Visitor");
        assert_eq!(n.message, "Is parking included?");

        let reply = NotificationEvent::VisitorMessage {
            conversation: &c,
            message: &admin,
            visitor_message_count: 5,
        };
        assert!(draft(reply).is_none());
    }
}
