// service/chat_service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{chatdb::ChatExt, db::DBClient},
    dtos::chatdtos::{ConversationDetailDto, ConversationListItemDto, SendChatMessageDto, StartConversationDto},
    models::chatmodels::{ChatMessage, Conversation},
    service::{
        error::ServiceError,
        notification_service::{NotificationEvent, NotificationService},
    },
};

#[derive(Debug, Clone)]
pub struct ChatService {
    db_client: Arc<DBClient>,
    notification_service: Arc<NotificationService>,
}

impl ChatService {
    pub fn new(db_client: Arc<DBClient>, notification_service: Arc<NotificationService>) -> Self {
        Self {
            db_client,
            notification_service,
        }
    }

    async fn detail(&self, conversation: Conversation) -> Result<ConversationDetailDto, ServiceError> {
        let messages = self.db_client.get_chat_messages(conversation.id).await?;
        Ok(ConversationDetailDto { conversation, messages })
    }

    /// Open a conversation for a session, or continue the existing one, with
    /// the visitor's first message.
    pub async fn start(&self, data: StartConversationDto) -> Result<ConversationDetailDto, ServiceError> {
        let started = self.db_client.start_conversation(data).await?;

        if started.created {
            tracing::info!(
                "Conversation {} started by {}",
                started.conversation.id,
                started.conversation.visitor_name
            );
            self.notification_service
                .notify_or_log(NotificationEvent::ConversationStarted(&started.conversation))
                .await;
        } else {
            self.notification_service
                .notify_or_log(NotificationEvent::VisitorMessage {
                    conversation: &started.conversation,
                    message: &started.message,
                    visitor_message_count: started.visitor_message_count,
                })
                .await;
        }

        self.detail(started.conversation).await
    }

    pub async fn send(&self, data: SendChatMessageDto) -> Result<ChatMessage, ServiceError> {
        let posted = self
            .db_client
            .add_visitor_message(&data.session_id, &data.content)
            .await?
            .ok_or_else(|| ServiceError::ConversationNotFound(data.session_id.clone()))?;

        self.notification_service
            .notify_or_log(NotificationEvent::VisitorMessage {
                conversation: &posted.conversation,
                message: &posted.message,
                visitor_message_count: posted.visitor_message_count,
            })
            .await;

        Ok(posted.message)
    }

    /// Visitor's view of their thread; admin replies count as read.
    pub async fn visitor_view(&self, session_id: &str) -> Result<ConversationDetailDto, ServiceError> {
        let conversation = self
            .db_client
            .get_conversation_by_session(session_id)
            .await?
            .ok_or_else(|| ServiceError::ConversationNotFound(session_id.to_string()))?;

        self.db_client.mark_messages_as_read(conversation.id, false).await?;
        self.detail(conversation).await
    }

    /// Admin's view of a thread; visitor messages count as read.
    pub async fn admin_view(&self, conversation_id: Uuid) -> Result<ConversationDetailDto, ServiceError> {
        self.db_client.mark_messages_as_read(conversation_id, true).await?;

        let conversation = self
            .db_client
            .clear_unread_flag(conversation_id)
            .await?
            .ok_or_else(|| ServiceError::ConversationNotFound(conversation_id.to_string()))?;

        self.detail(conversation).await
    }

    pub async fn reply(&self, conversation_id: Uuid, content: &str) -> Result<ChatMessage, ServiceError> {
        let message = self
            .db_client
            .add_admin_reply(conversation_id, content)
            .await?
            .ok_or_else(|| ServiceError::ConversationNotFound(conversation_id.to_string()))?;

        tracing::info!("Admin replied in conversation {}", conversation_id);
        Ok(message)
    }

    pub async fn list(&self, has_unread: Option<bool>) -> Result<Vec<ConversationListItemDto>, ServiceError> {
        let summaries = self.db_client.list_conversations(has_unread).await?;
        Ok(summaries.into_iter().map(ConversationListItemDto::from).collect())
    }

    pub async fn delete(&self, conversation_id: Uuid) -> Result<(), ServiceError> {
        if !self.db_client.delete_conversation(conversation_id).await? {
            return Err(ServiceError::ConversationNotFound(conversation_id.to_string()));
        }
        Ok(())
    }

    pub async fn unread_count(&self) -> Result<i64, ServiceError> {
        Ok(self.db_client.get_unread_conversation_count().await?)
    }
}
