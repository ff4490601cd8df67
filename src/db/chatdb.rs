// db/chatdb.rs
use async_trait::async_trait;
use sqlx::{Error, Postgres, QueryBuilder};
use uuid::Uuid;

use super::db::DBClient;
use crate::dtos::chatdtos::StartConversationDto;
use crate::models::chatmodels::*;

/// Outcome of a visitor opening (or re-opening) a chat.
#[derive(Debug)]
pub struct StartedConversation {
    pub conversation: Conversation,
    pub message: ChatMessage,
    pub created: bool,
    /// Visitor messages in the conversation, including `message`.
    pub visitor_message_count: i64,
}

#[derive(Debug)]
pub struct PostedMessage {
    pub conversation: Conversation,
    pub message: ChatMessage,
    pub visitor_message_count: i64,
}

#[async_trait]
pub trait ChatExt {
    async fn start_conversation(
        &self,
        data: StartConversationDto,
    ) -> Result<StartedConversation, Error>;

    async fn add_visitor_message(
        &self,
        session_id: &str,
        content: &str,
    ) -> Result<Option<PostedMessage>, Error>;

    async fn add_admin_reply(
        &self,
        conversation_id: Uuid,
        content: &str,
    ) -> Result<Option<ChatMessage>, Error>;

    async fn get_conversation_by_session(
        &self,
        session_id: &str,
    ) -> Result<Option<Conversation>, Error>;

    async fn get_chat_messages(
        &self,
        conversation_id: Uuid,
    ) -> Result<Vec<ChatMessage>, Error>;

    /// Messages of one side (`from_visitor`) become read.
    async fn mark_messages_as_read(
        &self,
        conversation_id: Uuid,
        from_visitor: bool,
    ) -> Result<u64, Error>;

    async fn clear_unread_flag(
        &self,
        conversation_id: Uuid,
    ) -> Result<Option<Conversation>, Error>;

    async fn list_conversations(
        &self,
        has_unread: Option<bool>,
    ) -> Result<Vec<ConversationSummary>, Error>;

    async fn delete_conversation(
        &self,
        conversation_id: Uuid,
    ) -> Result<bool, Error>;

    async fn get_unread_conversation_count(&self) -> Result<i64, Error>;
}

pub fn conversation_list_query(has_unread: Option<bool>) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        r#"
        SELECT c.*,
               (SELECT COUNT(*) FROM chat_messages m
                 WHERE m.conversation_id = c.id AND m.is_from_visitor AND NOT m.is_read) AS unread_count,
               last.content AS last_message_content,
               last.is_from_visitor AS last_message_from_visitor,
               last.created_at AS last_message_at
        FROM conversations c
        LEFT JOIN LATERAL (
            SELECT content, is_from_visitor, created_at
            FROM chat_messages
            WHERE conversation_id = c.id
            ORDER BY created_at DESC
            LIMIT 1
        ) last ON TRUE
        "#,
    );

    if let Some(has_unread) = has_unread {
        qb.push("WHERE c.has_unread = ").push_bind(has_unread);
    }
    qb.push(" ORDER BY c.updated_at DESC");
    qb
}

async fn count_visitor_messages(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    conversation_id: Uuid,
) -> Result<i64, Error> {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM chat_messages WHERE conversation_id = $1 AND is_from_visitor",
    )
    .bind(conversation_id)
    .fetch_one(&mut **tx)
    .await
}

#[async_trait]
impl ChatExt for DBClient {
    async fn start_conversation(
        &self,
        data: StartConversationDto,
    ) -> Result<StartedConversation, Error> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_as::<_, Conversation>(
            r#"
            INSERT INTO conversations (session_id, visitor_name, visitor_email, visitor_phone, has_unread)
            VALUES ($1, $2, $3, $4, TRUE)
            ON CONFLICT (session_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(&data.session_id)
        .bind(&data.visitor_name)
        .bind(&data.visitor_email)
        .bind(&data.visitor_phone)
        .fetch_optional(&mut *tx)
        .await?;

        let (conversation, created) = match inserted {
            Some(conversation) => (conversation, true),
            None => {
                // Returning visitor: refresh the details they gave, keep old contact info on blanks
                let conversation = sqlx::query_as::<_, Conversation>(
                    r#"
                    UPDATE conversations
                    SET visitor_name = $2,
                        visitor_email = CASE WHEN $3 = '' THEN visitor_email ELSE $3 END,
                        visitor_phone = CASE WHEN $4 = '' THEN visitor_phone ELSE $4 END,
                        has_unread = TRUE,
                        updated_at = NOW()
                    WHERE session_id = $1
                    RETURNING *
                    "#,
                )
                .bind(&data.session_id)
                .bind(&data.visitor_name)
                .bind(&data.visitor_email)
                .bind(&data.visitor_phone)
                .fetch_one(&mut *tx)
                .await?;
                (conversation, false)
            }
        };

        let message = sqlx::query_as::<_, ChatMessage>(
            r#"
            INSERT INTO chat_messages (conversation_id, content, is_from_visitor)
            VALUES ($1, $2, TRUE)
            RETURNING *
            "#,
        )
        .bind(conversation.id)
        .bind(&data.message)
        .fetch_one(&mut *tx)
        .await?;

        let visitor_message_count = count_visitor_messages(&mut tx, conversation.id).await?;

        tx.commit().await?;
        Ok(StartedConversation {
            conversation,
            message,
            created,
            visitor_message_count,
        })
    }

    async fn add_visitor_message(
        &self,
        session_id: &str,
        content: &str,
    ) -> Result<Option<PostedMessage>, Error> {
        let mut tx = self.pool.begin().await?;

        let conversation = sqlx::query_as::<_, Conversation>(
            r#"
            UPDATE conversations
            SET has_unread = TRUE, updated_at = NOW()
            WHERE session_id = $1
            RETURNING *
            "#,
        )
        .bind(session_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(conversation) = conversation else {
            return Ok(None);
        };

        let message = sqlx::query_as::<_, ChatMessage>(
            r#"
            INSERT INTO chat_messages (conversation_id, content, is_from_visitor)
            VALUES ($1, $2, TRUE)
            RETURNING *
            "#,
        )
        .bind(conversation.id)
        .bind(content)
        .fetch_one(&mut *tx)
        .await?;

        let visitor_message_count = count_visitor_messages(&mut tx, conversation.id).await?;

        tx.commit().await?;
        Ok(Some(PostedMessage {
            conversation,
            message,
            visitor_message_count,
        }))
    }

    async fn add_admin_reply(
        &self,
        conversation_id: Uuid,
        content: &str,
    ) -> Result<Option<ChatMessage>, Error> {
        let mut tx = self.pool.begin().await?;

        let touched = sqlx::query("UPDATE conversations SET updated_at = NOW() WHERE id = $1")
            .bind(conversation_id)
            .execute(&mut *tx)
            .await?;

        if touched.rows_affected() == 0 {
            return Ok(None);
        }

        let message = sqlx::query_as::<_, ChatMessage>(
            r#"
            INSERT INTO chat_messages (conversation_id, content, is_from_visitor)
            VALUES ($1, $2, FALSE)
            RETURNING *
            "#,
        )
        .bind(conversation_id)
        .bind(content)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(message))
    }

    async fn get_conversation_by_session(
        &self,
        session_id: &str,
    ) -> Result<Option<Conversation>, Error> {
        sqlx::query_as::<_, Conversation>("SELECT * FROM conversations WHERE session_id = $1")
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_chat_messages(
        &self,
        conversation_id: Uuid,
    ) -> Result<Vec<ChatMessage>, Error> {
        sqlx::query_as::<_, ChatMessage>(
            r#"
            SELECT * FROM chat_messages
            WHERE conversation_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn mark_messages_as_read(
        &self,
        conversation_id: Uuid,
        from_visitor: bool,
    ) -> Result<u64, Error> {
        let result = sqlx::query(
            r#"
            UPDATE chat_messages
            SET is_read = TRUE
            WHERE conversation_id = $1 AND is_from_visitor = $2 AND NOT is_read
            "#,
        )
        .bind(conversation_id)
        .bind(from_visitor)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn clear_unread_flag(
        &self,
        conversation_id: Uuid,
    ) -> Result<Option<Conversation>, Error> {
        sqlx::query_as::<_, Conversation>(
            r#"
            UPDATE conversations
            SET has_unread = FALSE, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(conversation_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn list_conversations(
        &self,
        has_unread: Option<bool>,
    ) -> Result<Vec<ConversationSummary>, Error> {
        let mut qb = conversation_list_query(has_unread);
        qb.build_query_as::<ConversationSummary>()
            .fetch_all(&self.pool)
            .await
    }

    async fn delete_conversation(
        &self,
        conversation_id: Uuid,
    ) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM conversations WHERE id = $1")
            .bind(conversation_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_unread_conversation_count(&self) -> Result<i64, Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM conversations WHERE has_unread")
            .fetch_one(&self.pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_filters_on_unread_flag() {
        let qb = conversation_list_query(Some(true));
        let sql = qb.sql();
        assert!(sql.contains("WHERE c.has_unread = $1 ORDER BY c.updated_at DESC"));

        let unfiltered = conversation_list_query(None);
        assert!(!unfiltered.sql().contains("$1"));
        assert!(unfiltered.sql().trim_end().ends_with("ORDER BY c.updated_at DESC"));
    }
}
