use crate::domain::message::Message;
use crate::error::Result;
use crate::storage::{DbPool, records};
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct MessageRepository {
    pool: DbPool,
}

impl MessageRepository {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Persists a message and refreshes the owning conversation's activity
    /// timestamp in the same transaction, so list ordering and the message
    /// itself commit together.
    pub async fn create(
        &self,
        conversation_id: Uuid,
        sender_id: Uuid,
        content: &str,
    ) -> Result<Message> {
        let mut tx = self.pool.begin().await?;

        let message = sqlx::query_as::<_, records::message::Message>(
            r#"
            INSERT INTO messages (id, conversation_id, sender_id, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, conversation_id, sender_id, content, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(conversation_id)
        .bind(sender_id)
        .bind(content)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE conversations SET updated_at = now() WHERE id = $1")
            .bind(conversation_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(message.into())
    }

    /// Chronological listing for one conversation. The insertion sequence
    /// breaks timestamp ties, so the order is total and stable.
    pub async fn list_for_conversation(
        &self,
        conversation_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, records::message::Message>(
            r#"
            SELECT id, conversation_id, sender_id, content, created_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at ASC, seq ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(conversation_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages.into_iter().map(Into::into).collect())
    }

    pub async fn find_by_id(&self, message_id: Uuid) -> Result<Option<Message>> {
        let message = sqlx::query_as::<_, records::message::Message>(
            r#"
            SELECT id, conversation_id, sender_id, content, created_at
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(message_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(message.map(Into::into))
    }

    pub async fn delete(&self, message_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(message_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
