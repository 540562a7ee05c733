use crate::domain::conversation::{Conversation, Participant, direct_key};
use crate::error::{AppError, Result};
use crate::storage::{DbPool, records};
use std::collections::HashMap;
use uuid::Uuid;

const DIRECT_KEY_IDX: &str = "conversations_direct_key_idx";
const PARTICIPANT_USER_FK: &str = "conversation_participants_user_id_fkey";

#[derive(Clone, Debug)]
pub struct ConversationRepository {
    pool: DbPool,
}

impl ConversationRepository {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Creates a direct conversation between the two given users. The unique
    /// index on the canonical pair key rejects a second conversation for the
    /// same pair, so concurrent creates cannot both succeed.
    pub async fn create_direct(&self, a: Uuid, b: Uuid) -> Result<Conversation> {
        let id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO conversations (id, kind, direct_key)
            VALUES ($1, 'direct', $2)
            "#,
        )
        .bind(id)
        .bind(direct_key(a, b))
        .execute(&mut *tx)
        .await
        .map_err(map_insert_error)?;

        sqlx::query(
            r#"
            INSERT INTO conversation_participants (conversation_id, user_id)
            SELECT $1, unnest($2::uuid[])
            "#,
        )
        .bind(id)
        .bind(vec![a, b])
        .execute(&mut *tx)
        .await
        .map_err(map_insert_error)?;

        tx.commit().await?;

        self.fetch_required(id).await
    }

    /// Creates a group conversation owned by `creator` with the given member
    /// set. Members are expected to be deduplicated and to include the
    /// creator.
    pub async fn create_group(
        &self,
        creator: Uuid,
        name: Option<&str>,
        members: &[Uuid],
    ) -> Result<Conversation> {
        let id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO conversations (id, kind, name, created_by)
            VALUES ($1, 'group', $2, $3)
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(creator)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO conversation_participants (conversation_id, user_id)
            SELECT $1, unnest($2::uuid[])
            "#,
        )
        .bind(id)
        .bind(members)
        .execute(&mut *tx)
        .await
        .map_err(map_insert_error)?;

        tx.commit().await?;

        self.fetch_required(id).await
    }

    /// Looks up a conversation only if `user_id` is currently a participant.
    /// A missing conversation and a non-membership both come back as `None`.
    pub async fn find_for_participant(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Conversation>> {
        let row = sqlx::query_as::<_, records::conversation::ConversationRow>(
            r#"
            SELECT c.id, c.kind, c.name, c.created_by, c.created_at, c.updated_at
            FROM conversations c
            JOIN conversation_participants cp ON cp.conversation_id = c.id
            WHERE c.id = $1 AND cp.user_id = $2
            "#,
        )
        .bind(conversation_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let participants =
                    self.load_participants(&[conversation_id]).await?.remove(&conversation_id).unwrap_or_default();
                Ok(Some(row.into_domain(participants)?))
            }
            None => Ok(None),
        }
    }

    /// Lists the conversations `user_id` belongs to, most recently active
    /// first.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Conversation>> {
        let rows = sqlx::query_as::<_, records::conversation::ConversationRow>(
            r#"
            SELECT c.id, c.kind, c.name, c.created_by, c.created_at, c.updated_at
            FROM conversations c
            JOIN conversation_participants cp ON cp.conversation_id = c.id
            WHERE cp.user_id = $1
            ORDER BY c.updated_at DESC, c.id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut participants = self.load_participants(&ids).await?;

        rows.into_iter()
            .map(|row| {
                let members = participants.remove(&row.id).unwrap_or_default();
                row.into_domain(members)
            })
            .collect()
    }

    /// Adds the given users to the participant set. The conversation row is
    /// locked for the duration so concurrent membership mutations serialize.
    /// Re-adding an existing participant is a no-op.
    pub async fn add_members(&self, conversation_id: Uuid, member_ids: &[Uuid]) -> Result<Conversation> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT id FROM conversations WHERE id = $1 FOR UPDATE")
            .bind(conversation_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO conversation_participants (conversation_id, user_id)
            SELECT $1, unnest($2::uuid[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(conversation_id)
        .bind(member_ids)
        .execute(&mut *tx)
        .await
        .map_err(map_insert_error)?;

        tx.commit().await?;

        self.fetch_required(conversation_id).await
    }

    /// Removes the given users from the participant set, under the same
    /// per-conversation lock as `add_members`.
    pub async fn remove_members(
        &self,
        conversation_id: Uuid,
        member_ids: &[Uuid],
    ) -> Result<Conversation> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT id FROM conversations WHERE id = $1 FOR UPDATE")
            .bind(conversation_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            DELETE FROM conversation_participants
            WHERE conversation_id = $1 AND user_id = ANY($2)
            "#,
        )
        .bind(conversation_id)
        .bind(member_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.fetch_required(conversation_id).await
    }

    async fn fetch_required(&self, conversation_id: Uuid) -> Result<Conversation> {
        let row = sqlx::query_as::<_, records::conversation::ConversationRow>(
            r#"
            SELECT id, kind, name, created_by, created_at, updated_at
            FROM conversations
            WHERE id = $1
            "#,
        )
        .bind(conversation_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)?;

        let participants =
            self.load_participants(&[conversation_id]).await?.remove(&conversation_id).unwrap_or_default();
        row.into_domain(participants)
    }

    async fn load_participants(
        &self,
        conversation_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Participant>>> {
        if conversation_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, records::conversation::ParticipantRow>(
            r#"
            SELECT cp.conversation_id, u.id AS user_id, u.username
            FROM conversation_participants cp
            JOIN users u ON u.id = cp.user_id
            WHERE cp.conversation_id = ANY($1)
            ORDER BY cp.joined_at ASC, u.id
            "#,
        )
        .bind(conversation_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_conversation: HashMap<Uuid, Vec<Participant>> = HashMap::new();
        for row in rows {
            by_conversation.entry(row.conversation_id).or_default().push(row.into());
        }
        Ok(by_conversation)
    }
}

/// Translates constraint violations on the conversation tables into the
/// caller-facing taxonomy: the pair-key unique index means the direct chat
/// already exists, and a participant FK failure means a user id vanished
/// between validation and insert.
fn map_insert_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        match db.constraint() {
            Some(DIRECT_KEY_IDX) => {
                return AppError::Conflict(
                    "A direct conversation between these participants already exists".to_string(),
                );
            }
            Some(PARTICIPANT_USER_FK) => {
                return AppError::BadRequest("Some users were not found".to_string());
            }
            _ => {}
        }
    }
    AppError::Database(e)
}
