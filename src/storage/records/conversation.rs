use crate::domain::conversation::{Conversation, ConversationKind, Participant};
use crate::error::{AppError, Result};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub(crate) struct ConversationRow {
    pub id: Uuid,
    pub kind: String,
    pub name: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(sqlx::FromRow)]
pub(crate) struct ParticipantRow {
    pub conversation_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
}

impl From<ParticipantRow> for Participant {
    fn from(record: ParticipantRow) -> Self {
        Self { user_id: record.user_id, username: record.username }
    }
}

impl ConversationRow {
    /// Assembles the domain conversation from the row and its participant
    /// set. The kind column is constrained by the schema, so a parse failure
    /// means the store is corrupt.
    pub(crate) fn into_domain(self, participants: Vec<Participant>) -> Result<Conversation> {
        let kind = ConversationKind::parse(&self.kind).ok_or(AppError::Internal)?;
        Ok(Conversation {
            id: self.id,
            kind,
            name: self.name,
            created_by: self.created_by,
            participants,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
