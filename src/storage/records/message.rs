use time::OffsetDateTime;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub(crate) struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub created_at: OffsetDateTime,
}

impl From<Message> for crate::domain::message::Message {
    fn from(record: Message) -> Self {
        Self {
            id: record.id,
            conversation_id: record.conversation_id,
            sender_id: record.sender_id,
            content: record.content,
            created_at: record.created_at,
        }
    }
}
