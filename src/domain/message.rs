use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub created_at: OffsetDateTime,
}

impl Message {
    #[must_use]
    pub fn is_sender(&self, user_id: Uuid) -> bool {
        self.sender_id == user_id
    }
}
