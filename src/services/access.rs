use crate::domain::conversation::Conversation;
use crate::error::{AppError, Result};
use crate::storage::conversation_repo::ConversationRepository;
use uuid::Uuid;

/// The single authorization chokepoint for conversation access. Every
/// message or membership operation resolves its conversation through here,
/// never by a bare id lookup.
#[derive(Clone, Debug)]
pub struct AccessGate {
    conversations: ConversationRepository,
}

impl AccessGate {
    #[must_use]
    pub const fn new(conversations: ConversationRepository) -> Self {
        Self { conversations }
    }

    /// Resolves the conversation only if `user_id` is a current participant.
    /// A conversation that does not exist and one the user is not in are
    /// both `NotFound`, so callers cannot probe for existence.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` if the conversation is absent or the
    /// user is not a participant.
    #[tracing::instrument(skip(self), fields(conversation_id = %conversation_id, user_id = %user_id))]
    pub async fn authorize_participant(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
    ) -> Result<Conversation> {
        self.conversations
            .find_for_participant(conversation_id, user_id)
            .await?
            .ok_or(AppError::NotFound)
    }
}
