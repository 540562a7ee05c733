use crate::config::ConversationConfig;
use crate::domain::message::Message;
use crate::error::{AppError, Result};
use crate::services::Page;
use crate::services::access::AccessGate;
use crate::storage::message_repo::MessageRepository;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct MessageService {
    config: ConversationConfig,
    gate: AccessGate,
    messages: MessageRepository,
}

impl MessageService {
    #[must_use]
    pub const fn new(config: ConversationConfig, gate: AccessGate, messages: MessageRepository) -> Self {
        Self { config, gate, messages }
    }

    /// Chronological message listing, readable only by current participants.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` if the conversation is absent or the
    /// caller is not a participant.
    #[tracing::instrument(skip(self), fields(conversation_id = %conversation_id, caller = %caller), err(level = "debug"))]
    pub async fn list(
        &self,
        conversation_id: Uuid,
        caller: Uuid,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Message>> {
        self.gate.authorize_participant(conversation_id, caller).await?;

        let page = Page::clamp(limit, offset, &self.config);
        self.messages.list_for_conversation(conversation_id, page.limit, page.offset).await
    }

    /// Sends a message into a conversation the sender participates in. The
    /// conversation's activity timestamp is refreshed atomically with the
    /// insert.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` if the sender is not a participant and
    /// `AppError::BadRequest` if the content is empty after trimming.
    #[tracing::instrument(skip(self, content), fields(conversation_id = %conversation_id, sender = %sender), err(level = "debug"))]
    pub async fn send(&self, conversation_id: Uuid, sender: Uuid, content: &str) -> Result<Message> {
        self.gate.authorize_participant(conversation_id, sender).await?;

        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::BadRequest("Message content must not be empty".to_string()));
        }

        let message = self.messages.create(conversation_id, sender, content).await?;
        tracing::debug!(message_id = %message.id, "Message stored");
        Ok(message)
    }

    /// Deletes a message. Only its sender may do so; other participants get
    /// `Forbidden`, and non-participants cannot tell the message exists.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` for missing messages or non-participant
    /// callers, `AppError::Forbidden` for participants other than the sender.
    #[tracing::instrument(skip(self), fields(message_id = %message_id, caller = %caller), err(level = "debug"))]
    pub async fn delete(&self, message_id: Uuid, caller: Uuid) -> Result<()> {
        let message = self.messages.find_by_id(message_id).await?.ok_or(AppError::NotFound)?;

        self.gate.authorize_participant(message.conversation_id, caller).await?;

        if !message.is_sender(caller) {
            return Err(AppError::Forbidden("Only the sender can delete a message".to_string()));
        }

        self.messages.delete(message.id).await
    }
}
