use crate::config::ConversationConfig;
use crate::domain::conversation::{Conversation, normalize_members};
use crate::error::{AppError, Result};
use crate::services::Page;
use crate::storage::conversation_repo::ConversationRepository;
use crate::storage::user_repo::UserRepository;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct ConversationService {
    config: ConversationConfig,
    conversations: ConversationRepository,
    users: UserRepository,
}

impl ConversationService {
    #[must_use]
    pub const fn new(
        config: ConversationConfig,
        conversations: ConversationRepository,
        users: UserRepository,
    ) -> Self {
        Self { config, conversations, users }
    }

    /// Creates the unique direct conversation for a pair of users.
    ///
    /// # Errors
    /// Returns `AppError::BadRequest` if the participant list is not exactly
    /// two distinct existing users including the requester, and
    /// `AppError::Conflict` if the pair already shares a direct conversation.
    #[tracing::instrument(skip(self, participant_ids), fields(requester = %requester), err(level = "debug"))]
    pub async fn create_direct(
        &self,
        requester: Uuid,
        participant_ids: &[Uuid],
    ) -> Result<Conversation> {
        let [a, b] = participant_ids else {
            return Err(AppError::BadRequest(
                "Direct conversation must have exactly 2 participants".to_string(),
            ));
        };
        let (a, b) = (*a, *b);

        if a == b {
            return Err(AppError::BadRequest(
                "Direct conversation participants must be distinct".to_string(),
            ));
        }
        if requester != a && requester != b {
            return Err(AppError::BadRequest(
                "You must be a participant in the conversation".to_string(),
            ));
        }

        self.require_existing(&[a, b]).await?;

        let conversation = self.conversations.create_direct(a, b).await?;
        tracing::info!(conversation_id = %conversation.id, "Direct conversation created");
        Ok(conversation)
    }

    /// Creates a group conversation. Duplicate member ids collapse, the
    /// requester is always included, and the final set must fit the
    /// configured size bounds.
    ///
    /// # Errors
    /// Returns `AppError::BadRequest` on size violations or unresolvable
    /// member ids.
    #[tracing::instrument(skip(self, name, member_ids), fields(requester = %requester), err(level = "debug"))]
    pub async fn create_group(
        &self,
        requester: Uuid,
        name: Option<String>,
        member_ids: &[Uuid],
    ) -> Result<Conversation> {
        let members = normalize_members(requester, member_ids);

        if members.len() < 2 || members.len() > self.config.max_group_size {
            return Err(AppError::BadRequest(format!(
                "Group conversation must have between 2 and {} participants",
                self.config.max_group_size
            )));
        }

        self.require_existing(&members).await?;

        let name = name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());

        let conversation = self.conversations.create_group(requester, name.as_deref(), &members).await?;
        tracing::info!(
            conversation_id = %conversation.id,
            participants = conversation.participants.len(),
            "Group conversation created"
        );
        Ok(conversation)
    }

    /// Lists the caller's conversations, most recently active first.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(skip(self), fields(user_id = %user_id), err(level = "warn"))]
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Conversation>> {
        let page = Page::clamp(limit, offset, &self.config);
        self.conversations.list_for_user(user_id, page.limit, page.offset).await
    }

    async fn require_existing(&self, ids: &[Uuid]) -> Result<()> {
        let existing = self.users.filter_existing(ids).await?;
        if existing.len() == ids.len() {
            Ok(())
        } else {
            Err(AppError::BadRequest("Some users were not found".to_string()))
        }
    }
}
