use crate::domain::conversation::Conversation;
use crate::error::{AppError, Result};
use crate::services::access::AccessGate;
use crate::storage::conversation_repo::ConversationRepository;
use crate::storage::user_repo::UserRepository;
use std::collections::HashSet;
use uuid::Uuid;

/// Group membership mutation. Both operations are creator-only and
/// all-or-nothing; per-conversation serialization happens at the repository
/// via a row lock.
#[derive(Clone, Debug)]
pub struct MembershipService {
    gate: AccessGate,
    conversations: ConversationRepository,
    users: UserRepository,
}

impl MembershipService {
    #[must_use]
    pub const fn new(
        gate: AccessGate,
        conversations: ConversationRepository,
        users: UserRepository,
    ) -> Self {
        Self { gate, conversations, users }
    }

    /// Adds users to a group. Every id must resolve or nothing is added;
    /// already-present members are left as-is.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` if the caller is not a participant,
    /// `AppError::NotAGroup` for direct conversations, `AppError::Forbidden`
    /// for non-creators, and `AppError::BadRequest` for empty or
    /// unresolvable member lists.
    #[tracing::instrument(skip(self, member_ids), fields(conversation_id = %conversation_id, caller = %caller), err(level = "debug"))]
    pub async fn add_members(
        &self,
        conversation_id: Uuid,
        caller: Uuid,
        member_ids: &[Uuid],
    ) -> Result<Conversation> {
        let conversation = self.gate.authorize_participant(conversation_id, caller).await?;
        let member_ids = Self::require_creator(&conversation, caller, member_ids, "add")?;

        let existing = self.users.filter_existing(&member_ids).await?;
        if existing.len() != member_ids.len() {
            return Err(AppError::BadRequest("Some users were not found".to_string()));
        }

        let updated = self.conversations.add_members(conversation_id, &member_ids).await?;
        tracing::info!(participants = updated.participants.len(), "Group members added");
        Ok(updated)
    }

    /// Removes users from a group. Listing the creator rejects the whole
    /// call; ids that are not members are ignored by the set difference.
    ///
    /// # Errors
    /// Same taxonomy as `add_members`, plus `AppError::BadRequest` when the
    /// creator's id is in the list.
    #[tracing::instrument(skip(self, member_ids), fields(conversation_id = %conversation_id, caller = %caller), err(level = "debug"))]
    pub async fn remove_members(
        &self,
        conversation_id: Uuid,
        caller: Uuid,
        member_ids: &[Uuid],
    ) -> Result<Conversation> {
        let conversation = self.gate.authorize_participant(conversation_id, caller).await?;
        let member_ids = Self::require_creator(&conversation, caller, member_ids, "remove")?;

        if conversation.created_by.is_some_and(|creator| member_ids.contains(&creator)) {
            return Err(AppError::BadRequest("Cannot remove the group creator".to_string()));
        }

        let updated = self.conversations.remove_members(conversation_id, &member_ids).await?;
        tracing::info!(participants = updated.participants.len(), "Group members removed");
        Ok(updated)
    }

    /// Shared preconditions for both mutations: group-only, creator-only, a
    /// non-empty member list. Returns the deduplicated ids.
    fn require_creator(
        conversation: &Conversation,
        caller: Uuid,
        member_ids: &[Uuid],
        action: &str,
    ) -> Result<Vec<Uuid>> {
        if !conversation.is_group() {
            return Err(AppError::NotAGroup);
        }
        if conversation.created_by != Some(caller) {
            return Err(AppError::Forbidden(format!("Only the group creator can {action} members")));
        }
        if member_ids.is_empty() {
            return Err(AppError::BadRequest("No member ids provided".to_string()));
        }

        let mut seen = HashSet::with_capacity(member_ids.len());
        Ok(member_ids.iter().copied().filter(|id| seen.insert(*id)).collect())
    }
}
