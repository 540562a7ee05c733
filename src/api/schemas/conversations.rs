use crate::domain::conversation::{Conversation, Participant};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Creation payload, tagged by conversation type. Direct chats carry exactly
/// the pair of participants; groups carry an optional name and the initial
/// member list (the creator is added server-side either way).
#[derive(Debug, Deserialize)]
#[serde(tag = "conversationType", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CreateConversationRequest {
    Direct { participants: Vec<Uuid> },
    Group { name: Option<String>, participants: Vec<Uuid> },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberUpdateRequest {
    pub member_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantSummary {
    pub id: Uuid,
    pub username: String,
}

impl From<Participant> for ParticipantSummary {
    fn from(p: Participant) -> Self {
        Self { id: p.user_id, username: p.username }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub id: Uuid,
    pub conversation_type: &'static str,
    pub name: Option<String>,
    pub display_name: String,
    pub created_by: Option<Uuid>,
    pub participants: Vec<ParticipantSummary>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl ConversationResponse {
    /// The display name is viewer-relative for direct chats, so this is a
    /// constructor rather than a `From` impl.
    #[must_use]
    pub fn for_viewer(conversation: Conversation, viewer: Uuid) -> Self {
        let display_name = conversation.display_name(viewer);
        Self {
            id: conversation.id,
            conversation_type: conversation.kind.as_str(),
            name: conversation.name,
            display_name,
            created_by: conversation.created_by,
            participants: conversation.participants.into_iter().map(Into::into).collect(),
            created_at: conversation.created_at,
            updated_at: conversation.updated_at,
        }
    }
}
