use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationKind {
    Direct,
    Group,
}

impl ConversationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Group => "group",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "direct" => Some(Self::Direct),
            "group" => Some(Self::Group),
            _ => None,
        }
    }
}

/// A current member of a conversation, carried with its username so that
/// viewer-relative display names resolve without another lookup.
#[derive(Debug, Clone)]
pub struct Participant {
    pub user_id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone)]
pub struct Conversation {
    pub id: Uuid,
    pub kind: ConversationKind,
    pub name: Option<String>,
    pub created_by: Option<Uuid>,
    pub participants: Vec<Participant>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Conversation {
    #[must_use]
    pub fn is_group(&self) -> bool {
        self.kind == ConversationKind::Group
    }

    #[must_use]
    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.participants.iter().any(|p| p.user_id == user_id)
    }

    /// Resolves the name shown to `viewer`: the group name (or a generic
    /// fallback) for groups, the other participant's username for direct
    /// chats.
    #[must_use]
    pub fn display_name(&self, viewer: Uuid) -> String {
        match self.kind {
            ConversationKind::Group => {
                self.name.clone().unwrap_or_else(|| "Unnamed Group".to_string())
            }
            ConversationKind::Direct => self
                .participants
                .iter()
                .find(|p| p.user_id != viewer)
                .map_or_else(|| "Direct Chat".to_string(), |p| p.username.clone()),
        }
    }
}

/// Canonical key for the unordered pair of direct-chat participants. Both
/// orderings of the same pair produce the same key, which backs the unique
/// index that deduplicates direct conversations.
#[must_use]
pub fn direct_key(a: Uuid, b: Uuid) -> String {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    format!("{lo}:{hi}")
}

/// Collapses duplicate member ids while preserving first-seen order, and
/// guarantees the requester appears in the result.
#[must_use]
pub fn normalize_members(requester: Uuid, member_ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::with_capacity(member_ids.len() + 1);
    let mut members = Vec::with_capacity(member_ids.len() + 1);
    for &id in member_ids {
        if seen.insert(id) {
            members.push(id);
        }
    }
    if seen.insert(requester) {
        members.push(requester);
    }
    members
}
