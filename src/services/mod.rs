use crate::config::ConversationConfig;

pub mod access;
pub mod conversation_service;
pub mod directory_service;
pub mod health_service;
pub mod membership_service;
pub mod message_service;

/// Caller-supplied paging, clamped to the configured bounds.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    #[must_use]
    pub fn clamp(limit: Option<i64>, offset: Option<i64>, config: &ConversationConfig) -> Self {
        Self {
            limit: limit.unwrap_or(config.page_limit).clamp(1, config.max_page_limit),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}
