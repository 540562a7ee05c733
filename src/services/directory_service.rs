use crate::config::ConversationConfig;
use crate::domain::user::User;
use crate::error::Result;
use crate::storage::user_repo::UserRepository;

/// Thin read-only view over the externally provisioned user directory, used
/// for peer discovery before starting a conversation.
#[derive(Clone, Debug)]
pub struct DirectoryService {
    config: ConversationConfig,
    users: UserRepository,
}

impl DirectoryService {
    #[must_use]
    pub const fn new(config: ConversationConfig, users: UserRepository) -> Self {
        Self { config, users }
    }

    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(skip(self, query), err(level = "warn"))]
    pub async fn list_users(&self, query: Option<&str>, limit: Option<i64>) -> Result<Vec<User>> {
        let limit = limit.unwrap_or(self.config.page_limit).clamp(1, self.config.max_page_limit);
        self.users.search(query.map(str::trim).filter(|q| !q.is_empty()), limit).await
    }
}
