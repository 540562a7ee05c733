use crate::domain::user::User;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct UserSearchQuery {
    /// Username prefix to filter by.
    pub q: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
}

impl From<User> for UserSummary {
    fn from(u: User) -> Self {
        Self { id: u.id, username: u.username }
    }
}
