use serde::Deserialize;

pub mod conversations;
pub mod messages;
pub mod users;

/// Common paging query parameters; bounds are enforced server-side.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
