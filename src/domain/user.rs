use time::OffsetDateTime;
use uuid::Uuid;

/// A directory entry provisioned by the identity provider. Referenced by id
/// everywhere else; never mutated here.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: OffsetDateTime,
}
