use time::OffsetDateTime;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub(crate) struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: OffsetDateTime,
}

impl From<User> for crate::domain::user::User {
    fn from(record: User) -> Self {
        Self {
            id: record.id,
            username: record.username,
            email: record.email,
            created_at: record.created_at,
        }
    }
}
