use crate::domain::user::User;
use crate::error::Result;
use crate::storage::{DbPool, records};
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Inserts a directory entry. Provisioning normally happens out of band
    /// through the identity provider; this exists for bootstrapping and
    /// tests.
    pub async fn create(&self, username: &str, email: &str) -> Result<User> {
        let user = sqlx::query_as::<_, records::user::User>(
            r#"
            INSERT INTO users (id, username, email)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(user.into())
    }

    /// Returns the subset of `ids` that exist in the directory.
    pub async fn filter_existing(&self, ids: &[Uuid]) -> Result<Vec<Uuid>> {
        let existing = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM users WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(existing)
    }

    /// Case-insensitive username prefix search for the directory listing.
    pub async fn search(&self, query: Option<&str>, limit: i64) -> Result<Vec<User>> {
        let pattern = query.map_or_else(|| "%".to_string(), |q| format!("{}%", escape_like(q)));

        let users = sqlx::query_as::<_, records::user::User>(
            r#"
            SELECT id, username, email, created_at
            FROM users
            WHERE username ILIKE $1
            ORDER BY username ASC
            LIMIT $2
            "#,
        )
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(users.into_iter().map(Into::into).collect())
    }
}

fn escape_like(input: &str) -> String {
    input.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}
