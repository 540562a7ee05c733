use crate::error::Result;
use crate::storage::DbPool;

#[derive(Clone, Debug)]
pub struct HealthService {
    pool: DbPool,
}

impl HealthService {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Readiness check: the database must answer a trivial query.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the database is unreachable.
    pub async fn ready(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
