//! Database connection management

use sqlx::{PgPool, Postgres, Transaction, query};

/// Bound on how long a commit-path transaction may spend in any statement.
/// When revalidation cannot complete in time the commit fails closed instead
/// of proceeding on a stale view.
pub const COMMIT_STATEMENT_TIMEOUT_SQL: &str = "SET LOCAL statement_timeout = '5s'";

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a plain read transaction.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction fails.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Begin a booking-commit transaction with a bounded statement timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction or setting the timeout
    /// fails.
    pub async fn begin_commit_transaction(
        &self,
    ) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        query(COMMIT_STATEMENT_TIMEOUT_SQL)
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}
