//! Scoped connection acquisition.

use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};

/// A pooled connection held for the duration of one store operation.
///
/// Dropping the session hands the connection back to the pool, whether the
/// operation succeeded, failed, or is being retried.
pub(crate) struct Session {
    conn: PoolConnection<Sqlite>,
    operation: &'static str,
}

impl Session {
    /// Wait for a pooled connection (bounded by the pool's acquire timeout).
    pub(crate) async fn acquire(
        pool: &SqlitePool,
        operation: &'static str,
    ) -> Result<Self, sqlx::Error> {
        let conn = pool.acquire().await?;
        tracing::trace!(operation, "session acquired");
        Ok(Self { conn, operation })
    }

    pub(crate) fn conn(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        tracing::trace!(operation = self.operation, "session released");
    }
}
