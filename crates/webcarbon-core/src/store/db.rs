//! SQLite-backed store: connection, pool sizing and migrations.
//!
//! Record/history live in `ops`.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;

use super::types::StoreOptions;
use crate::error::StoreError;
use crate::retry::{classify_sqlx_error, retry_async, RetryFailure, RetryPolicy};

/// Environment variables consulted for the connection string, in order.
pub const DATABASE_URL_VARS: [&str; 2] = ["WEBCARBON_DATABASE_URL", "DATABASE_URL"];

/// First non-empty connection string found in [`DATABASE_URL_VARS`].
pub fn database_url_from_env() -> Option<String> {
    DATABASE_URL_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

/// Percent-encode a path for use in a sqlite:// URI so spaces and special chars don't break parsing.
fn path_to_sqlite_uri(path: &Path) -> String {
    let s = path.to_string_lossy();
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            '&' => out.push_str("%26"),
            c => out.push(c),
        }
    }
    format!("sqlite://{}", out)
}

/// Connection string for `~/.local/state/webcarbon/metrics.db`, creating the directory.
pub fn default_database_url() -> anyhow::Result<String> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("webcarbon")?;
    let db_path = xdg_dirs.place_state_file("metrics.db")?;
    Ok(path_to_sqlite_uri(&db_path))
}

/// Handle to the measurement store. Cheap to clone; clones share one pool.
///
/// Construct it once at startup and pass it to whoever records or reads
/// history; there is no process-wide instance.
#[derive(Clone)]
pub struct MetricsStore {
    pub(crate) pool: SqlitePool,
    pub(crate) retry: RetryPolicy,
}

impl MetricsStore {
    /// Open the pool described by `opts` and create the schema if absent.
    ///
    /// Connecting and migrating are retried under `opts.retry`.
    pub async fn connect(opts: &StoreOptions) -> Result<Self, StoreError> {
        if !opts.database_url.starts_with("sqlite:") {
            return Err(StoreError::UnsupportedBackend(opts.database_url.clone()));
        }
        let connect_opts = SqliteConnectOptions::from_str(&opts.database_url)
            .map_err(|source| StoreError::Failed {
                operation: "connect",
                attempts: 1,
                source,
            })?
            .create_if_missing(true)
            .busy_timeout(opts.busy_timeout);

        // Every connection to `:memory:` is its own database, so keep exactly one alive.
        let pool_opts = SqlitePoolOptions::new()
            .acquire_timeout(opts.acquire_timeout)
            .test_before_acquire(true);
        let pool_opts = if opts.is_in_memory() {
            pool_opts
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_opts
                .max_connections(opts.max_connections.max(1))
                .max_lifetime(opts.max_lifetime)
        };

        let pool = retry_async(&opts.retry, "connect", classify_sqlx_error, || {
            pool_opts.clone().connect_with(connect_opts.clone())
        })
        .await
        .map_err(|f| exhausted("connect", f))?;

        let store = MetricsStore {
            pool,
            retry: opts.retry,
        };
        retry_async(&store.retry, "migrate", classify_sqlx_error, || store.migrate())
            .await
            .map_err(|f| exhausted("migrate", f))?;

        tracing::debug!(
            max_connections = opts.max_connections,
            in_memory = opts.is_in_memory(),
            "metrics store ready"
        );
        Ok(store)
    }

    /// Open (or create) a database file at `path` with default pool sizing.
    pub async fn open_at(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Failed {
                    operation: "connect",
                    attempts: 1,
                    source: sqlx::Error::Io(e),
                })?;
        }
        Self::connect(&StoreOptions::new(path_to_sqlite_uri(path))).await
    }

    /// Close the pool, waiting for checked-out connections to come back.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    async fn migrate(&self) -> Result<(), sqlx::Error> {
        // Single append-only table. Derived columns are stored for reporting
        // but always agree with page_weight_kb and monthly_visits.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS website_metrics (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                url TEXT NOT NULL,
                recorded_at_ms INTEGER NOT NULL,
                page_weight_kb REAL NOT NULL,
                monthly_visits INTEGER NOT NULL,
                annual_energy_kwh REAL NOT NULL,
                annual_carbon_kg REAL NOT NULL,
                trees_needed INTEGER NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_website_metrics_url_time
            ON website_metrics (url, recorded_at_ms DESC);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Turn an exhausted retry into the error surfaced to callers.
pub(crate) fn exhausted(operation: &'static str, failure: RetryFailure<sqlx::Error>) -> StoreError {
    tracing::error!(
        operation,
        attempts = failure.attempts,
        "store operation failed: {}",
        failure.error
    );
    StoreError::Failed {
        operation,
        attempts: failure.attempts,
        source: failure.error,
    }
}

#[cfg(test)]
/// Open an in-memory store for tests (no disk I/O, no retry delays).
pub(crate) async fn open_memory() -> Result<MetricsStore, StoreError> {
    let mut opts = StoreOptions::new("sqlite::memory:");
    opts.retry = RetryPolicy::none();
    MetricsStore::connect(&opts).await
}
