//! Error taxonomy shared by the measurement pipeline.
//!
//! Input problems are caught before any I/O, root fetch failures abort a
//! measurement, and store failures surface only after the retry policy gives
//! up. Sub-resource failures never reach this module; the aggregator absorbs
//! them.

use thiserror::Error;

/// Caller-supplied input that cannot be measured or converted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInput {
    #[error("not a valid absolute URL (scheme and host required): {0:?}")]
    Url(String),
    #[error("monthly visits must be a positive integer, got {0}")]
    MonthlyVisits(u64),
    #[error("page weight must be a finite, non-negative number of KB, got {0}")]
    PageWeight(f64),
    #[error("derived metrics do not match page weight {page_weight_kb} KB at {monthly_visits} monthly visits")]
    InconsistentMetrics {
        page_weight_kb: f64,
        monthly_visits: u32,
    },
}

/// Why a single fetch failed.
#[derive(Debug, Error)]
pub enum FetchFailure {
    /// libcurl reported an error (DNS, connect, timeout, TLS, ...).
    #[error("transfer failed: {0}")]
    Transport(#[from] curl::Error),
    /// The server answered with a non-2xx status.
    #[error("HTTP {0}")]
    Status(u32),
    /// The blocking fetch task panicked or was cancelled.
    #[error("fetch task did not complete: {0}")]
    Task(String),
}

/// The root document of a measurement could not be fetched.
#[derive(Debug, Error)]
#[error("failed to fetch {url}: {cause}")]
pub struct FetchError {
    pub url: String,
    #[source]
    pub cause: FetchFailure,
}

/// A metrics store operation failed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),
    #[error("unsupported database URL {0:?}: only sqlite: connection strings are supported")]
    UnsupportedBackend(String),
    /// Retries were exhausted (or the failure was not retryable).
    #[error("{operation} failed after {attempts} attempt(s): {source}")]
    Failed {
        operation: &'static str,
        attempts: u32,
        #[source]
        source: sqlx::Error,
    },
}

impl StoreError {
    /// Name of the store operation that failed, if the failure came from the database.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            StoreError::Failed { operation, .. } => Some(operation),
            _ => None,
        }
    }
}

/// Any failure a measurement request can surface at the boundary.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
