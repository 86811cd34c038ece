//! Types used by the metrics store.

use serde::Serialize;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::carbon::{self, Metrics};
use crate::config::StoreConfig;
use crate::error::InvalidInput;
use crate::retry::RetryPolicy;

/// One persisted footprint measurement. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub id: i64,
    pub url: String,
    /// Store-assigned Unix milliseconds; strictly increasing across inserts.
    pub timestamp_ms: i64,
    pub page_weight_kb: f64,
    pub monthly_visits: u32,
    pub annual_energy_kwh: f64,
    pub annual_carbon_kg: f64,
    pub trees_needed: u64,
}

impl Measurement {
    pub fn metrics(&self) -> Metrics {
        Metrics {
            page_weight_kb: self.page_weight_kb,
            annual_energy_kwh: self.annual_energy_kwh,
            annual_carbon_kg: self.annual_carbon_kg,
            trees_needed: self.trees_needed,
        }
    }

    /// Re-derive the metrics from the two source fields.
    pub fn recompute(&self) -> Result<Metrics, InvalidInput> {
        carbon::calculate(self.page_weight_kb, self.monthly_visits)
    }

    pub fn recorded_at(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(self.timestamp_ms.max(0) as u64)
    }
}

/// How to reach and size the store.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// `sqlite:` connection string, e.g. `sqlite:///var/lib/webcarbon/metrics.db`.
    pub database_url: String,
    /// Ceiling on pooled connections; excess acquirers queue.
    pub max_connections: u32,
    /// How long a queued acquirer waits before the operation fails.
    pub acquire_timeout: Duration,
    /// Connections older than this are closed and replaced.
    pub max_lifetime: Duration,
    /// SQLite's own wait on a locked database, before BUSY reaches the retry policy.
    pub busy_timeout: Duration,
    pub retry: RetryPolicy,
}

impl StoreOptions {
    /// Options for `database_url` with default pool sizing and retry policy.
    pub fn new(database_url: impl Into<String>) -> Self {
        let defaults = StoreConfig::default();
        Self {
            database_url: database_url.into(),
            max_connections: defaults.max_connections,
            acquire_timeout: Duration::from_secs(defaults.acquire_timeout_secs),
            max_lifetime: Duration::from_secs(defaults.max_lifetime_secs),
            busy_timeout: Duration::from_millis(defaults.busy_timeout_ms),
            retry: RetryPolicy::default(),
        }
    }

    pub(crate) fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }
}
