use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::fetch::FetchOptions;
use crate::retry::{Backoff, RetryPolicy};
use crate::store::StoreOptions;

/// Traffic assumption used when the caller supplies none.
pub const DEFAULT_MONTHLY_VISITS: u32 = 10_000;

/// Fetch timeouts and fan-out (`[fetch]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub connect_timeout_secs: u64,
    /// Whole-transfer timeout for each fetch, root or sub-resource.
    pub timeout_secs: u64,
    /// Maximum sub-resource fetches in flight at once.
    pub max_concurrent_fetches: usize,
    pub max_redirects: u32,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            timeout_secs: 30,
            max_concurrent_fetches: 8,
            max_redirects: 10,
            user_agent: concat!("webcarbon/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FetchConfig {
    pub fn to_options(&self) -> FetchOptions {
        FetchOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.timeout_secs),
            max_concurrent_fetches: self.max_concurrent_fetches.max(1),
            max_redirects: self.max_redirects,
            user_agent: self.user_agent.clone(),
        }
    }
}

/// Connection pool sizing (`[store]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Ceiling on pooled connections; excess acquirers queue.
    pub max_connections: u32,
    /// How long an acquirer waits in the queue before timing out.
    pub acquire_timeout_secs: u64,
    /// Connections older than this are recycled.
    pub max_lifetime_secs: u64,
    /// How long SQLite waits on a locked database before reporting it busy.
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_connections: 15,
            acquire_timeout_secs: 30,
            max_lifetime_secs: 1800,
            busy_timeout_ms: 5000,
        }
    }
}

/// Retry policy parameters (optional `[retry]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per store operation (including the first).
    pub max_attempts: u32,
    /// Delay in seconds between attempts (base delay when exponential).
    pub delay_secs: f64,
    #[serde(default)]
    pub backoff: BackoffKind,
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: u64,
}

fn default_max_delay_secs() -> u64 {
    30
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_secs: 1.0,
            backoff: BackoffKind::Fixed,
            max_delay_secs: default_max_delay_secs(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    #[default]
    Fixed,
    Exponential,
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        let delay = if self.delay_secs.is_finite() && self.delay_secs > 0.0 {
            Duration::from_secs_f64(self.delay_secs)
        } else {
            Duration::ZERO
        };
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: delay,
            max_delay: Duration::from_secs(self.max_delay_secs),
            backoff: match self.backoff {
                BackoffKind::Fixed => Backoff::Fixed,
                BackoffKind::Exponential => Backoff::Exponential,
            },
        }
    }
}

/// Global configuration loaded from `~/.config/webcarbon/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebcarbonConfig {
    /// Traffic figure used when a measurement request does not give one.
    pub default_monthly_visits: u32,
    /// Number of past measurements `history` shows by default.
    pub history_limit: u32,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub store: StoreConfig,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for WebcarbonConfig {
    fn default() -> Self {
        Self {
            default_monthly_visits: DEFAULT_MONTHLY_VISITS,
            history_limit: 10,
            fetch: FetchConfig::default(),
            store: StoreConfig::default(),
            retry: None,
        }
    }
}

impl WebcarbonConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
            .as_ref()
            .map(RetryConfig::to_policy)
            .unwrap_or_default()
    }

    /// Store options for `database_url`, with pool sizing and retry policy from this config.
    pub fn store_options(&self, database_url: impl Into<String>) -> StoreOptions {
        StoreOptions {
            database_url: database_url.into(),
            max_connections: self.store.max_connections.max(1),
            acquire_timeout: Duration::from_secs(self.store.acquire_timeout_secs),
            max_lifetime: Duration::from_secs(self.store.max_lifetime_secs),
            busy_timeout: Duration::from_millis(self.store.busy_timeout_ms),
            retry: self.retry_policy(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("webcarbon")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<WebcarbonConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = WebcarbonConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: WebcarbonConfig = toml::from_str(&data)?;
    Ok(cfg)
}
