//! Persistent measurement history (SQLite via sqlx).
//!
//! An append-only log of [`Measurement`]s partitioned by URL. Every
//! operation runs under the shared retry policy and inside a scoped
//! [`session::Session`], so a connection is returned to the pool on every
//! exit path.

mod db;
mod ops;
mod session;
mod types;

pub use db::{database_url_from_env, default_database_url, MetricsStore, DATABASE_URL_VARS};
pub use types::{Measurement, StoreOptions};
