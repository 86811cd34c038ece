//! Retry and backoff policy.
//!
//! One policy shared by every store operation (connect, record, history):
//! failures are classified into coarse kinds, and the policy decides whether
//! and how long to wait before the next attempt.

mod classify;
mod policy;
mod run;

pub use classify::classify_sqlx_error;
pub use policy::{Backoff, ErrorKind, RetryDecision, RetryPolicy};
pub use run::{retry_async, RetryFailure};
