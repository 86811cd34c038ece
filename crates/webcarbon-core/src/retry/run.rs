//! Retry loop: run an async operation until success or the policy says stop.

use std::future::Future;

use super::policy::{ErrorKind, RetryDecision, RetryPolicy};

/// The last error of a retried operation, with how many attempts were made.
#[derive(Debug)]
pub struct RetryFailure<E> {
    pub error: E,
    pub attempts: u32,
}

/// Runs `f` until it succeeds or the retry policy says to stop.
///
/// Each failure is classified with `classify`; transient failures sleep for
/// the backoff delay and try again. `operation` only labels log lines.
pub async fn retry_async<T, E, F, Fut, C>(
    policy: &RetryPolicy,
    operation: &str,
    classify: C,
    mut f: F,
) -> Result<T, RetryFailure<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: Fn(&E) -> ErrorKind,
    E: std::fmt::Display,
{
    let mut attempt = 1u32;
    loop {
        match f().await {
            Ok(v) => return Ok(v),
            Err(e) => {
                let kind = classify(&e);
                match policy.decide(attempt, kind) {
                    RetryDecision::NoRetry => {
                        return Err(RetryFailure {
                            error: e,
                            attempts: attempt,
                        })
                    }
                    RetryDecision::RetryAfter(d) => {
                        tracing::warn!(
                            operation,
                            attempt,
                            ?kind,
                            delay_ms = d.as_millis() as u64,
                            "retrying after error: {}",
                            e
                        );
                        tokio::time::sleep(d).await;
                        attempt += 1;
                    }
                }
            }
        }
    }
}
