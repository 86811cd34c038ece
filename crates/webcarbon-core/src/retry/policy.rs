use std::time::Duration;

/// High-level classification of an error for retry purposes.
///
/// Callers map driver or transport errors into these kinds; only the
/// transient ones are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operation timed out (connect, pool acquire).
    Timeout,
    /// Network or I/O level failure talking to the backend.
    Connection,
    /// Backend is temporarily busy or locked by another writer.
    Busy,
    /// Any other error (not retried).
    Other,
}

impl ErrorKind {
    pub fn is_transient(self) -> bool {
        !matches!(self, ErrorKind::Other)
    }
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// How the delay between attempts evolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backoff {
    /// Same delay before every retry.
    #[default]
    Fixed,
    /// `base * 2^(attempt-1)`, capped at `max_delay`.
    Exponential,
}

/// Bounded retry policy.
///
/// Defaults to three attempts one second apart, which is what the store has
/// always used for connecting, recording and reading history.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Delay before a retry (base delay for exponential backoff).
    pub base_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff: Backoff::Fixed,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Decide what to do after `attempt` failed with an error of `kind`.
    ///
    /// `attempt` is 1-based (1 = first attempt).
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts || !kind.is_transient() {
            return RetryDecision::NoRetry;
        }

        let delay = match self.backoff {
            Backoff::Fixed => self.base_delay,
            Backoff::Exponential => {
                let exp = 1u32 << attempt.saturating_sub(1).min(8);
                self.base_delay.saturating_mul(exp)
            }
        };
        RetryDecision::RetryAfter(delay.min(self.max_delay))
    }
}
