//! Classify database errors into retry policy error kinds.

use super::policy::ErrorKind;

const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

/// Classify an sqlx error for retry decisions.
///
/// Pool timeouts, I/O failures and SQLite busy/locked conditions are
/// transient; constraint violations, decode errors and a closed pool are not.
pub fn classify_sqlx_error(e: &sqlx::Error) -> ErrorKind {
    match e {
        sqlx::Error::PoolTimedOut => ErrorKind::Timeout,
        sqlx::Error::Io(_) | sqlx::Error::WorkerCrashed => ErrorKind::Connection,
        sqlx::Error::Database(db) => {
            // SQLite reports extended codes; the low byte is the primary code.
            let primary = db
                .code()
                .and_then(|c| c.parse::<i32>().ok())
                .map(|c| c & 0xff);
            match primary {
                Some(SQLITE_BUSY) | Some(SQLITE_LOCKED) => ErrorKind::Busy,
                _ => ErrorKind::Other,
            }
        }
        _ => ErrorKind::Other,
    }
}
