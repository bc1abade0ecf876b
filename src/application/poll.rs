//! Fixed-interval condition polling.
//!
//! The single wait primitive behind every lifecycle stage: check a
//! condition immediately, then on an interval, until it holds, fails, or a
//! deadline elapses. Built on `tokio::time` so tests run under a paused
//! runtime clock with no real delays.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// Why a poll ended without the condition holding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PollError<E> {
    #[error("condition not met within {0:?}")]
    DeadlineExceeded(Duration),

    /// The condition check itself failed. Check errors abort the poll
    /// immediately; they are never swallowed or retried here.
    #[error(transparent)]
    Check(E),
}

/// Invoke `check` immediately, then every `interval`, until it returns
/// `Ok(true)`.
///
/// The deadline is a single budget fixed at entry — it is not reset by tick
/// drift. A tick is only scheduled when a whole `interval` still fits in the
/// remaining budget, so a deadline shorter than the interval yields exactly
/// one check.
pub async fn poll_immediate<F, Fut, E>(
    interval: Duration,
    deadline: Duration,
    mut check: F,
) -> Result<(), PollError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    let started = tokio::time::Instant::now();
    loop {
        if check().await.map_err(PollError::Check)? {
            return Ok(());
        }
        if started.elapsed() + interval > deadline {
            return Err(PollError::DeadlineExceeded(deadline));
        }
        tokio::time::sleep(interval).await;
    }
}
