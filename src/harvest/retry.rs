//! Bounded retry with a fixed delay
//!
//! Used to absorb navigation flakiness only. Field extraction never retries;
//! it falls back to the next strategy instead.

use crate::config::TimingConfig;
use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Runs `operation` until it succeeds or `max_attempts` invocations have failed
///
/// The delay between attempts is constant, with no backoff or jitter. When
/// every attempt fails, the last attempt's error is returned unchanged. A
/// `max_attempts` of zero still runs the operation once.
///
/// The operation must be safe to repeat; nothing a failed attempt did is
/// undone.
pub async fn retry<T, E, F, Fut>(mut operation: F, max_attempts: u32, delay: Duration) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts => {
                tracing::warn!(
                    "Attempt {}/{} failed: {}; retrying in {:?}",
                    attempt,
                    max_attempts,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Attempt count and delay for [`retry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Navigation policy from the timing section
    pub fn from_timing(timing: &TimingConfig) -> Self {
        Self::new(timing.retry_attempts, timing.retry_delay())
    }

    pub async fn run<T, E, F, Fut>(&self, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        retry(operation, self.max_attempts, self.delay).await
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_timing(&TimingConfig::default())
    }
}
