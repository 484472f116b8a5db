//! Bounded retry with linear backoff
//!
//! Attempt `n` (1-based) that fails is followed by a pause of
//! `base_delay * n` before attempt `n + 1`. The final failure is returned
//! without pausing.

use crate::config::retry::{BASE_DELAY_MS, MAX_ATTEMPTS};
use std::fmt::Display;
use std::time::Duration;
use tracing::debug;

/// How many times to try and how long to wait between tries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts including the first one (0 is treated as 1)
    pub max_attempts: u32,
    /// Backoff unit
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            base_delay: Duration::from_millis(BASE_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Single attempt, no waiting
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Delay inserted after failed attempt `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    /// Effective attempt count
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Run `op` until it succeeds or the policy's attempts are used up.
///
/// `op` receives the 1-based attempt number. `sleep` is called with each
/// backoff delay, which lets callers choose between blocking the thread and
/// recording the delay.
pub fn retry_with_backoff<T, E, Op, Sleep>(
    policy: &RetryPolicy,
    mut sleep: Sleep,
    mut op: Op,
) -> std::result::Result<T, E>
where
    E: Display,
    Op: FnMut(u32) -> std::result::Result<T, E>,
    Sleep: FnMut(Duration),
{
    let attempts = policy.attempts();
    let mut attempt = 1;

    loop {
        match op(attempt) {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= attempts => return Err(e),
            Err(e) => {
                let delay = policy.delay_for(attempt);
                debug!(attempt, attempts, ?delay, error = %e, "retrying after failure");
                sleep(delay);
                attempt += 1;
            }
        }
    }
}
