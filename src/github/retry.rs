//! Bounded retry with exponential backoff and random jitter.
use log::*;
use std::{future::Future, time::Duration};
use tokio::time::sleep;

/// Default total number of attempts, including the first one.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Delay before the second attempt, doubled for each one after that.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
/// Upper bound of the random jitter added to every delay.
pub const DEFAULT_MAX_JITTER: Duration = Duration::from_secs(1);

/// Configuration for exponential backoff retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total number of attempts (not retries). Always at least 1.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Maximum random jitter added on top of the exponential delay.
    pub max_jitter: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_jitter: DEFAULT_MAX_JITTER,
        }
    }
}

impl RetryConfig {
    /// Retry configuration without any waiting between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            max_jitter: Duration::ZERO,
        }
    }

    /// Exponential part of the delay that follows the given 1-indexed
    /// failed attempt: `base_delay * 2^(attempt - 1)`.
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1 << exponent)
    }

    /// Backoff plus a uniformly random jitter in `[0, max_jitter)`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let jitter = self.max_jitter.mul_f64(rand::random::<f64>());
        self.backoff_for_attempt(attempt) + jitter
    }
}

/// Outcome of a single attempt as seen by the retry loop.
pub enum Attempt<T, E> {
    /// Stop and hand the value to the caller.
    Done(T),
    /// Permanent failure; returned without further attempts.
    Fail(E),
    /// Transient outcome; retried while attempts remain, otherwise returned.
    Retry(std::result::Result<T, E>),
}

/// Run `operation` until it reports [`Attempt::Done`] or [`Attempt::Fail`],
/// or the configured number of attempts is used up. Attempts are strictly
/// sequential.
pub async fn with_backoff<T, E, F, Fut>(
    config: RetryConfig,
    mut operation: F,
) -> std::result::Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Attempt<T, E>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Attempt::Done(value) => return Ok(value),
            Attempt::Fail(err) => return Err(err),
            Attempt::Retry(outcome) => {
                if attempt >= max_attempts {
                    debug!("giving up after {attempt} attempt(s)");
                    return outcome;
                }

                let delay = config.delay_for_attempt(attempt);

                match &outcome {
                    Err(err) => warn!(
                        "attempt {attempt}/{max_attempts} failed: {err}: retrying in {delay:?}"
                    ),
                    Ok(_) => warn!(
                        "attempt {attempt}/{max_attempts} returned a retryable response: retrying in {delay:?}"
                    ),
                }

                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
