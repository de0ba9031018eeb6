//! Retry logic with exponential backoff
//!
//! This module provides the bounded retry loop driving time-zone lookups.
//! It implements exponential backoff with a delay cap and optional jitter.
//!
//! Unlike a retries-after-first-failure counter, [`RetryConfig::max_attempts`]
//! bounds the **total** number of attempt cycles: a ceiling of 50 means the
//! operation runs at most 50 times.
//!
//! [`RetryConfig::max_attempts`]: crate::config::RetryConfig::max_attempts

use crate::config::RetryConfig;
use crate::error::LookupError;
use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// Trait for errors that can be classified as retryable or not
///
/// Transient failures (connect errors, timeouts, a garbled response body)
/// should return `true`. Terminal states should return `false`.
pub trait IsRetryable {
    /// Returns true if the error is transient and the operation should be retried
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for LookupError {
    fn is_retryable(&self) -> bool {
        match self {
            // Every kind of attempt-cycle failure aborts only that cycle:
            // transport errors, bad statuses, and unparsable bodies alike
            LookupError::Http(_)
            | LookupError::HttpStatus(_)
            | LookupError::MissingField(_)
            | LookupError::InvalidOffset(_) => true,
            // Exhaustion is the terminal verdict for the row
            LookupError::Exhausted { .. } => false,
        }
    }
}

/// Execute an async operation with bounded retry and exponential backoff
///
/// Runs `operation` up to `config.max_attempts` times total, sleeping between
/// cycles with exponentially growing, capped, optionally jittered delays.
/// A ceiling of zero still performs one cycle.
///
/// Returns the first success, or the last error once attempts are exhausted
/// or a non-retryable error appears.
pub async fn resolve_with_retry<F, Fut, T, E>(config: &RetryConfig, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: IsRetryable + std::fmt::Display,
{
    let mut attempt: u32 = 0;
    let mut delay = config.initial_delay;

    loop {
        attempt += 1;
        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    tracing::info!(attempts = attempt, "lookup succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) if e.is_retryable() && attempt < config.max_attempts => {
                tracing::warn!(
                    error = %e,
                    attempt = attempt,
                    max_attempts = config.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "lookup attempt failed, retrying"
                );

                let jittered_delay = if config.jitter {
                    add_jitter(delay)
                } else {
                    delay
                };
                tokio::time::sleep(jittered_delay).await;

                let next_delay =
                    Duration::from_secs_f64(delay.as_secs_f64() * config.backoff_multiplier);
                delay = next_delay.min(config.max_delay);
            }
            Err(e) => {
                if e.is_retryable() {
                    tracing::error!(
                        error = %e,
                        attempts = attempt,
                        "lookup failed after all attempts exhausted"
                    );
                } else {
                    tracing::error!(error = %e, "lookup failed with non-retryable error");
                }
                return Err(e);
            }
        }
    }
}

/// Add random jitter to a delay to avoid hammering a struggling service
///
/// Jitter is uniformly distributed between 0% and 100% of the delay, so the
/// actual delay falls between `delay` and `2 * delay`.
fn add_jitter(delay: Duration) -> Duration {
    let mut rng = rand::thread_rng();
    let jitter_factor: f64 = rng.gen_range(0.0..=1.0);
    let jittered_secs = delay.as_secs_f64() * (1.0 + jitter_factor);
    Duration::from_secs_f64(jittered_secs)
}
