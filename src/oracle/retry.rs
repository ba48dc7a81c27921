//! Bounded retry with exponential backoff and jitter for oracle calls.
//!
//! Every oracle transport goes through [`with_retry`] so that a transient
//! failure costs one delayed retry instead of the whole game. The combinator
//! is generic over the call's output type; it is the single retry
//! implementation in the crate.

use super::OracleError;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{instrument, warn};

/// Retry policy: bounded attempts, exponential backoff, random jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Must be at least 1.
    pub attempts: u32,
    /// Base delay before the first retry; doubles per subsequent retry.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy with the given attempt count and base delay.
    pub fn new(attempts: u32, base_delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            base_delay,
        }
    }

    /// Backoff before retry number `retry` (0-based), jitter included.
    fn backoff(&self, retry: u32) -> Duration {
        let exp = self.base_delay.saturating_mul(1 << retry.min(16));
        // Sub-millisecond base delays truncate to zero whole milliseconds;
        // sampling an empty range would panic.
        let jitter_ms = match self.base_delay.as_millis() as u64 {
            0 => 0,
            millis => rand::rng().random_range(0..millis),
        };
        exp + Duration::from_millis(jitter_ms)
    }
}

impl Default for RetryPolicy {
    /// Two attempts total (one retry), 500ms base delay.
    fn default() -> Self {
        Self::new(2, Duration::from_millis(500))
    }
}

/// Runs `op` until it succeeds or the policy's attempts are exhausted.
///
/// The final failure is returned to the caller, never swallowed.
#[instrument(skip(policy, op), fields(attempts = policy.attempts))]
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, OracleError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, OracleError>>,
{
    let mut last_error = None;

    for attempt in 0..policy.attempts {
        if attempt > 0 {
            let delay = policy.backoff(attempt - 1);
            warn!(attempt, delay_ms = delay.as_millis() as u64, "Retrying oracle call");
            tokio::time::sleep(delay).await;
        }

        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                warn!(attempt, error = %e, "Oracle call failed");
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| OracleError::Failed("no attempts made".to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::new(2, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn succeeds_first_try() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&fast_policy(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, OracleError>(42) }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn recovers_after_one_failure() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&fast_policy(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(OracleError::Failed("flaky".to_string()))
                } else {
                    Ok("ok")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn sub_millisecond_base_delay_retries_without_panicking() {
        let policy = RetryPolicy::new(2, Duration::from_micros(500));
        let calls = AtomicU32::new(0);
        let result = with_retry(&policy, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(OracleError::Failed("flaky".to_string()))
                } else {
                    Ok("ok")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn exhaustion_surfaces_final_error() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(&fast_policy(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { Err(OracleError::Failed(format!("boom {}", n))) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(result.unwrap_err(), OracleError::Failed("boom 1".to_string()));
    }
}
