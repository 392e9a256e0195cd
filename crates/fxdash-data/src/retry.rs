//! Retry logic with exponential backoff.

use fxdash_core::error::SourceError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Retry budget for upstream requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Never below 1.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub base_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(3),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with `max_attempts` total attempts.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            ..Self::default()
        }
    }

    /// Single attempt, no retries.
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Delay after the failed attempt number `attempt` (1-based).
    ///
    /// `base * 2^(attempt-1)`, capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay)
    }
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// attempt budget is spent. The last error is returned.
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, what: &str, mut op: F) -> Result<T, SourceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SourceError>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < attempts && err.is_retryable() => {
                let delay = policy.delay_for_attempt(attempt);
                warn!(
                    what,
                    attempt,
                    max_attempts = attempts,
                    error = %err,
                    "request failed, retrying in {:?}",
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 2);
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(250));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(500));
    }

    #[test]
    fn test_delay_is_capped() {
        let policy = RetryPolicy {
            max_attempts: 10,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(1),
        };
        assert_eq!(policy.delay_for_attempt(3), Duration::from_secs(1));
        assert_eq!(policy.delay_for_attempt(40), Duration::from_secs(1));
    }

    #[test]
    fn test_attempts_never_zero() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
        assert_eq!(RetryPolicy::no_retry().max_attempts, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_transient_failure() {
        let calls = &AtomicU32::new(0);
        let result = retry(&RetryPolicy::default(), "latest", || async move {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(SourceError::Connection("reset".into()))
            } else {
                Ok(7)
            }
        })
        .await;

        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_exhausted_returns_last_error() {
        let calls = &AtomicU32::new(0);
        let result: Result<(), _> = retry(&RetryPolicy::default(), "latest", || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(SourceError::Timeout("slow".into()))
        })
        .await;

        assert_eq!(result, Err(SourceError::Timeout("slow".into())));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_fails_fast() {
        let calls = &AtomicU32::new(0);
        let result: Result<(), _> = retry(&RetryPolicy::new(5, Duration::from_millis(10)), "series", || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(SourceError::Status {
                status: 404,
                body: String::new(),
            })
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
