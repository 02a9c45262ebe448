//! Reusable retry policy for registry calls.
//!
//! Delete calls are retried on HTTP 429 and 5xx with exponential backoff
//! and a bounded attempt count; all other failures surface immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::{RegistryError, Result};

/// A bounded exponential-backoff retry policy.
///
/// The retryable predicate defaults to [`RegistryError::is_retryable`]
/// (HTTP 429 and 5xx).
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,

    /// Delay before the second attempt; doubles per attempt after that.
    pub base_delay: Duration,

    retryable: fn(&RegistryError) -> bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(500))
    }
}

impl RetryPolicy {
    /// Creates a policy with the given attempt bound and base delay.
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            retryable: RegistryError::is_retryable,
        }
    }

    /// Overrides the retryable-error predicate.
    #[must_use]
    pub fn with_retryable(mut self, retryable: fn(&RegistryError) -> bool) -> Self {
        self.retryable = retryable;
        self
    }

    /// Runs `op`, retrying retryable failures up to the attempt bound.
    ///
    /// # Errors
    ///
    /// Returns the last error once attempts are exhausted, or the first
    /// non-retryable error immediately.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if (self.retryable)(&err) && attempt < self.max_attempts => {
                    let delay = self.base_delay * 2u32.saturating_pow(attempt - 1);
                    tracing::debug!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "retrying after backoff"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn flaky(status: u16) -> RegistryError {
        RegistryError::HttpStatus {
            status,
            message: "boom".to_string(),
        }
    }

    #[tokio::test]
    async fn test_succeeds_first_attempt() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1));
        let calls = AtomicU32::new(0);

        let result: Result<u32> = policy
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(7) }
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_retryable_then_succeeds() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1));
        let calls = AtomicU32::new(0);

        let result: Result<&str> = policy
            .run(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(flaky(503))
                    } else {
                        Ok("done")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausts_attempts() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1));
        let calls = AtomicU32::new(0);

        let result: Result<()> = policy
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(flaky(429)) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_fails_fast() {
        let policy = RetryPolicy::new(5, Duration::from_millis(1));
        let calls = AtomicU32::new(0);

        let result: Result<()> = policy
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(flaky(404)) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
