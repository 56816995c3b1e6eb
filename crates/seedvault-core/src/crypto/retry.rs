//! Bounded retry around fallible cryptographic operations.

use std::future::Future;
use std::time::Duration;

use super::params::{MAX_CRYPTO_RETRIES, RETRY_BASE_DELAY};
use crate::error::{Result, SeedVaultError};

/// How many times to run an operation and how long to wait in between.
///
/// Attempt `n` that fails with a retryable error is followed by a pause of
/// `n * base_delay` before attempt `n + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_CRYPTO_RETRIES,
            base_delay: RETRY_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Delay after the given (1-based) failed attempt.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget is spent.
    ///
    /// `op` receives the 1-based attempt number. Non-retryable errors are
    /// returned unchanged; exhausting the budget yields
    /// [`SeedVaultError::RetriesExhausted`] carrying the last cause.
    pub async fn run<T, F, Fut>(&self, operation: &'static str, mut op: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) if attempt >= max_attempts => {
                    tracing::warn!(operation, attempts = attempt, "retries exhausted");
                    return Err(SeedVaultError::RetriesExhausted {
                        operation,
                        attempts: attempt,
                        cause: err.to_string(),
                    });
                }
                Err(err) => {
                    let delay = self.delay_after(attempt);
                    tracing::warn!(
                        operation,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "retrying after failure"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use tokio::time::Instant;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_transient_failures() {
        let calls = Cell::new(0);
        let started = Instant::now();

        let value = RetryPolicy::default()
            .run("encrypt", |attempt| {
                calls.set(attempt);
                async move {
                    if attempt < 3 {
                        Err(SeedVaultError::Crypto("transient".into()))
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(value, 3);
        assert_eq!(calls.get(), 3);
        // 100ms after the first failure, 200ms after the second.
        let waited = started.elapsed();
        assert!(waited >= Duration::from_millis(300));
        assert!(waited < Duration::from_millis(310));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_reports_attempts_and_cause() {
        let err = RetryPolicy::default()
            .run("decrypt", |attempt| async move {
                Err::<(), _>(SeedVaultError::Crypto(format!("fault {}", attempt)))
            })
            .await
            .unwrap_err();

        match err {
            SeedVaultError::RetriesExhausted {
                operation,
                attempts,
                cause,
            } => {
                assert_eq!(operation, "decrypt");
                assert_eq!(attempts, 3);
                assert!(cause.contains("fault 3"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_errors_return_immediately() {
        let calls = Cell::new(0);
        let started = Instant::now();

        let err = RetryPolicy::default()
            .run("decrypt", |attempt| {
                calls.set(attempt);
                async { Err::<(), _>(SeedVaultError::Authentication) }
            })
            .await
            .unwrap_err();

        assert!(matches!(err, SeedVaultError::Authentication));
        assert_eq!(calls.get(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_delay_grows_linearly() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Duration::from_millis(100));
        assert_eq!(policy.delay_after(2), Duration::from_millis(200));
    }
}
