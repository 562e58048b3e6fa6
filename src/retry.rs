//! Fixed-delay retry logic
//!
//! Runs an operation up to `max_attempts` times with the same pause between attempts.
//! There is no backoff growth, no jitter and no pause after the final attempt.
//!
//! # Example
//!
//! ```no_run
//! use catalog_sync::config::RetryConfig;
//! use catalog_sync::retry::{IsRetryable, retry_with_fixed_delay};
//!
//! #[derive(Debug)]
//! struct Busy;
//!
//! impl std::fmt::Display for Busy {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
//!         write!(f, "busy")
//!     }
//! }
//!
//! impl IsRetryable for Busy {
//!     fn is_retryable(&self) -> bool {
//!         true
//!     }
//! }
//!
//! # async fn example() {
//! let config = RetryConfig::default();
//! let result = retry_with_fixed_delay(&config, |_attempt| async { Ok::<_, Busy>(42) }).await;
//! assert_eq!(result.ok(), Some(42));
//! # }
//! ```

use crate::config::RetryConfig;
use crate::error::Error;
use std::fmt;
use std::future::Future;

/// Trait for errors that can be classified as retryable or not
pub trait IsRetryable {
    /// Returns true if another attempt may succeed
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for Error {
    fn is_retryable(&self) -> bool {
        match self {
            // Every failure inside a catalog attempt is retried, whatever its cause
            Error::Catalog(_) => true,
            // Preparing the destination happens inside the attempt too
            Error::Sink(_) => true,
            Error::Network(_) | Error::Io(_) => true,
            // A bad configuration will not fix itself
            Error::Config { .. } => false,
            Error::Serialization(_) => false,
            Error::RetriesExhausted { .. } => false,
        }
    }
}

/// Why [`retry_with_fixed_delay`] gave up
#[derive(Debug)]
pub enum RetryError<E> {
    /// Every attempt failed with a retryable error
    Exhausted {
        /// Number of attempts made
        attempts: u32,
        /// Error of the final attempt
        last: E,
    },
    /// An attempt failed with an error that must not be retried
    Permanent {
        /// The attempt that failed (1-based)
        attempt: u32,
        /// The error
        error: E,
    },
}

impl<E> RetryError<E> {
    /// Number of attempts made before giving up
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. } => *attempts,
            RetryError::Permanent { attempt, .. } => *attempt,
        }
    }

    /// The error of the last attempt
    pub fn into_inner(self) -> E {
        match self {
            RetryError::Exhausted { last, .. } => last,
            RetryError::Permanent { error, .. } => error,
        }
    }
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryError::Exhausted { attempts, last } => {
                write!(f, "gave up after {} attempts: {}", attempts, last)
            }
            RetryError::Permanent { attempt, error } => {
                write!(f, "attempt {} failed permanently: {}", attempt, error)
            }
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for RetryError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RetryError::Exhausted { last, .. } => Some(last),
            RetryError::Permanent { error, .. } => Some(error),
        }
    }
}

/// Execute an async operation up to `config.max_attempts` times
///
/// The operation receives the 1-based attempt number. Between a failed attempt and the
/// next one the task sleeps for `config.delay`.
///
/// # Returns
///
/// The first successful result, or a [`RetryError`] carrying the last error.
pub async fn retry_with_fixed_delay<F, Fut, T, E>(
    config: &RetryConfig,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: IsRetryable + fmt::Display,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(result) => {
                if attempt > 1 {
                    tracing::info!(attempts = attempt, "operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) if !e.is_retryable() => {
                tracing::error!(error = %e, attempt, "operation failed with non-retryable error");
                return Err(RetryError::Permanent { attempt, error: e });
            }
            Err(e) if attempt >= max_attempts => {
                tracing::error!(
                    error = %e,
                    attempts = attempt,
                    "operation failed after all attempts exhausted"
                );
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    last: e,
                });
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    attempt,
                    max_attempts,
                    delay_ms = config.delay.as_millis(),
                    "attempt failed, retrying"
                );
                tokio::time::sleep(config.delay).await;
                attempt += 1;
            }
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::{Duration, Instant};

    #[derive(Debug)]
    enum TestError {
        Transient,
        Permanent,
    }

    impl fmt::Display for TestError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                TestError::Transient => write!(f, "transient error"),
                TestError::Permanent => write!(f, "permanent error"),
            }
        }
    }

    impl IsRetryable for TestError {
        fn is_retryable(&self) -> bool {
            matches!(self, TestError::Transient)
        }
    }

    fn fast(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            delay: Duration::from_millis(10),
        }
    }

    #[tokio::test]
    async fn test_success_no_retry() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry_with_fixed_delay(&fast(10), |_| {
            let counter = counter_clone.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, TestError>(42)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(counter.load(Ordering::SeqCst), 1, "should only call once");
    }

    #[tokio::test]
    async fn test_retry_transient_then_succeed() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen_clone = seen.clone();

        let result = retry_with_fixed_delay(&fast(10), |attempt| {
            let seen = seen_clone.clone();
            async move {
                seen.lock().unwrap().push(attempt);
                if attempt < 3 {
                    Err(TestError::Transient)
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_exhausted_after_exactly_max_attempts() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry_with_fixed_delay(&fast(4), |_| {
            let counter = counter_clone.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<i32, _>(TestError::Transient)
            }
        })
        .await;

        let err = result.unwrap_err();
        assert!(matches!(err, RetryError::Exhausted { attempts: 4, .. }));
        assert_eq!(err.attempts(), 4);
        assert_eq!(
            counter.load(Ordering::SeqCst),
            4,
            "max_attempts counts the first try"
        );
    }

    #[tokio::test]
    async fn test_permanent_error_no_retry() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry_with_fixed_delay(&fast(10), |_| {
            let counter = counter_clone.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<i32, _>(TestError::Permanent)
            }
        })
        .await;

        assert!(matches!(
            result.unwrap_err(),
            RetryError::Permanent { attempt: 1, .. }
        ));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_delay_is_fixed_and_skipped_after_last_attempt() {
        let config = RetryConfig {
            max_attempts: 3,
            delay: Duration::from_millis(50),
        };
        let timestamps = Arc::new(tokio::sync::Mutex::new(Vec::new()));
        let ts_clone = timestamps.clone();

        let start = Instant::now();
        let _ = retry_with_fixed_delay(&config, |_| {
            let ts = ts_clone.clone();
            async move {
                ts.lock().await.push(Instant::now());
                Err::<i32, _>(TestError::Transient)
            }
        })
        .await;
        let elapsed = start.elapsed();

        let ts = timestamps.lock().await;
        assert_eq!(ts.len(), 3);
        for pair in ts.windows(2) {
            let gap = pair[1] - pair[0];
            assert!(gap >= Duration::from_millis(50), "gap too short: {gap:?}");
        }
        // Two pauses only; upper bound is generous to tolerate CI scheduling
        assert!(elapsed >= Duration::from_millis(100), "waited {elapsed:?}");
        assert!(elapsed < Duration::from_millis(400), "waited {elapsed:?}");
    }

    #[tokio::test]
    async fn test_zero_attempts_still_runs_once() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let _ = retry_with_fixed_delay(&fast(0), |_| {
            let counter = counter_clone.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<i32, _>(TestError::Transient)
            }
        })
        .await;

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn catalog_failures_are_retryable_config_errors_are_not() {
        assert!(Error::Catalog(CatalogError::Status { status: 500 }).is_retryable());
        assert!(
            Error::Catalog(CatalogError::EmptyCatalog {
                snippet: String::new()
            })
            .is_retryable()
        );
        assert!(!Error::config("bad", "api_endpoint").is_retryable());
    }

    #[test]
    fn retry_error_display_mentions_attempts() {
        let err = RetryError::Exhausted {
            attempts: 5,
            last: TestError::Transient,
        };
        assert_eq!(err.to_string(), "gave up after 5 attempts: transient error");
        assert!(matches!(err.into_inner(), TestError::Transient));
    }
}
