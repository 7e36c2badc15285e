//! Retry utilities for quota-limited API calls.
//!
//! A 403/429-class response is an exhausted quota, not a terminal
//! failure: the client records the advertised reset and the retried
//! attempt sleeps through it before re-sending. The backoff here only
//! spaces the re-entry; the real wait lives in the client.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};

use crate::enrich::{ProgressCallback, RunProgress};

/// Retries per call for quota-exhaustion errors. One is enough: the
/// retried attempt waits out the full window first.
pub const QUOTA_RETRY_ATTEMPTS: usize = 1;

/// Initial delay before re-entering a retried call.
pub const RETRY_MIN_DELAY_MS: u64 = 500;

/// Maximum delay between retries.
pub const RETRY_MAX_DELAY_MS: u64 = 2_000;

/// Configuration for retry operations.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Minimum delay between retries.
    pub min_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Maximum number of retry attempts.
    pub max_retries: usize,
    /// Whether to add jitter to delays.
    pub with_jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(RETRY_MIN_DELAY_MS),
            max_delay: Duration::from_millis(RETRY_MAX_DELAY_MS),
            max_retries: QUOTA_RETRY_ATTEMPTS,
            with_jitter: true,
        }
    }
}

impl RetryConfig {
    /// Build an exponential backoff strategy from this configuration.
    #[must_use]
    pub fn into_backoff(self) -> ExponentialBuilder {
        let mut builder = ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_retries);

        if self.with_jitter {
            builder = builder.with_jitter();
        }

        builder
    }
}

/// The default backoff for quota-limited API calls.
#[must_use]
pub fn quota_backoff() -> ExponentialBuilder {
    RetryConfig::default().into_backoff()
}

/// Execute an operation, retrying when `is_retryable` says the error is
/// a quota signal. Each retry is reported through the progress callback
/// and logged at debug level.
pub async fn with_retry<T, E, F, Fut, IsRetryable, ShortMsg>(
    mut operation: F,
    is_retryable: IsRetryable,
    short_message: ShortMsg,
    context: &str,
    on_progress: Option<&ProgressCallback>,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::error::Error + Send + Sync + 'static,
    IsRetryable: Fn(&E) -> bool + Send + Sync + 'static,
    ShortMsg: Fn(&E) -> String + Send + Sync + 'static,
{
    let context = context.to_string();

    // Track attempt number for progress reporting.
    let attempt = AtomicU32::new(0);

    let retry_op = || {
        attempt.fetch_add(1, Ordering::SeqCst);
        operation()
    };

    retry_op
        .retry(quota_backoff())
        .notify(|err, dur| {
            let current_attempt = attempt.load(Ordering::SeqCst);
            if let Some(cb) = on_progress {
                cb(RunProgress::QuotaRetry {
                    context: context.clone(),
                    retry_after_ms: dur.as_millis() as u64,
                    attempt: current_attempt,
                });
            }
            tracing::debug!(
                context = %context,
                retry_in = ?dur,
                attempt = current_attempt,
                error = %short_message(err),
                "Quota exhausted, retrying"
            );
        })
        .when(is_retryable)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_retry_config_default() {
        let config = RetryConfig::default();
        assert_eq!(config.min_delay, Duration::from_millis(RETRY_MIN_DELAY_MS));
        assert_eq!(config.max_delay, Duration::from_millis(RETRY_MAX_DELAY_MS));
        assert_eq!(config.max_retries, QUOTA_RETRY_ATTEMPTS);
        assert!(config.with_jitter);
    }

    #[test]
    fn test_quota_backoff_creates_builder() {
        let _backoff = quota_backoff();
    }

    #[derive(Debug, Clone)]
    struct TestError {
        message: &'static str,
        rate_limited: bool,
    }

    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.message)
        }
    }

    impl std::error::Error for TestError {}

    #[tokio::test(start_paused = true)]
    async fn with_retry_retries_quota_errors_once_and_emits_progress() {
        let calls = Arc::new(AtomicU32::new(0));

        let events: Arc<Mutex<Vec<RunProgress>>> = Arc::new(Mutex::new(Vec::new()));
        let events_capture = Arc::clone(&events);
        let callback: ProgressCallback = Box::new(move |event| {
            events_capture
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(event);
        });

        // Fail once with a quota error, then succeed.
        let calls_capture = Arc::clone(&calls);
        let mut operation = move || {
            let calls_capture = Arc::clone(&calls_capture);
            async move {
                let n = calls_capture.fetch_add(1, Ordering::SeqCst);
                if n == 0 {
                    Err(TestError {
                        message: "rate limited",
                        rate_limited: true,
                    })
                } else {
                    Ok(42u32)
                }
            }
        };

        let advancer = tokio::spawn(async {
            for _ in 0..30 {
                tokio::time::advance(Duration::from_secs(5)).await;
                tokio::task::yield_now().await;
            }
        });

        let result = with_retry(
            &mut operation,
            |e: &TestError| e.rate_limited,
            |e: &TestError| e.to_string(),
            "/users/octocat",
            Some(&callback),
        )
        .await;

        advancer.await.expect("advancer task");

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let events = events.lock().unwrap_or_else(|e| e.into_inner());
        assert!(
            events
                .iter()
                .any(|e| matches!(e, RunProgress::QuotaRetry { .. }))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn with_retry_gives_up_after_the_single_retry() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_capture = Arc::clone(&calls);

        let mut operation = move || {
            let calls_capture = Arc::clone(&calls_capture);
            async move {
                calls_capture.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(TestError {
                    message: "rate limited",
                    rate_limited: true,
                })
            }
        };

        let advancer = tokio::spawn(async {
            for _ in 0..30 {
                tokio::time::advance(Duration::from_secs(5)).await;
                tokio::task::yield_now().await;
            }
        });

        let err = with_retry(
            &mut operation,
            |e: &TestError| e.rate_limited,
            |e: &TestError| e.to_string(),
            "/users/octocat",
            None,
        )
        .await
        .expect_err("expected error");

        advancer.await.expect("advancer task");

        assert_eq!(err.to_string(), "rate limited");
        // Initial attempt plus exactly one retry.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn with_retry_does_not_retry_terminal_errors() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_capture = Arc::clone(&calls);

        let mut operation = move || {
            let calls_capture = Arc::clone(&calls_capture);
            async move {
                calls_capture.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(TestError {
                    message: "boom",
                    rate_limited: false,
                })
            }
        };

        let err = with_retry(
            &mut operation,
            |e: &TestError| e.rate_limited,
            |e: &TestError| e.to_string(),
            "/users/octocat",
            None,
        )
        .await
        .expect_err("expected error");

        assert_eq!(err.to_string(), "boom");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
