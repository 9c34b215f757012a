//! Fixed-interval retry for store startup

use std::future::Future;
use tracing::{debug, error, warn};

use crate::config::RetryPolicy;
use crate::error::StoreError;

/// Run `operation` until it succeeds or the policy's attempts are used up.
///
/// The closure receives the 1-based attempt number. When every attempt fails
/// the last error is wrapped in `StoreError::Unavailable`.
pub async fn with_fixed_interval<F, Fut, T>(policy: &RetryPolicy, operation: F) -> Result<T, StoreError>
where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        debug!("Opening store, attempt {}/{}", attempt, max_attempts);

        match operation(attempt).await {
            Ok(value) => {
                if attempt > 1 {
                    debug!("Store opened after {} attempts", attempt);
                }
                return Ok(value);
            }
            Err(e) if attempt >= max_attempts => {
                error!("Max attempts ({}) reached, giving up: {}", max_attempts, e);
                return Err(StoreError::Unavailable {
                    attempts: attempt,
                    source: Box::new(e),
                });
            }
            Err(e) => {
                warn!(
                    "Store not ready (attempt {}/{}), retrying in {:?}: {}",
                    attempt, max_attempts, policy.delay, e
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn quick(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            delay: Duration::from_millis(1),
        }
    }

    fn not_ready() -> StoreError {
        StoreError::Database(sqlx::Error::PoolTimedOut)
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let result = with_fixed_interval(&quick(3), |_| async { Ok::<_, StoreError>(42) }).await;
        assert_eq!(tokio_test::assert_ok!(result), 42);
    }

    #[tokio::test]
    async fn test_success_after_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result = with_fixed_interval(&quick(10), move |attempt| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                if attempt < 4 {
                    Err(not_ready())
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 4);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: Result<(), StoreError> = with_fixed_interval(&quick(3), move |_| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(not_ready())
            }
        })
        .await;

        match tokio_test::assert_err!(result) {
            StoreError::Unavailable { attempts, source } => {
                assert_eq!(attempts, 3);
                assert!(matches!(*source, StoreError::Database(_)));
            }
            other => panic!("Expected Unavailable, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_waits_between_attempts() {
        let policy = RetryPolicy {
            max_attempts: 3,
            delay: Duration::from_millis(20),
        };
        let started = std::time::Instant::now();

        let _ = with_fixed_interval(&policy, |_| async { Err::<(), _>(not_ready()) }).await;

        assert!(started.elapsed() >= Duration::from_millis(40));
    }
}
