//! Exponential-backoff retry for flaky third-party endpoints.
//!
//! The AI inference endpoints in particular rate-limit aggressively; the
//! original system wrapped those calls in hand-rolled backoff loops, and this
//! helper is the shared version of that loop.

use std::time::Duration;
use tracing::warn;

/// Retry schedule: `attempts` total tries, sleeping `base_delay` after the
/// first failure and doubling after each subsequent one.
#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self { attempts: 3, base_delay: Duration::from_millis(500) }
    }
}

impl BackoffPolicy {
    /// The delay slept after the given zero-based failed attempt.
    #[must_use]
    pub fn delay_for(&self, failed_attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(failed_attempt))
    }
}

/// Runs `op` until it succeeds, the error is not retryable, or the policy's
/// attempts are exhausted. Returns the last error on exhaustion.
///
/// # Errors
/// Propagates the operation's error.
pub async fn retry_with_backoff<T, E, F, Fut, R>(
    policy: BackoffPolicy,
    mut op: F,
    retryable: R,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    R: Fn(&E) -> bool,
{
    let attempts = policy.attempts.max(1);
    let mut failed = 0u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if failed + 1 < attempts && retryable(&err) => {
                let delay = policy.delay_for(failed);
                warn!(attempt = failed + 1, ?delay, error = %err, "Retrying after backoff");
                tokio::time::sleep(delay).await;
                failed += 1;
            },
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn instant_policy(attempts: u32) -> BackoffPolicy {
        BackoffPolicy { attempts, base_delay: Duration::ZERO }
    }

    #[test]
    fn delays_double() {
        let policy = BackoffPolicy { attempts: 4, base_delay: Duration::from_millis(500) };
        assert_eq!(policy.delay_for(0), Duration::from_millis(500));
        assert_eq!(policy.delay_for(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(2000));
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, String> = retry_with_backoff(
            instant_policy(3),
            || async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err("transient".to_owned())
                } else {
                    Ok(7)
                }
            },
            |_| true,
        )
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_exhausting_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), String> = retry_with_backoff(
            instant_policy(3),
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("still down".to_owned())
            },
            |_| true,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn fatal_errors_short_circuit() {
        let calls = AtomicU32::new(0);
        let result: Result<(), String> = retry_with_backoff(
            instant_policy(5),
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("bad request".to_owned())
            },
            |_| false,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
