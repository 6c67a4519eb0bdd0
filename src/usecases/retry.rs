//! Resilient Call Wrapper - Uniform Retry for Port Invocations
//!
//! Every external port call goes through the same protocol: attempt,
//! fixed-interval backoff on failure, fixed attempt cap, typed exhaustion.
//! One generic wrapper instead of a hand-rolled counter loop per call site,
//! so every port fails with identical semantics.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

/// Retry parameters applied uniformly to every port call.
///
/// Backoff is fixed-interval, no jitter, no exponent.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts before abandoning (>= 1).
    pub max_attempts: u32,
    /// Fixed wait between attempts.
    pub backoff: Duration,
}

/// A call abandoned after exhausting its retry budget.
///
/// Consumed by the trading loop as an explicit abandon-this-step branch;
/// it never propagates past the cycle boundary.
#[derive(Debug, thiserror::Error)]
#[error("{operation} abandoned after {attempts} attempts: {last_error}")]
pub struct RetryExhausted {
    /// Human-readable name of the abandoned operation.
    pub operation: String,
    /// Attempts made (equals the policy's cap).
    pub attempts: u32,
    /// Message of the final failure.
    pub last_error: String,
}

/// Run `call` under the retry policy.
///
/// Returns the first success, or `RetryExhausted` after exactly
/// `policy.max_attempts` failed attempts. Each failure is logged with its
/// attempt number; the backoff sleep only happens when another attempt
/// remains.
pub async fn retrying<T, E, F, Fut>(
    operation: &str,
    policy: &RetryPolicy,
    mut call: F,
) -> Result<T, RetryExhausted>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut last_error = String::new();

    for attempt in 1..=max_attempts {
        match call().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(operation, retries = attempt - 1, "call succeeded after retries");
                }
                return Ok(value);
            }
            Err(e) => {
                warn!(
                    operation,
                    attempt,
                    max_attempts,
                    error = %e,
                    "port call failed"
                );
                last_error = e.to_string();
                if attempt < max_attempts {
                    sleep(policy.backoff).await;
                }
            }
        }
    }

    warn!(operation, attempts = max_attempts, "retry budget exhausted, abandoning call");
    Err(RetryExhausted {
        operation: operation.to_string(),
        attempts: max_attempts,
        last_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            backoff: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let calls = AtomicU32::new(0);
        let result = retrying("probe", &fast_policy(5), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, String>(42) }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_k_failures_then_success() {
        let calls = AtomicU32::new(0);
        let result = retrying("probe", &fast_policy(5), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 3 {
                    Err("transient".to_string())
                } else {
                    Ok(7)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        // 3 retries: 4 calls total.
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_exhaustion_after_exactly_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = retrying("probe", &fast_policy(4), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("down".to_string()) }
        })
        .await;
        let exhausted = result.unwrap_err();
        assert_eq!(exhausted.attempts, 4);
        assert_eq!(exhausted.operation, "probe");
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_zero_attempt_policy_still_calls_once() {
        let calls = AtomicU32::new(0);
        let result = retrying("probe", &fast_policy(0), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, String>(()) }
        })
        .await;
        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
