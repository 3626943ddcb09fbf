use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Timeout error naming the operation and the allotted duration
#[derive(Debug, Error)]
#[error("operation '{op}' timed out after {}ms", .duration.as_millis())]
pub struct TimeoutError {
    pub op: String,
    pub duration: Duration,
}

/// Race `future` against a timer.
///
/// On expiry the result is a `TimeoutError` (downcastable through anyhow)
/// naming the operation and duration. The timed-out future is dropped, not
/// cancelled at its source; a remote call it wrapped may still complete.
pub async fn with_timeout<T, F>(op: &str, duration: Duration, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(TimeoutError {
            op: op.to_string(),
            duration,
        }
        .into()),
    }
}

/// Retry policy: attempt count and base backoff
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(500),
        }
    }
}

/// Retry `op` with exponential backoff.
///
/// `op` receives the 1-based attempt number. The delay before attempt n+1 is
/// `backoff * 2^(n-1)`. Retrying stops when `should_retry` rejects the error
/// or attempts are exhausted; the last error propagates.
pub async fn with_retry<T, F, Fut, P>(
    policy: RetryPolicy,
    should_retry: P,
    mut op: F,
) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
    P: Fn(&anyhow::Error) -> bool,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1u32;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if attempt >= max_attempts || !should_retry(&e) {
                    return Err(e);
                }
                let delay = policy.backoff * 2u32.pow(attempt - 1);
                log::debug!("attempt {} failed, retrying in {:?}: {}", attempt, delay, e);
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
