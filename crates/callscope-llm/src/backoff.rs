//! Bounded retries with exponential delay
//!
//! Attempt `n` (0-indexed) that fails with a retryable error is followed by a
//! wait of `base_delay * 2^n` before attempt `n + 1`. There is no wait before
//! the first attempt, none after the last, and no jitter.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::{ChatCompletion, LlmError};

pub const DEFAULT_MAX_ATTEMPTS: usize = 4;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: usize,
    base_delay: Duration,
}

impl RetryPolicy {
    /// `max_attempts` counts the first try and is at least 1
    pub fn new(max_attempts: usize, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Wait after failed attempt `attempt` (0-indexed)
    pub fn delay_after(&self, attempt: usize) -> Duration {
        let factor = 2u32.saturating_pow(attempt as u32);
        self.base_delay.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_DELAY)
    }
}

pub struct BackoffClient<C> {
    inner: C,
    policy: RetryPolicy,
}

impl<C: ChatCompletion> BackoffClient<C> {
    pub fn new(inner: C, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: ChatCompletion> ChatCompletion for BackoffClient<C> {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let mut failures = 0;

        loop {
            match self.inner.complete(prompt).await {
                Ok(content) => {
                    if failures > 0 {
                        info!(attempts = failures + 1, "Chat completion succeeded after retry");
                    }
                    return Ok(content);
                }
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) => {
                    failures += 1;
                    warn!(
                        attempt = failures,
                        max_attempts = self.policy.max_attempts,
                        error = %err,
                        "Chat completion attempt failed"
                    );

                    if failures >= self.policy.max_attempts {
                        return Err(LlmError::Exhausted {
                            attempts: failures,
                            last: Box::new(err),
                        });
                    }

                    let delay = self.policy.delay_after(failures - 1);
                    debug!(delay_ms = delay.as_millis() as u64, "Retrying after backoff");
                    sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Instant;

    /// Replays scripted outcomes, then keeps succeeding
    struct Scripted {
        outcomes: Mutex<VecDeque<Result<String, LlmError>>>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(outcomes: Vec<Result<String, LlmError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatCompletion for Scripted {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok("ok".to_string()))
        }
    }

    fn unavailable(status: u16) -> Result<String, LlmError> {
        Err(LlmError::Status {
            status,
            body: "unavailable".to_string(),
        })
    }

    #[test]
    fn test_delay_schedule() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.delay_after(0), Duration::from_millis(500));
        assert_eq!(policy.delay_after(1), Duration::from_secs(1));
        assert_eq!(policy.delay_after(2), Duration::from_secs(2));
    }

    #[test]
    fn test_policy_needs_one_attempt() {
        assert_eq!(RetryPolicy::new(0, DEFAULT_BASE_DELAY).max_attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_success_has_no_wait() {
        let client = BackoffClient::new(Scripted::new(vec![]), RetryPolicy::default());
        let start = Instant::now();

        assert_eq!(client.complete("p").await.unwrap(), "ok");
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(client.inner().calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_three_failures_then_success() {
        let script = Scripted::new(vec![
            unavailable(500),
            unavailable(502),
            unavailable(503),
            Ok("Neutral".to_string()),
        ]);
        let client = BackoffClient::new(script, RetryPolicy::default());
        let start = Instant::now();

        let content = client.complete("p").await.unwrap();

        assert_eq!(content, "Neutral");
        assert_eq!(start.elapsed(), Duration::from_millis(3500));
        assert_eq!(client.inner().calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_four_failures_give_up_with_last_error() {
        let script = Scripted::new(vec![
            unavailable(500),
            unavailable(502),
            unavailable(503),
            unavailable(504),
            Ok("never reached".to_string()),
        ]);
        let client = BackoffClient::new(script, RetryPolicy::default());
        let start = Instant::now();

        let err = client.complete("p").await.unwrap_err();

        match err {
            LlmError::Exhausted { attempts, last } => {
                assert_eq!(attempts, 4);
                assert!(matches!(*last, LlmError::Status { status: 504, .. }));
            }
            other => panic!("expected Exhausted, got {:?}", other),
        }
        assert_eq!(start.elapsed(), Duration::from_millis(3500));
        assert_eq!(client.inner().calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_fails_immediately() {
        let script = Scripted::new(vec![Err(LlmError::Malformed("no choices".to_string()))]);
        let client = BackoffClient::new(script, RetryPolicy::default());
        let start = Instant::now();

        let err = client.complete("p").await.unwrap_err();

        assert!(matches!(err, LlmError::Malformed(_)));
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(client.inner().calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_credential_not_retried() {
        let script = Scripted::new(vec![Err(LlmError::MissingCredential)]);
        let client = BackoffClient::new(script, RetryPolicy::default());

        let err = client.complete("p").await.unwrap_err();

        assert!(matches!(err, LlmError::MissingCredential));
        assert_eq!(client.inner().calls(), 1);
    }
}
