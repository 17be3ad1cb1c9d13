//! # Retrying Mutator
//!
//! Applies one remote mutation and retries it while the service reports a
//! write conflict. Any other error ends the attempt immediately.

use crate::outcome::Outcome;
use bridge_traits::BridgeError;
use core_runtime::EngineConfig;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Conflict-aware retry wrapper around a single mutation
#[derive(Debug, Clone, Copy)]
pub struct RetryingMutator {
    max_attempts: u32,
    retry_delay: Duration,
}

impl RetryingMutator {
    pub fn new(max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            max_attempts,
            retry_delay,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.max_attempts, config.retry_delay)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `mutate` until it succeeds, fails for a non-conflict reason, or
    /// the attempt budget is spent.
    ///
    /// A conflict is followed by a fixed `retry_delay` wait unless it was the
    /// last attempt.
    pub async fn apply<T, F, Fut>(&self, target: T, mutate: F) -> Outcome<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = bridge_traits::error::Result<()>>,
    {
        let mut last_conflict: Option<BridgeError> = None;

        for attempt in 1..=self.max_attempts {
            match mutate().await {
                Ok(()) => {
                    if attempt > 1 {
                        debug!(attempt, "Mutation succeeded after retry");
                    }
                    return Outcome::success(target);
                }
                Err(e) if e.is_conflict() => {
                    if attempt < self.max_attempts {
                        debug!(
                            attempt,
                            max_attempts = self.max_attempts,
                            delay_ms = self.retry_delay.as_millis() as u64,
                            error = %e,
                            "Write conflict, retrying"
                        );
                        tokio::time::sleep(self.retry_delay).await;
                    }
                    last_conflict = Some(e);
                }
                Err(e) => {
                    warn!(attempt, error = %e, "Mutation failed");
                    return Outcome::failure(target, e.to_string());
                }
            }
        }

        let reason = match last_conflict {
            Some(e) => format!(
                "max retries exceeded after {} attempts: {}",
                self.max_attempts, e
            ),
            None => "max retries exceeded".to_string(),
        };
        warn!(max_attempts = self.max_attempts, %reason, "Giving up on mutation");
        Outcome::failure(target, reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    fn conflict() -> BridgeError {
        BridgeError::Conflict("playlist is being modified".to_string())
    }

    #[tokio::test(start_paused = true)]
    async fn test_conflicts_then_success() {
        let mutator = RetryingMutator::new(10, Duration::from_millis(600));
        let calls = AtomicU32::new(0);
        let started = Instant::now();

        let outcome = mutator
            .apply("track", || {
                let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if call <= 2 {
                        Err(conflict())
                    } else {
                        Ok(())
                    }
                }
            })
            .await;

        assert!(outcome.is_success());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(started.elapsed(), Duration::from_millis(1200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_persistent_conflict_exhausts_budget() {
        let mutator = RetryingMutator::new(10, Duration::from_millis(600));
        let calls = AtomicU32::new(0);
        let started = Instant::now();

        let outcome = mutator
            .apply("track", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(conflict()) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 10);
        // No wait after the final attempt
        assert_eq!(started.elapsed(), Duration::from_millis(600 * 9));
        let reason = outcome.reason().unwrap();
        assert!(reason.starts_with("max retries exceeded"));
        assert!(reason.contains("playlist is being modified"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_conflict_is_not_retried() {
        let mutator = RetryingMutator::new(10, Duration::from_millis(600));
        let calls = AtomicU32::new(0);
        let started = Instant::now();

        let outcome = mutator
            .apply("track", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(BridgeError::NotFound("track t1".to_string())) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(outcome.reason(), Some(BridgeError::NotFound("track t1".to_string()).to_string().as_str()));
    }

    #[tokio::test]
    async fn test_zero_budget_fails_without_calling() {
        let mutator = RetryingMutator::new(0, Duration::from_millis(1));
        let calls = AtomicU32::new(0);

        let outcome = mutator
            .apply(7, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(()) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(outcome.reason(), Some("max retries exceeded"));
        assert_eq!(outcome.into_item(), 7);
    }

    #[test]
    fn test_from_config() {
        let mutator = RetryingMutator::from_config(&EngineConfig::default());
        assert_eq!(mutator.max_attempts(), 10);
        assert_eq!(mutator.retry_delay, Duration::from_millis(600));
    }
}
