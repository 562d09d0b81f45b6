use crate::core::config::RetryConfig;
use crate::core::error::ExchangeError;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Retries transient failures after a random pause drawn from a fixed window.
///
/// Without `max_attempts` a call is retried for as long as it keeps failing
/// transiently; there is no cancellation hook besides dropping the future.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    min_wait: Duration,
    max_wait: Duration,
    max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    pub fn new(min_wait: Duration, max_wait: Duration, max_attempts: Option<u32>) -> Self {
        let (min_wait, max_wait) = if min_wait <= max_wait {
            (min_wait, max_wait)
        } else {
            (max_wait, min_wait)
        };
        RetryPolicy {
            min_wait,
            max_wait,
            max_attempts: max_attempts.map(|n| n.max(1)),
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            Duration::from_millis(config.min_wait_ms),
            Duration::from_millis(config.max_wait_ms),
            config.max_attempts,
        )
    }

    fn backoff(&self) -> Duration {
        let min = self.min_wait.as_millis() as u64;
        let max = self.max_wait.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }

    /// Runs `operation` until it succeeds, fails with a non-transient error,
    /// or the attempt ceiling is reached.
    pub async fn run<F, Fut, T>(&self, mut operation: F) -> Result<T, ExchangeError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ExchangeError>>,
    {
        let mut attempt = 1u32;
        loop {
            match operation().await {
                Ok(val) => return Ok(val),
                Err(err) if !err.is_transient() => return Err(err),
                Err(err) => {
                    if self.max_attempts.is_some_and(|max| attempt >= max) {
                        return Err(ExchangeError::RetriesExhausted {
                            attempts: attempt,
                            last: Box::new(err),
                        });
                    }
                    let wait = self.backoff();
                    warn!(
                        attempt,
                        wait_ms = wait.as_millis() as u64,
                        error = %err,
                        "Transient failure, retrying"
                    );
                    attempt += 1;
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }
}
