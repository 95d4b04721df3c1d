use std::future::Future;
use std::time::Duration;

/// Bounded retry with exponential backoff.
///
/// Only background jobs use this; interactive request paths fail fast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay slept after the given failed attempt (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }

    /// Run `op` until it succeeds or the attempt budget is spent.
    /// The last error is returned unchanged.
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_attempts => {
                    let delay = self.delay_after(attempt);
                    tracing::warn!(
                        "{} failed (attempt {}/{}): {}. Retrying in {:?}",
                        label,
                        attempt,
                        self.max_attempts,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
