use std::future::Future;
use std::time::Duration;

/// Exponential backoff schedule for startup dependencies.
#[derive(Debug, Clone, Copy)]
pub struct Backoff {
    pub max_attempts: usize,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(4),
        }
    }
}

impl Backoff {
    /// Delay slept after the given failed attempt (1-based).
    pub fn delay_after(&self, attempt: usize) -> Duration {
        let shift = attempt.saturating_sub(1).min(16) as u32;
        self.initial_delay
            .saturating_mul(1 << shift)
            .min(self.max_delay)
    }
}

/// Runs `operation` until it succeeds or `backoff.max_attempts` is spent,
/// returning the last error.
pub async fn retry_with_backoff<F, Fut, T, E>(
    backoff: Backoff,
    operation_name: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let max_attempts = backoff.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= max_attempts => {
                tracing::error!("{} failed after {} attempts: {}", operation_name, attempt, e);
                return Err(e);
            }
            Err(e) => {
                let delay = backoff.delay_after(attempt);
                tracing::warn!(
                    "{} failed (attempt {}/{}): {}; retrying in {:?}",
                    operation_name,
                    attempt,
                    max_attempts,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
