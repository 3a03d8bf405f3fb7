use shared::RetrySettings;
use std::fmt;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, warn};

/// Retry policy: a bounded number of attempts with a fixed delay between them
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Total number of invocations, including the first one
    pub max_attempts: u32,
    /// Delay between consecutive attempts
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::fixed(3, Duration::from_secs(5))
    }
}

impl From<RetrySettings> for RetryConfig {
    fn from(settings: RetrySettings) -> Self {
        Self::fixed(settings.max_attempts, settings.delay)
    }
}

impl RetryConfig {
    /// Same delay between every pair of attempts. At least one attempt is made.
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

/// Every attempt failed; carries the number of invocations and the last error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryExhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

impl<E: fmt::Display> fmt::Display for RetryExhausted<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed after {} attempts: {}",
            self.attempts, self.last_error
        )
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for RetryExhausted<E> {}

/// Run `operation` until it succeeds or `config.max_attempts` invocations
/// have failed. The first success is returned immediately; no delay follows
/// the final failed attempt.
pub async fn retry<F, Fut, T, E>(
    operation_name: &str,
    config: &RetryConfig,
    mut operation: F,
) -> Result<T, RetryExhausted<E>>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        debug!(
            "Executing '{}' - attempt {}/{}",
            operation_name, attempt, max_attempts
        );

        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(
                        "'{}' succeeded on attempt {}/{}",
                        operation_name, attempt, max_attempts
                    );
                }
                return Ok(value);
            }
            Err(e) => {
                warn!(
                    "Error: {}. Retrying '{}' ({}/{})...",
                    e, operation_name, attempt, max_attempts
                );

                if attempt >= max_attempts {
                    error!(
                        "'{}' failed after {} attempts",
                        operation_name, max_attempts
                    );
                    return Err(RetryExhausted {
                        attempts: attempt,
                        last_error: e,
                    });
                }

                if !config.delay.is_zero() {
                    sleep(config.delay).await;
                }
            }
        }
    }
}
