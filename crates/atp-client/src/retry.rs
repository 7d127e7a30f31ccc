//! Retry with exponential backoff for retryable transport failures.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use atp_config::RetrySettings;
use atp_protocols::error::AtpError;

/// Retry configuration.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts after the first try.
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    /// Spread delays by up to 10% either way.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetrySettings::default())
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            base_delay: Duration::from_millis(settings.base_delay_ms),
            max_delay: Duration::from_millis(settings.max_delay_ms),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Calculate delay for a given attempt.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay =
            self.base_delay.as_millis() as f64 * self.backoff_multiplier.powi(attempt as i32);
        let delay = delay.min(self.max_delay.as_millis() as f64);

        let delay_ms = if self.jitter {
            (delay + rand_jitter(delay * 0.1)).max(0.0) as u64
        } else {
            delay as u64
        };

        Duration::from_millis(delay_ms)
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error,
    /// or the retry budget is spent.
    pub async fn run<F, Fut, T>(&self, what: &str, operation: F) -> Result<T, AtpError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, AtpError>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() || attempt >= self.max_retries => return Err(e),
                Err(e) => {
                    let delay = self.delay_for_attempt(attempt);
                    warn!(
                        "{} failed (attempt {}/{}): {}, retrying in {:?}",
                        what,
                        attempt + 1,
                        self.max_retries + 1,
                        e,
                        delay
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// Simple jitter using system time.
fn rand_jitter(max: f64) -> f64 {
    use std::time::SystemTime;
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    spread(nanos as f64 / 1_000_000_000.0, max)
}

/// Map `fraction` in `[0, 1)` onto `[-max, max)`.
fn spread(fraction: f64, max: f64) -> f64 {
    fraction * max * 2.0 - max
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use atp_protocols::error::{ToolError, TransportError};

    fn fixed() -> RetryPolicy {
        RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(350),
            backoff_multiplier: 2.0,
            jitter: false,
        }
    }

    #[test]
    fn test_delay_grows_and_caps() {
        let policy = fixed();
        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(350));
    }

    #[test]
    fn test_jitter_stays_within_ten_percent() {
        let policy = RetryPolicy {
            jitter: true,
            ..fixed()
        };
        let delay = policy.delay_for_attempt(0).as_millis();
        assert!((90..=110).contains(&delay));
    }

    #[test]
    fn test_jitter_covers_both_directions() {
        assert_eq!(spread(0.0, 10.0), -10.0);
        assert_eq!(spread(0.5, 10.0), 0.0);
        assert!(spread(0.999_999_999, 10.0) > 9.99);
        for _ in 0..100 {
            let offset = rand_jitter(10.0);
            assert!((-10.0..10.0).contains(&offset));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_success() {
        let attempts = &AtomicU32::new(0);
        let result = fixed()
            .run("call", move || async move {
                if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(AtpError::from(TransportError::Network("refused".into())))
                } else {
                    Ok(7)
                }
            })
            .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_budget() {
        let attempts = &AtomicU32::new(0);
        let result: Result<(), _> = fixed()
            .run("call", move || async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err(AtpError::from(TransportError::Status {
                    status: 503,
                    message: "draining".into(),
                }))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_non_retryable_fails_fast() {
        let attempts = &AtomicU32::new(0);
        let result: Result<(), _> = fixed()
            .run("call", move || async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err(AtpError::from(ToolError::handler("boom")))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
