//! Bounded retries with exponential backoff for archive requests.

use crate::weather_data::error::WeatherDataError;
use bon::Builder;
use log::warn;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// How hard the fetcher tries before giving up on the archive.
///
/// The `n`-th retry waits `backoff_factor * 2^(n-1)`, capped at `max_backoff`.
/// Every attempt gets at most `attempt_timeout`, and the whole sequence including
/// sleeps never runs past `overall_deadline`.
///
/// # Examples
///
/// ```
/// use heatpump_counter::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::builder()
///     .max_retries(3)
///     .backoff_factor(Duration::from_millis(100))
///     .build();
/// assert_eq!(policy.backoff(1), Duration::from_millis(100));
/// assert_eq!(policy.backoff(3), Duration::from_millis(400));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
pub struct RetryPolicy {
    /// Additional attempts after the first one.
    #[builder(default = 5)]
    pub max_retries: u32,
    #[builder(default = Duration::from_millis(200))]
    pub backoff_factor: Duration,
    #[builder(default = Duration::from_secs(10))]
    pub max_backoff: Duration,
    #[builder(default = Duration::from_secs(10))]
    pub attempt_timeout: Duration,
    #[builder(default = Duration::from_secs(60))]
    pub overall_deadline: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RetryPolicy {
    /// Sleep before the `retry`-th retry (1-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::ZERO;
        }
        let factor = 2u32.saturating_pow(retry - 1);
        self.backoff_factor
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    /// Runs `attempt` until it succeeds, fails permanently, or the policy is spent.
    ///
    /// `attempt` receives the 1-based attempt number. Only errors for which
    /// [`WeatherDataError::is_transient`] holds are retried; anything else is
    /// returned as is. Running out of attempts or time yields
    /// [`WeatherDataError::UpstreamUnavailable`] wrapping the last failure.
    pub async fn run<T, F, Fut>(&self, mut attempt: F) -> Result<T, WeatherDataError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, WeatherDataError>>,
    {
        let started = Instant::now();
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            let remaining = self.overall_deadline.saturating_sub(started.elapsed());
            let budget = self.attempt_timeout.min(remaining);
            let outcome = match tokio::time::timeout(budget, attempt(attempts)).await {
                Ok(result) => result,
                Err(_) => Err(WeatherDataError::AttemptTimeout(budget)),
            };

            let error = match outcome {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_transient() => return Err(e),
                Err(e) => e,
            };

            let delay = self.backoff(attempts);
            if attempts > self.max_retries || started.elapsed() + delay >= self.overall_deadline {
                return Err(WeatherDataError::UpstreamUnavailable {
                    attempts,
                    elapsed: started.elapsed(),
                    last_error: Box::new(error),
                });
            }

            warn!(
                "Attempt {} of {} failed: {}. Retrying in {:?}",
                attempts,
                self.max_retries + 1,
                error,
                delay
            );
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn transient() -> WeatherDataError {
        WeatherDataError::ServerError {
            url: "http://archive.test/v1/archive".to_string(),
            status: reqwest::StatusCode::BAD_GATEWAY,
        }
    }

    fn instant_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy::builder()
            .max_retries(max_retries)
            .backoff_factor(Duration::ZERO)
            .build()
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(0), Duration::ZERO);
        assert_eq!(policy.backoff(1), Duration::from_millis(200));
        assert_eq!(policy.backoff(2), Duration::from_millis(400));
        assert_eq!(policy.backoff(5), Duration::from_millis(3200));
        assert_eq!(policy.backoff(7), Duration::from_secs(10));
        assert_eq!(policy.backoff(40), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = instant_policy(5)
            .run(|attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 3 {
                        Err(transient())
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = instant_policy(2)
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(transient()) }
            })
            .await;
        match result {
            Err(WeatherDataError::UpstreamUnavailable {
                attempts,
                last_error,
                ..
            }) => {
                assert_eq!(attempts, 3);
                assert!(matches!(*last_error, WeatherDataError::ServerError { .. }));
            }
            other => panic!("expected UpstreamUnavailable, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = instant_policy(5)
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(WeatherDataError::UpstreamRejected {
                        status: reqwest::StatusCode::BAD_REQUEST,
                        reason: "bad latitude".to_string(),
                    })
                }
            })
            .await;
        assert!(matches!(
            result,
            Err(WeatherDataError::UpstreamRejected { .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_attempts_hit_the_overall_deadline() {
        let policy = RetryPolicy::builder()
            .max_retries(100)
            .backoff_factor(Duration::from_secs(1))
            .attempt_timeout(Duration::from_secs(5))
            .overall_deadline(Duration::from_secs(20))
            .build();
        let started = Instant::now();
        let result: Result<(), _> = policy
            .run(|_| async {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            })
            .await;

        match result {
            Err(WeatherDataError::UpstreamUnavailable { last_error, .. }) => {
                assert!(matches!(*last_error, WeatherDataError::AttemptTimeout(_)));
            }
            other => panic!("expected UpstreamUnavailable, got {other:?}"),
        }
        assert!(started.elapsed() <= Duration::from_secs(20));
    }
}
