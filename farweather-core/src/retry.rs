//! Bounded retry with exponential backoff.
//!
//! A linear retry chain: on failure, wait, double the delay, try again.
//! No jitter and no circuit breaker; the final error propagates unchanged.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

/// Default number of additional attempts after the first failure.
pub const DEFAULT_RETRIES: u32 = 3;
/// Default delay before the first retry.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);

/// Retry `operation` up to `retries` additional times, doubling the delay
/// between attempts (1s, 2s, 4s, ... with the defaults).
pub async fn with_retry<T, E, F, Fut>(operation: F, retries: u32, initial_delay: Duration) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    with_retry_capped(operation, retries, initial_delay, Duration::MAX).await
}

/// Like [`with_retry`], but the doubled delay never exceeds `max_delay`.
pub async fn with_retry_capped<T, E, F, Fut>(
    mut operation: F,
    retries: u32,
    initial_delay: Duration,
    max_delay: Duration,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut delay = initial_delay.min(max_delay);
    let mut remaining = retries;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if remaining == 0 => return Err(err),
            Err(_) => {
                debug!(remaining, delay_ms = delay.as_millis() as u64, "retrying after failure");
                tokio::time::sleep(delay).await;
                delay = delay.saturating_mul(2).min(max_delay);
                remaining -= 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_two_failures_with_three_calls() {
        let calls = AtomicU32::new(0);

        let result: Result<u32, &str> = with_retry(
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move { if n < 3 { Err("boom") } else { Ok(n) } }
            },
            3,
            Duration::from_secs(1),
        )
        .await;

        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_after_retries_and_propagates_last_error() {
        let calls = AtomicU32::new(0);

        let result: Result<(), String> = with_retry(
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move { Err(format!("failure {n}")) }
            },
            3,
            Duration::from_secs(1),
        )
        .await;

        // One initial call plus three retries.
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(result, Err("failure 4".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn delays_double_between_attempts() {
        let start = Instant::now();

        let _: Result<(), &str> =
            with_retry(|| async { Err("boom") }, 3, Duration::from_secs(1)).await;

        // 1s + 2s + 4s of backoff in total.
        assert_eq!(Instant::now().duration_since(start), Duration::from_secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn capped_delay_stops_doubling() {
        let start = Instant::now();

        let _: Result<(), &str> = with_retry_capped(
            || async { Err("boom") },
            4,
            Duration::from_secs(10),
            Duration::from_secs(30),
        )
        .await;

        // 10s + 20s + 30s + 30s; the cap holds the last two at 30s.
        assert_eq!(Instant::now().duration_since(start), Duration::from_secs(90));
    }

    #[tokio::test(start_paused = true)]
    async fn success_on_first_attempt_never_sleeps() {
        let start = Instant::now();

        let result: Result<u32, &str> =
            with_retry(|| async { Ok(7) }, 3, Duration::from_secs(1)).await;

        assert_eq!(result, Ok(7));
        assert_eq!(Instant::now().duration_since(start), Duration::ZERO);
    }
}
