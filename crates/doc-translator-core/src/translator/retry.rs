use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::error::{Error, Result};

/// Wait applied on HTTP 429 when the server sends no Retry-After
const DEFAULT_RATE_LIMIT_WAIT_SECS: u64 = 5;
/// Upper bound for a single backoff sleep
const MAX_BACKOFF_MS: u64 = 30_000;

/// Bounded retry with exponential backoff for translation requests.
///
/// Only errors reported as retryable by [`Error::is_retryable`] are
/// repeated; anything else is returned on the first occurrence.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub attempts: u32,
    /// Delay before the second attempt; doubled for each further attempt
    pub base_delay_ms: u64,
}

impl RetryPolicy {
    pub const fn new(attempts: u32, base_delay_ms: u64) -> Self {
        Self {
            attempts,
            base_delay_ms,
        }
    }

    /// Policy making one request plus up to `retries` repeats
    pub const fn with_retries(retries: u32, base_delay_ms: u64) -> Self {
        Self::new(retries.saturating_add(1), base_delay_ms)
    }

    /// Delay before attempt `attempt + 1` after a failure on `attempt` (0-based)
    pub fn backoff(&self, attempt: u32, error: &Error) -> Duration {
        if let Error::TranslationRateLimited { retry_after } = error {
            return Duration::from_secs(retry_after.unwrap_or(DEFAULT_RATE_LIMIT_WAIT_SECS));
        }
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor).min(MAX_BACKOFF_MS))
    }

    /// Run `op` until it succeeds, fails with a permanent error, or the
    /// attempt budget is used up.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut last_error = None;

        for attempt in 0..self.attempts {
            debug!("{} attempt {}/{}", label, attempt + 1, self.attempts);

            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => {
                    warn!("{} failed: {}", label, e);
                    if attempt + 1 < self.attempts {
                        tokio::time::sleep(self.backoff(attempt, &e)).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        error!("{} failed after {} attempts", label, self.attempts);
        Err(last_error.unwrap_or(Error::TranslationMaxRetriesExceeded))
    }
}
