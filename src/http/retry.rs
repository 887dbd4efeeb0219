//! Rate-limit retry with exponential backoff
//!
//! `RetryingCaller` wraps a single request-producing operation. Only
//! rate-limit failures are retried; everything else propagates on the
//! first attempt. Waits go through a `Sleeper` so tests can observe the
//! backoff schedule without real time passing.

use crate::config::RetryConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Timer used between retry attempts
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspend for the given duration
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Exponential backoff decorator for rate-limited calls
#[derive(Clone)]
pub struct RetryingCaller {
    /// Total attempts allowed
    max_retries: u32,
    /// Delay before the first retry
    initial_delay: Duration,
    sleeper: Arc<dyn Sleeper>,
}

impl RetryingCaller {
    /// Default attempt budget
    pub const DEFAULT_MAX_RETRIES: u32 = 5;

    /// Default first delay
    pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(1000);

    /// Create a caller with the given budget and first delay
    pub fn new(max_retries: u32, initial_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Create a caller from configuration
    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_retries,
            Duration::from_millis(config.initial_delay_ms),
        )
    }

    /// Replace the timer
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Attempt budget
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Run `operation`, retrying while it fails with a rate-limit error
    ///
    /// The delay starts at `initial_delay` and doubles after every wait.
    /// The last allowed attempt returns its error unchanged.
    pub async fn call<T, F, Fut>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut retries = 0;
        let mut delay = self.initial_delay;

        while retries < self.max_retries {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    if !e.is_rate_limited() || retries + 1 >= self.max_retries {
                        return Err(e);
                    }

                    retries += 1;
                    warn!(
                        "Rate limited, attempt {}/{}, retrying in {:?}",
                        retries, self.max_retries, delay
                    );
                    self.sleeper.sleep(delay).await;
                    delay = delay.saturating_mul(2);
                }
            }
        }

        Err(Error::MaxRetriesExceeded {
            max_retries: self.max_retries,
        })
    }
}

impl Default for RetryingCaller {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_RETRIES, Self::DEFAULT_INITIAL_DELAY)
    }
}

impl std::fmt::Debug for RetryingCaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryingCaller")
            .field("max_retries", &self.max_retries)
            .field("initial_delay", &self.initial_delay)
            .finish_non_exhaustive()
    }
}
