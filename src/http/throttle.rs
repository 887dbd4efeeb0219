//! Outgoing request throttle
//!
//! Expo answers bursts of API calls with HTTP 429. When `rate_limit` is set
//! in the connector config, every GraphQL and REST call first takes a
//! permit from a shared token bucket, so a long `returnAll` run spreads its
//! page requests out instead of leaning on `RetryingCaller`.

use crate::config::RateLimitConfig;
use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

type Bucket = RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// Token bucket shared by all requests of one client
#[derive(Clone)]
pub struct RequestThrottle {
    bucket: Arc<Bucket>,
    settings: RateLimitConfig,
}

impl RequestThrottle {
    /// Build a throttle from the configured request rate and burst
    ///
    /// A zero rate or burst is raised to one.
    pub fn new(settings: &RateLimitConfig) -> Self {
        let per_second = NonZeroU32::new(settings.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(settings.burst_size).unwrap_or(NonZeroU32::MIN);

        Self {
            bucket: Arc::new(RateLimiter::direct(
                Quota::per_second(per_second).allow_burst(burst),
            )),
            settings: settings.clone(),
        }
    }

    /// Settings the throttle was built from
    pub fn settings(&self) -> &RateLimitConfig {
        &self.settings
    }

    /// Wait for a request permit
    pub async fn acquire(&self) {
        self.bucket.until_ready().await;
    }

    /// Take a permit if one is free right now
    pub fn try_acquire(&self) -> bool {
        self.bucket.check().is_ok()
    }
}

impl std::fmt::Debug for RequestThrottle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestThrottle")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod throttle_tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_burst_is_spent_before_blocking() {
        let throttle = RequestThrottle::new(&RateLimitConfig::new(1, 3));

        assert!(throttle.try_acquire());
        assert!(throttle.try_acquire());
        assert!(throttle.try_acquire());
        assert!(!throttle.try_acquire());
    }

    #[test]
    fn test_zero_settings_allow_one_request() {
        let throttle = RequestThrottle::new(&RateLimitConfig::new(0, 0));

        assert!(throttle.try_acquire());
        assert!(!throttle.try_acquire());
        assert_eq!(throttle.settings(), &RateLimitConfig::new(0, 0));
    }

    #[tokio::test]
    async fn test_acquire_within_burst_does_not_wait() {
        let throttle = RequestThrottle::new(&RateLimitConfig::default());

        let acquired = tokio::time::timeout(Duration::from_millis(50), async {
            for _ in 0..RateLimitConfig::default().burst_size {
                throttle.acquire().await;
            }
        })
        .await;
        assert!(acquired.is_ok());
    }
}
