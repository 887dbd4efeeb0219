//! HTTP transport module
//!
//! Provides the authenticated Expo client, client-side throttling and the
//! rate-limit retry decorator.
//!
//! # Features
//!
//! - **GraphQL and REST**: One client for both Expo API surfaces
//! - **Throttling**: Optional token bucket on outgoing requests (governor)
//! - **Backoff**: Exponential retry on rate-limit responses

mod client;
mod retry;
mod throttle;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use retry::{RetryingCaller, Sleeper, TokioSleeper};
pub use throttle::RequestThrottle;

#[cfg(test)]
mod tests;
