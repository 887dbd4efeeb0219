//! Configuration for the Expo connector
//!
//! Configuration is read from a YAML (or JSON) file and can be overridden
//! from the environment. It carries the Expo credentials plus the endpoint,
//! paging, retry and rate-limit settings the client is built from.

use crate::error::{Error, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the Expo access token
pub const ENV_ACCESS_TOKEN: &str = "EXPO_ACCESS_TOKEN";

/// Environment variable holding the default account name
pub const ENV_ACCOUNT_NAME: &str = "EXPO_ACCOUNT_NAME";

/// Default Expo GraphQL endpoint
pub const DEFAULT_GRAPHQL_ENDPOINT: &str = "https://api.expo.dev/graphql";

/// Default Expo REST endpoint
pub const DEFAULT_REST_ENDPOINT: &str = "https://api.expo.dev/v2";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete connector configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ExpoConfig {
    /// Expo access token
    #[serde(default)]
    pub access_token: String,

    /// Default account or organization name
    #[serde(default)]
    pub account_name: Option<String>,

    /// GraphQL endpoint URL
    #[serde(default = "default_graphql_endpoint")]
    pub graphql_endpoint: String,

    /// REST endpoint base URL
    #[serde(default = "default_rest_endpoint")]
    pub rest_endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Items requested per page on connection queries
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Rate-limit retry configuration
    #[serde(default)]
    pub retry: RetryConfig,

    /// Optional client-side request throttling
    #[serde(default)]
    pub rate_limit: Option<RateLimitConfig>,
}

impl Default for ExpoConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            account_name: None,
            graphql_endpoint: default_graphql_endpoint(),
            rest_endpoint: default_rest_endpoint(),
            timeout_secs: default_timeout(),
            page_size: default_page_size(),
            retry: RetryConfig::default(),
            rate_limit: None,
        }
    }
}

impl std::fmt::Debug for ExpoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpoConfig")
            .field("access_token", &"***")
            .field("account_name", &self.account_name)
            .field("graphql_endpoint", &self.graphql_endpoint)
            .field("rest_endpoint", &self.rest_endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .field("page_size", &self.page_size)
            .field("retry", &self.retry)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}

fn default_graphql_endpoint() -> String {
    DEFAULT_GRAPHQL_ENDPOINT.to_string()
}

fn default_rest_endpoint() -> String {
    DEFAULT_REST_ENDPOINT.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_page_size() -> u32 {
    50
}

impl ExpoConfig {
    /// Create a config with just an access token
    pub fn with_token(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            ..Self::default()
        }
    }

    /// Set the default account name
    #[must_use]
    pub fn account_name(mut self, name: impl Into<String>) -> Self {
        self.account_name = Some(name.into());
        self
    }

    /// Point both endpoints at a different host (used against mock servers)
    #[must_use]
    pub fn endpoints(mut self, graphql: impl Into<String>, rest: impl Into<String>) -> Self {
        self.graphql_endpoint = graphql.into();
        self.rest_endpoint = rest.into();
        self
    }

    /// Parse config from a YAML or JSON string
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Load config from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config '{}'", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config '{}'", path.display()))
    }

    /// Build config from the process environment only
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Override credentials from an environment lookup
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(ENV_ACCESS_TOKEN).filter(|t| !t.is_empty()) {
            self.access_token = token;
        }
        if let Some(account) = lookup(ENV_ACCOUNT_NAME).filter(|a| !a.is_empty()) {
            self.account_name = Some(account);
        }
    }

    /// Check the config is usable
    pub fn validate(&self) -> Result<()> {
        if self.access_token.trim().is_empty() {
            return Err(Error::missing_field("access_token"));
        }
        if self.page_size == 0 {
            return Err(Error::config("page_size must be greater than zero"));
        }
        Ok(())
    }

    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ============================================================================
// Retry Config
// ============================================================================

/// Rate-limit retry settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts allowed for a rate-limited request
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// First backoff delay in milliseconds (doubles each retry)
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
        }
    }
}

fn default_max_retries() -> u32 {
    5
}

fn default_initial_delay_ms() -> u64 {
    1000
}

// ============================================================================
// Rate Limit Config
// ============================================================================

/// Client-side throttling settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests per second limit
    #[serde(default = "default_rps")]
    pub requests_per_second: u32,

    /// Burst size
    #[serde(default = "default_burst")]
    pub burst_size: u32,
}

fn default_rps() -> u32 {
    10
}

fn default_burst() -> u32 {
    10
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::new(default_rps(), default_burst())
    }
}

impl RateLimitConfig {
    /// Create throttle settings
    pub fn new(requests_per_second: u32, burst_size: u32) -> Self {
        Self {
            requests_per_second,
            burst_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ExpoConfig::default();
        assert_eq!(config.graphql_endpoint, "https://api.expo.dev/graphql");
        assert_eq!(config.rest_endpoint, "https://api.expo.dev/v2");
        assert_eq!(config.page_size, 50);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.initial_delay_ms, 1000);
        assert!(config.rate_limit.is_none());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
access_token: "tok_123"
account_name: "acme"
page_size: 25
retry:
  max_retries: 3
rate_limit:
  requests_per_second: 5
"#;

        let config = ExpoConfig::parse(yaml).unwrap();
        assert_eq!(config.access_token, "tok_123");
        assert_eq!(config.account_name.as_deref(), Some("acme"));
        assert_eq!(config.page_size, 25);
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.retry.initial_delay_ms, 1000);

        let rate_limit = config.rate_limit.unwrap();
        assert_eq!(rate_limit.requests_per_second, 5);
        assert_eq!(rate_limit.burst_size, 10);
    }

    #[test]
    fn test_parse_json() {
        let config = ExpoConfig::parse(r#"{"access_token": "abc"}"#).unwrap();
        assert_eq!(config.access_token, "abc");
        assert_eq!(config.page_size, 50);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "access_token: file-token").unwrap();

        let config = ExpoConfig::from_file(file.path()).unwrap();
        assert_eq!(config.access_token, "file-token");
    }

    #[test]
    fn test_from_missing_file() {
        let err = ExpoConfig::from_file("/nonexistent/expo.yaml").unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Failed to read config '/nonexistent/expo.yaml': IO error:"));
    }

    #[test]
    fn test_from_invalid_file_names_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "page_size: [not, a, number]").unwrap();

        let err = ExpoConfig::from_file(file.path()).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Invalid config '"));
        assert!(message.contains("Failed to parse YAML"));
    }

    #[test]
    fn test_apply_env() {
        let env: HashMap<&str, &str> = [(ENV_ACCESS_TOKEN, "env-token"), (ENV_ACCOUNT_NAME, "")]
            .into_iter()
            .collect();

        let mut config = ExpoConfig::with_token("file-token").account_name("file-account");
        config.apply_env(|key| env.get(key).map(|v| (*v).to_string()));

        assert_eq!(config.access_token, "env-token");
        // Empty variables do not clobber configured values
        assert_eq!(config.account_name.as_deref(), Some("file-account"));
    }

    #[test]
    fn test_validate() {
        assert!(ExpoConfig::with_token("tok").validate().is_ok());

        let err = ExpoConfig::default().validate().unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { .. }));

        let mut config = ExpoConfig::with_token("tok");
        config.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_masks_token() {
        let config = ExpoConfig::with_token("super-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("***"));
    }
}
