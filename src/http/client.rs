//! HTTP transport for the Expo GraphQL and REST APIs
//!
//! Handles:
//! - Bearer authentication on every request
//! - Optional request throttling
//! - GraphQL envelope decoding and error classification
//! - REST URL construction with percent-encoded path segments

use super::throttle::RequestThrottle;
use crate::auth::Credentials;
use crate::config::{
    ExpoConfig, RateLimitConfig, DEFAULT_GRAPHQL_ENDPOINT, DEFAULT_REST_ENDPOINT,
};
use crate::error::{Error, Result};
use crate::graphql::{GraphqlRequest, GraphqlResponse};
use crate::types::{JsonObject, JsonValue, Method};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// GraphQL endpoint URL
    pub graphql_endpoint: String,
    /// Base URL for REST calls
    pub rest_endpoint: String,
    /// Request timeout
    pub timeout: Duration,
    /// Request throttle settings
    pub rate_limit: Option<RateLimitConfig>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            graphql_endpoint: DEFAULT_GRAPHQL_ENDPOINT.to_string(),
            rest_endpoint: DEFAULT_REST_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
            rate_limit: None,
            user_agent: format!("expo-connector/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }

    /// Derive transport settings from the connector configuration
    pub fn from_expo_config(config: &ExpoConfig) -> Self {
        let mut builder = Self::builder()
            .graphql_endpoint(&config.graphql_endpoint)
            .rest_endpoint(&config.rest_endpoint)
            .timeout(config.timeout());
        if let Some(ref rate_limit) = config.rate_limit {
            builder = builder.rate_limit(rate_limit.clone());
        }
        builder.build()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the GraphQL endpoint
    pub fn graphql_endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.graphql_endpoint = url.into();
        self
    }

    /// Set the REST base URL
    pub fn rest_endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.rest_endpoint = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Throttle outgoing requests
    pub fn rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Send requests unthrottled
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Authenticated client for the Expo APIs
///
/// Performs exactly one round-trip per call. Rate-limit retries are layered
/// on top by `RetryingCaller`.
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    credentials: Credentials,
    throttle: Option<RequestThrottle>,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(config: HttpClientConfig, credentials: Credentials) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let throttle = config.rate_limit.as_ref().map(RequestThrottle::new);

        Ok(Self {
            client,
            config,
            credentials,
            throttle,
        })
    }

    /// Credentials attached to every request
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Transport configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Check if rate limiting is enabled
    pub fn is_throttled(&self) -> bool {
        self.throttle.is_some()
    }

    /// Execute a GraphQL document and return its `data` payload
    pub async fn graphql(&self, query: &str, variables: &JsonObject) -> Result<JsonValue> {
        self.throttle().await;

        let body = GraphqlRequest { query, variables };
        let req = self
            .client
            .post(&self.config.graphql_endpoint)
            .json(&body);
        let response = self.credentials.apply(req).send().await?;
        let status = response.status();

        debug!("GraphQL request completed with {}", status.as_u16());

        let text = response.text().await?;
        if !status.is_success() {
            // Expo reports most API failures inside a GraphQL envelope even on
            // non-2xx responses; fall back to the raw body when it is not one.
            let envelope_error = serde_json::from_str::<GraphqlResponse>(&text)
                .ok()
                .and_then(|envelope| envelope.into_status_error(status.as_u16()));
            return Err(envelope_error
                .unwrap_or_else(|| Error::http_status(status.as_u16(), text)));
        }

        let envelope: GraphqlResponse = serde_json::from_str(&text)?;
        envelope.into_data()
    }

    /// Call a REST endpoint relative to the REST base URL
    ///
    /// Each path segment is percent-encoded. An empty response body yields
    /// `null`.
    pub async fn rest(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&JsonValue>,
        query: &[(String, String)],
    ) -> Result<JsonValue> {
        self.throttle().await;

        let url = rest_url(&self.config.rest_endpoint, segments)?;
        debug!("REST {:?} {}", method, url);

        let mut req = self.client.request(method.into(), url);
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let response = self.credentials.apply(req).send().await?;
        decode_rest_response(response).await
    }

    async fn throttle(&self) {
        if let Some(ref throttle) = self.throttle {
            throttle.acquire().await;
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("credentials", &self.credentials)
            .field("throttle", &self.throttle)
            .finish_non_exhaustive()
    }
}

/// Join percent-encoded path segments onto a base URL
pub(crate) fn rest_url(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|()| Error::config(format!("REST endpoint cannot be a base URL: {base}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

async fn decode_rest_response(response: Response) -> Result<JsonValue> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(Error::http_status(status.as_u16(), text));
    }

    if text.trim().is_empty() {
        return Ok(JsonValue::Null);
    }

    Ok(serde_json::from_str(&text)?)
}
