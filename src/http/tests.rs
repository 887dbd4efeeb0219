//! Tests for the HTTP transport module

use super::client::rest_url;
use super::*;
use crate::auth::Credentials;
use crate::config::RateLimitConfig;
use crate::error::Error;
use crate::types::{JsonObject, Method};
use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpClient {
    let config = HttpClientConfig::builder()
        .graphql_endpoint(format!("{}/graphql", server.uri()))
        .rest_endpoint(format!("{}/v2", server.uri()))
        .no_rate_limit()
        .build();
    HttpClient::new(config, Credentials::new("test-token")).unwrap()
}

/// Records requested delays instead of sleeping
#[derive(Default)]
struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

fn caller_with(sleeper: &Arc<RecordingSleeper>) -> RetryingCaller {
    RetryingCaller::default().with_sleeper(sleeper.clone())
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.graphql_endpoint, "https://api.expo.dev/graphql");
    assert_eq!(config.rest_endpoint, "https://api.expo.dev/v2");
    assert!(config.rate_limit.is_none());
    assert!(config.user_agent.starts_with("expo-connector/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .graphql_endpoint("http://localhost/graphql")
        .rest_endpoint("http://localhost/v2")
        .timeout(Duration::from_secs(5))
        .rate_limit(RateLimitConfig::new(2, 4))
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.graphql_endpoint, "http://localhost/graphql");
    assert_eq!(config.rest_endpoint, "http://localhost/v2");
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(config.rate_limit, Some(RateLimitConfig::new(2, 4)));
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_http_client_config_from_expo_config() {
    let mut expo = crate::config::ExpoConfig::with_token("t")
        .endpoints("http://gql.test/graphql", "http://rest.test/v2");
    expo.timeout_secs = 7;
    expo.rate_limit = Some(RateLimitConfig::new(3, 6));

    let config = HttpClientConfig::from_expo_config(&expo);
    assert_eq!(config.graphql_endpoint, "http://gql.test/graphql");
    assert_eq!(config.rest_endpoint, "http://rest.test/v2");
    assert_eq!(config.timeout, Duration::from_secs(7));
    assert_eq!(config.rate_limit, Some(RateLimitConfig::new(3, 6)));
}

#[test]
fn test_rest_url_encodes_segments() {
    let url = rest_url("https://api.expo.dev/v2", &["projects", "@acme/app", "updates"]).unwrap();
    assert_eq!(
        url.as_str(),
        "https://api.expo.dev/v2/projects/@acme%2Fapp/updates"
    );

    let url = rest_url("https://api.expo.dev/v2/", &["webhooks", "w 1"]).unwrap();
    assert_eq!(url.as_str(), "https://api.expo.dev/v2/webhooks/w%201");
}

#[test]
fn test_rest_url_rejects_invalid_base() {
    assert!(matches!(
        rest_url("not a url", &["x"]),
        Err(Error::InvalidUrl(_))
    ));
}

// ============================================================================
// GraphQL transport
// ============================================================================

#[tokio::test]
async fn test_graphql_posts_query_and_variables() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(json!({
            "query": "query Viewer { viewer { id } }",
            "variables": {"appId": "@acme/app"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"viewer": {"id": "u1"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut variables = JsonObject::new();
    variables.insert("appId".into(), json!("@acme/app"));

    let data = client
        .graphql("query Viewer { viewer { id } }", &variables)
        .await
        .unwrap();
    assert_eq!(data["viewer"]["id"], "u1");
}

#[tokio::test]
async fn test_graphql_error_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{
                "message": "Experience with id 'x' does not exist.",
                "extensions": {"code": "EXPERIENCE_NOT_FOUND", "exception": {"statusCode": 404}}
            }]
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .graphql("query { x }", &JsonObject::new())
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(404));
    assert_eq!(
        err.to_string(),
        "Experience with id 'x' does not exist. (GraphQL Error: EXPERIENCE_NOT_FOUND)"
    );
}

#[tokio::test]
async fn test_graphql_non_success_with_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "errors": [{
                "message": "Too many requests",
                "extensions": {"code": "RATE_LIMITED", "exception": {"statusCode": 429}}
            }]
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .graphql("query { x }", &JsonObject::new())
        .await
        .unwrap_err();
    assert!(err.is_rate_limited());
}

#[tokio::test]
async fn test_graphql_429_envelope_without_status_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "errors": [{"message": "Too many requests"}]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"ok": 1}})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let sleeper = Arc::new(RecordingSleeper::default());
    let variables = JsonObject::new();

    let data = caller_with(&sleeper)
        .call(|| client.graphql("query { ok }", &variables))
        .await
        .unwrap();

    assert_eq!(data, json!({"ok": 1}));
    assert_eq!(sleeper.delays(), vec![Duration::from_millis(1000)]);
}

#[tokio::test]
async fn test_graphql_non_success_envelope_takes_response_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "errors": [{"message": "Service unavailable", "extensions": {"code": "UNAVAILABLE"}}]
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .graphql("query { x }", &JsonObject::new())
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(503));
    assert_eq!(
        err.to_string(),
        "Service unavailable (GraphQL Error: UNAVAILABLE)"
    );
}

#[tokio::test]
async fn test_graphql_non_success_plain_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad gateway"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .graphql("query { x }", &JsonObject::new())
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 502);
            assert_eq!(body, "Bad gateway");
        }
        other => panic!("Expected HttpStatus error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_graphql_null_data() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .graphql("query { x }", &JsonObject::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoData));
}

#[tokio::test]
async fn test_graphql_with_throttle() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"ok": true}})))
        .expect(3)
        .mount(&server)
        .await;

    let config = HttpClientConfig::builder()
        .graphql_endpoint(format!("{}/graphql", server.uri()))
        .rate_limit(RateLimitConfig::new(100, 10))
        .build();
    let client = HttpClient::new(config, Credentials::new("t")).unwrap();
    assert!(client.is_throttled());

    for _ in 0..3 {
        client.graphql("query { ok }", &JsonObject::new()).await.unwrap();
    }
}

// ============================================================================
// REST transport
// ============================================================================

#[tokio::test]
async fn test_rest_post_with_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/updates/group-1/republish"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(json!({"branchName": "main"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "u2"})))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .rest(
            Method::POST,
            &["updates", "group-1", "republish"],
            Some(&json!({"branchName": "main"})),
            &[],
        )
        .await
        .unwrap();
    assert_eq!(result, json!({"id": "u2"}));
}

#[tokio::test]
async fn test_rest_get_with_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/projects/p1/credentials/c1/keystore"))
        .and(query_param("format", "base64"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"keystore": "abc"})))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .rest(
            Method::GET,
            &["projects", "p1", "credentials", "c1", "keystore"],
            None,
            &[("format".to_string(), "base64".to_string())],
        )
        .await
        .unwrap();
    assert_eq!(result["keystore"], "abc");
}

#[tokio::test]
async fn test_rest_empty_body_is_null() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/webhooks/w1/deliveries/d1/redeliver"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .rest(
            Method::POST,
            &["webhooks", "w1", "deliveries", "d1", "redeliver"],
            None,
            &[],
        )
        .await
        .unwrap();
    assert!(result.is_null());
}

#[tokio::test]
async fn test_rest_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/projects/p1/updates"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .rest(Method::POST, &["projects", "p1", "updates"], None, &[])
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(403));
    assert!(!err.is_rate_limited());
}

// ============================================================================
// Retrying caller
// ============================================================================

#[tokio::test]
async fn test_retry_backoff_doubles() {
    let sleeper = Arc::new(RecordingSleeper::default());
    let attempts = &AtomicU32::new(0);

    let result = caller_with(&sleeper)
        .call(move || async move {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err(Error::http_status(429, "Too Many Requests"))
            } else {
                Ok("done")
            }
        })
        .await
        .unwrap();

    assert_eq!(result, "done");
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    assert_eq!(
        sleeper.delays(),
        vec![Duration::from_millis(1000), Duration::from_millis(2000)]
    );
}

#[tokio::test]
async fn test_retry_non_rate_limit_error_short_circuits() {
    let sleeper = Arc::new(RecordingSleeper::default());
    let attempts = &AtomicU32::new(0);

    let err = caller_with(&sleeper)
        .call(move || async move {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(Error::http_status(500, "Internal Server Error"))
        })
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(500));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
    assert!(sleeper.delays().is_empty());
}

#[tokio::test]
async fn test_retry_message_heuristic() {
    let sleeper = Arc::new(RecordingSleeper::default());
    let attempts = &AtomicU32::new(0);

    caller_with(&sleeper)
        .call(move || async move {
            if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(Error::graphql("You have hit the rate limit", "TOO_MANY", 400))
            } else {
                Ok(())
            }
        })
        .await
        .unwrap();

    assert_eq!(sleeper.delays(), vec![Duration::from_millis(1000)]);
}

#[tokio::test]
async fn test_retry_budget_exhausted_returns_last_error() {
    let sleeper = Arc::new(RecordingSleeper::default());
    let attempts = &AtomicU32::new(0);

    let err = caller_with(&sleeper)
        .call(move || async move {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(Error::http_status(429, "slow down"))
        })
        .await
        .unwrap_err();

    assert!(err.is_rate_limited());
    assert_eq!(attempts.load(Ordering::SeqCst), 5);
    assert_eq!(
        sleeper.delays(),
        vec![
            Duration::from_millis(1000),
            Duration::from_millis(2000),
            Duration::from_millis(4000),
            Duration::from_millis(8000),
        ]
    );
}

#[tokio::test]
async fn test_retry_zero_budget() {
    let caller = RetryingCaller::new(0, Duration::from_millis(1));
    let err = caller.call(move || async move { Ok::<_, Error>(1) }).await.unwrap_err();
    assert!(matches!(err, Error::MaxRetriesExceeded { max_retries: 0 }));
}

#[tokio::test]
async fn test_retry_from_config() {
    let config = crate::config::RetryConfig {
        max_retries: 2,
        initial_delay_ms: 250,
    };
    let sleeper = Arc::new(RecordingSleeper::default());
    let caller = RetryingCaller::from_config(&config).with_sleeper(sleeper.clone());
    assert_eq!(caller.max_retries(), 2);

    let err = caller
        .call(move || async move { Err::<(), _>(Error::http_status(429, "")) })
        .await
        .unwrap_err();
    assert!(err.is_rate_limited());
    assert_eq!(sleeper.delays(), vec![Duration::from_millis(250)]);
}

#[tokio::test]
async fn test_retry_against_server() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limit exceeded"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"ok": 1}})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let sleeper = Arc::new(RecordingSleeper::default());
    let variables = JsonObject::new();

    let data = caller_with(&sleeper)
        .call(|| client.graphql("query { ok }", &variables))
        .await
        .unwrap();

    assert_eq!(data["ok"], 1);
    assert_eq!(sleeper.delays(), vec![Duration::from_millis(1000)]);
}
