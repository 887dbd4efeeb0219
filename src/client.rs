//! Expo API client
//!
//! Combines the HTTP transport, rate-limit retries and cursor pagination
//! behind the calls resource operations make.

use crate::auth::Credentials;
use crate::config::ExpoConfig;
use crate::error::{Error, Result};
use crate::graphql::queries;
use crate::http::{HttpClient, HttpClientConfig, RetryingCaller, Sleeper};
use crate::pagination::{ConnectionPath, PagedFetcher};
use crate::types::{JsonObject, JsonValue, Method};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Client for the Expo GraphQL and REST APIs
#[derive(Debug)]
pub struct ExpoClient {
    http: HttpClient,
    retry: RetryingCaller,
    fetcher: PagedFetcher,
}

impl ExpoClient {
    /// Create a client from validated configuration
    pub fn new(config: &ExpoConfig) -> Result<Self> {
        config.validate()?;

        let http = HttpClient::new(
            HttpClientConfig::from_expo_config(config),
            Credentials::from_config(config),
        )?;

        Ok(Self::from_parts(
            http,
            RetryingCaller::from_config(&config.retry),
            PagedFetcher::new(config.page_size),
        ))
    }

    /// Assemble a client from its parts
    pub fn from_parts(http: HttpClient, retry: RetryingCaller, fetcher: PagedFetcher) -> Self {
        Self {
            http,
            retry,
            fetcher,
        }
    }

    /// Replace the timer used between rate-limit retries
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.retry = self.retry.with_sleeper(sleeper);
        self
    }

    /// Credentials used for every request
    pub fn credentials(&self) -> &Credentials {
        self.http.credentials()
    }

    /// Items requested per page
    pub fn page_size(&self) -> u32 {
        self.fetcher.page_size()
    }

    /// Run a GraphQL document, retrying on rate limits
    ///
    /// `variables` must be a JSON object; anything else is sent as `{}`.
    pub async fn graphql(&self, document: &str, variables: JsonValue) -> Result<JsonValue> {
        let variables = into_object(variables);
        self.graphql_with(document, &variables).await
    }

    async fn graphql_with(&self, document: &str, variables: &JsonObject) -> Result<JsonValue> {
        self.retry
            .call(|| self.http.graphql(document, variables))
            .await
    }

    /// Call a REST endpoint, retrying on rate limits
    pub async fn rest(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&JsonValue>,
    ) -> Result<JsonValue> {
        self.retry
            .call(|| self.http.rest(method, segments, body, &[]))
            .await
    }

    /// Collect the nodes of a paginated connection
    ///
    /// Every request carries `first` (the page size) and, after the first
    /// page, `after`. `limit` caps the number of returned nodes.
    pub async fn fetch_connection(
        &self,
        document: &str,
        variables: JsonValue,
        path: ConnectionPath,
        limit: Option<usize>,
    ) -> Result<Vec<JsonValue>> {
        let base = into_object(variables);

        let items = self
            .fetcher
            .fetch_all(limit, |cursor, first| {
                let mut page_vars = base.clone();
                page_vars.insert("first".to_string(), json!(first));
                if let Some(cursor) = cursor {
                    page_vars.insert("after".to_string(), json!(cursor));
                }

                async move {
                    let data = self.graphql_with(document, &page_vars).await?;
                    path.resolve(&data)
                }
            })
            .await?;

        debug!("Collected {} nodes from {:?}", items.len(), path);
        Ok(items)
    }

    /// Turn a project identifier into a project id
    ///
    /// `@account/slug` names are looked up; anything else is taken to be an
    /// id already.
    pub async fn resolve_project_id(&self, identifier: &str) -> Result<String> {
        if !identifier.starts_with('@') {
            return Ok(identifier.to_string());
        }

        let data = self
            .graphql(queries::GET_PROJECT_ID, json!({ "fullName": identifier }))
            .await?;

        data.pointer("/app/byFullName/id")
            .and_then(JsonValue::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::not_found("Project", identifier))
    }

    /// Look up an account id by account name
    pub async fn account_id(&self, account_name: &str) -> Result<Option<String>> {
        let data = self
            .graphql(
                queries::GET_ACCOUNT_ID,
                json!({ "accountName": account_name }),
            )
            .await?;

        Ok(data
            .pointer("/account/byName/id")
            .and_then(JsonValue::as_str)
            .map(str::to_string))
    }

    /// The authenticated user
    pub async fn viewer(&self) -> Result<JsonValue> {
        let data = self.graphql(queries::VIEWER, json!({})).await?;
        match data.get("viewer") {
            Some(viewer) if !viewer.is_null() => Ok(viewer.clone()),
            _ => Err(Error::NoData),
        }
    }
}

fn into_object(value: JsonValue) -> JsonObject {
    match value {
        JsonValue::Object(map) => map,
        _ => JsonObject::new(),
    }
}
