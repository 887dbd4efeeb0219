//! Build operations
//!
//! EAS builds: create, inspect, list, cancel, retry and delete, plus the
//! artifact and log locations of a finished build.

use super::{at, compact, deleted, parse_params, require, unsupported, with_fields, ListOptions};
use crate::client::ExpoClient;
use crate::engine::{Operation, Resource};
use crate::error::{Error, Result};
use crate::graphql::{mutations, queries};
use crate::normalize::{normalize_build_status, normalize_platform};
use crate::pagination::ConnectionPath;
use crate::types::{JsonObject, JsonValue};
use serde::Deserialize;
use serde_json::json;

/// Parameters of `create`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParams {
    pub project_id: String,
    pub platform: String,
    #[serde(default)]
    pub additional_fields: CreateFields,
}

/// Optional fields of `create`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFields {
    pub build_profile: Option<String>,
    pub channel: Option<String>,
    pub git_commit_hash: Option<String>,
}

/// Parameters naming a single build
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRef {
    pub build_id: String,
}

/// Parameters of `getMany`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub project_id: String,
    #[serde(flatten)]
    pub list: ListOptions,
    #[serde(default)]
    pub filters: ListFilters,
}

/// Filters of `getMany`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListFilters {
    pub platform: Option<String>,
    pub status: Option<String>,
}

pub(crate) async fn execute(
    client: &ExpoClient,
    operation: Operation,
    params: &JsonObject,
) -> Result<Vec<JsonValue>> {
    let output = match operation {
        Operation::Create => create(client, &parse_params(params)?).await?,
        Operation::Get => get(client, &parse_params(params)?).await?,
        Operation::GetMany => return get_many(client, &parse_params(params)?).await,
        Operation::Cancel => cancel(client, &parse_params(params)?).await?,
        Operation::Retry => retry(client, &parse_params(params)?).await?,
        Operation::Delete => delete(client, &parse_params(params)?).await?,
        Operation::GetArtifacts => get_artifacts(client, &parse_params(params)?).await?,
        Operation::GetLogs => get_logs(client, &parse_params(params)?).await?,
        other => return Err(unsupported(Resource::Build, other)),
    };
    Ok(vec![output])
}

/// Start a build of a project for a platform
pub async fn create(client: &ExpoClient, params: &CreateParams) -> Result<JsonValue> {
    let fields = &params.additional_fields;
    let variables = compact(json!({
        "appId": params.project_id,
        "platform": normalize_platform(&params.platform),
        "buildProfile": fields.build_profile,
        "channel": fields.channel,
        "gitCommitHash": fields.git_commit_hash,
    }));

    let data = client.graphql(mutations::CREATE_BUILD, variables).await?;
    require(&data, "/build/createBuildForApp", || {
        Error::failed("Failed to create build")
    })
}

/// Fetch a build by id
pub async fn get(client: &ExpoClient, params: &BuildRef) -> Result<JsonValue> {
    fetch_build(client, queries::GET_BUILD, &params.build_id).await
}

/// List the builds of a project
pub async fn get_many(client: &ExpoClient, params: &ListParams) -> Result<Vec<JsonValue>> {
    let mut variables = JsonObject::new();
    variables.insert("appId".to_string(), json!(params.project_id));

    if let Some(platform) = super::non_empty(params.filters.platform.as_ref()) {
        variables.insert("platform".to_string(), json!(normalize_platform(platform)));
    }
    if let Some(status) = super::non_empty(params.filters.status.as_ref()) {
        variables.insert("status".to_string(), json!(normalize_build_status(status)));
    }

    client
        .fetch_connection(
            queries::GET_BUILDS,
            JsonValue::Object(variables),
            ConnectionPath::Builds,
            params.list.cap()?,
        )
        .await
}

/// Cancel a queued or running build
pub async fn cancel(client: &ExpoClient, params: &BuildRef) -> Result<JsonValue> {
    let data = client
        .graphql(mutations::CANCEL_BUILD, json!({ "buildId": params.build_id }))
        .await?;
    require(&data, "/build/cancel", || {
        Error::failed(format!("Failed to cancel build: {}", params.build_id))
    })
}

/// Retry a failed build
pub async fn retry(client: &ExpoClient, params: &BuildRef) -> Result<JsonValue> {
    let data = client
        .graphql(mutations::RETRY_BUILD, json!({ "buildId": params.build_id }))
        .await?;
    require(&data, "/build/retry", || {
        Error::failed(format!("Failed to retry build: {}", params.build_id))
    })
}

/// Delete a build
pub async fn delete(client: &ExpoClient, params: &BuildRef) -> Result<JsonValue> {
    let data = client
        .graphql(mutations::DELETE_BUILD, json!({ "buildId": params.build_id }))
        .await?;
    Ok(deleted(&data, "/build/deleteBuild", "buildId", &params.build_id))
}

/// Artifact URLs of a build, flattened next to its id
pub async fn get_artifacts(client: &ExpoClient, params: &BuildRef) -> Result<JsonValue> {
    let build = fetch_build(client, queries::GET_BUILD, &params.build_id).await?;
    let artifacts = at(&build, "/artifacts").cloned().unwrap_or(JsonValue::Null);

    Ok(with_fields(
        json!({ "buildId": params.build_id }),
        artifacts,
    ))
}

/// Log location of a build
pub async fn get_logs(client: &ExpoClient, params: &BuildRef) -> Result<JsonValue> {
    let build = fetch_build(client, queries::GET_BUILD_LOGS, &params.build_id).await?;

    Ok(json!({
        "buildId": params.build_id,
        "logsS3KeyPrefix": build.pointer("/artifacts/logsS3KeyPrefix"),
    }))
}

async fn fetch_build(client: &ExpoClient, document: &str, build_id: &str) -> Result<JsonValue> {
    let data = client
        .graphql(document, json!({ "buildId": build_id }))
        .await?;
    require(&data, "/builds/byId", || Error::not_found("Build", build_id))
}
