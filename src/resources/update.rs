//! Update operations
//!
//! Over-the-air updates. Publishing, rollback and republishing go through
//! the REST API; everything else is GraphQL.

use super::{compact, deleted, parse_params, require, rest_record, unsupported, ListOptions};
use crate::client::ExpoClient;
use crate::engine::{Operation, Resource};
use crate::error::{Error, Result};
use crate::graphql::{mutations, queries};
use crate::pagination::ConnectionPath;
use crate::types::{JsonObject, JsonValue, Method};
use serde::Deserialize;
use serde_json::json;

/// Parameters of `publish`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishParams {
    pub project_id: String,
    pub branch_name: String,
    #[serde(default)]
    pub additional_fields: PublishFields,
}

/// Optional fields of `publish`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishFields {
    pub message: Option<String>,
    pub runtime_version: Option<String>,
    pub platform: Option<String>,
    pub git_commit_hash: Option<String>,
}

/// Parameters naming a single update
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRef {
    pub update_id: String,
}

/// Parameters naming a branch of a project
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchRef {
    pub project_id: String,
    pub branch_name: String,
}

/// Parameters listing the updates of a branch
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub project_id: String,
    pub branch_name: String,
    #[serde(flatten)]
    pub list: ListOptions,
}

/// Parameters of `republish`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepublishParams {
    pub update_group_id: String,
    pub branch_name: String,
}

pub(crate) async fn execute(
    client: &ExpoClient,
    operation: Operation,
    params: &JsonObject,
) -> Result<Vec<JsonValue>> {
    let output = match operation {
        Operation::Publish => publish(client, &parse_params(params)?).await?,
        Operation::Get => get(client, &parse_params(params)?).await?,
        Operation::GetMany => return get_many(client, &parse_params(params)?).await,
        Operation::Rollback => rollback(client, &parse_params(params)?).await?,
        Operation::Delete => delete(client, &parse_params(params)?).await?,
        Operation::Republish => republish(client, &parse_params(params)?).await?,
        Operation::GetManifest => get_manifest(client, &parse_params(params)?).await?,
        other => return Err(unsupported(Resource::Update, other)),
    };
    Ok(vec![output])
}

/// Publish an update to a branch
pub async fn publish(client: &ExpoClient, params: &PublishParams) -> Result<JsonValue> {
    let fields = &params.additional_fields;
    let body = compact(json!({
        "projectId": params.project_id,
        "branchName": params.branch_name,
        "message": fields.message,
        "runtimeVersion": fields.runtime_version,
        "platform": fields.platform,
        "gitCommitHash": fields.git_commit_hash,
    }));

    let response = client
        .rest(
            Method::POST,
            &["projects", &params.project_id, "updates"],
            Some(&body),
        )
        .await?;
    Ok(rest_record(response))
}

/// Fetch an update by id
pub async fn get(client: &ExpoClient, params: &UpdateRef) -> Result<JsonValue> {
    fetch_update(client, &params.update_id).await
}

/// List the updates published to a branch
pub async fn get_many(client: &ExpoClient, params: &ListParams) -> Result<Vec<JsonValue>> {
    branch_updates(
        client,
        &params.project_id,
        &params.branch_name,
        params.list.cap()?,
    )
    .await
}

/// Updates of a branch, newest first as returned by the API
pub(crate) async fn branch_updates(
    client: &ExpoClient,
    project_id: &str,
    branch_name: &str,
    cap: Option<usize>,
) -> Result<Vec<JsonValue>> {
    client
        .fetch_connection(
            queries::GET_UPDATES_BY_BRANCH,
            json!({ "appId": project_id, "branchName": branch_name }),
            ConnectionPath::BranchUpdates,
            cap,
        )
        .await
}

/// Roll a branch back to its previous update
pub async fn rollback(client: &ExpoClient, params: &BranchRef) -> Result<JsonValue> {
    let response = client
        .rest(
            Method::POST,
            &[
                "projects",
                &params.project_id,
                "branches",
                &params.branch_name,
                "rollback",
            ],
            None,
        )
        .await?;
    Ok(rest_record(response))
}

/// Delete an update
pub async fn delete(client: &ExpoClient, params: &UpdateRef) -> Result<JsonValue> {
    let data = client
        .graphql(
            mutations::DELETE_UPDATE,
            json!({ "updateId": params.update_id }),
        )
        .await?;
    Ok(deleted(
        &data,
        "/update/deleteUpdate",
        "updateId",
        &params.update_id,
    ))
}

/// Republish an update group onto a branch
pub async fn republish(client: &ExpoClient, params: &RepublishParams) -> Result<JsonValue> {
    let body = json!({ "branchName": params.branch_name });

    let response = client
        .rest(
            Method::POST,
            &["updates", &params.update_group_id, "republish"],
            Some(&body),
        )
        .await?;
    Ok(rest_record(response))
}

/// Manifest details of an update
pub async fn get_manifest(client: &ExpoClient, params: &UpdateRef) -> Result<JsonValue> {
    let update = fetch_update(client, &params.update_id).await?;

    Ok(json!({
        "updateId": params.update_id,
        "manifestPermalink": update.get("manifestPermalink"),
        "runtimeVersion": update.get("runtimeVersion"),
        "platform": update.get("platform"),
    }))
}

async fn fetch_update(client: &ExpoClient, update_id: &str) -> Result<JsonValue> {
    let data = client
        .graphql(queries::GET_UPDATE, json!({ "updateId": update_id }))
        .await?;
    require(&data, "/update/byId", || Error::not_found("Update", update_id))
}
