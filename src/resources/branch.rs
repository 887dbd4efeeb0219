//! Branch operations
//!
//! Update branches of a project.

use super::{deleted, parse_params, require, unsupported, update, ListOptions};
use crate::client::ExpoClient;
use crate::engine::{Operation, Resource};
use crate::error::{Error, Result};
use crate::graphql::{mutations, queries};
use crate::pagination::ConnectionPath;
use crate::types::{JsonObject, JsonValue};
use serde::Deserialize;
use serde_json::json;

/// Note attached to queued publish requests
pub const PUBLISH_NOTE: &str =
    "OTA update publishing typically requires EAS CLI. This operation queues the request.";

/// Parameters naming a branch by project and name
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchName {
    pub project_id: String,
    pub branch_name: String,
}

/// Parameters of `getMany`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub project_id: String,
    #[serde(flatten)]
    pub list: ListOptions,
}

/// Parameters of `getUpdates`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatesParams {
    pub project_id: String,
    pub branch_name: String,
    #[serde(flatten)]
    pub list: ListOptions,
}

/// Parameters of `update`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameParams {
    pub branch_id: String,
    pub new_name: String,
}

/// Parameters naming a branch by id
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchRef {
    pub branch_id: String,
}

/// Parameters of `publish`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishParams {
    pub project_id: String,
    pub branch_name: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub runtime_version: String,
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
        Operation::Update => rename(client, &parse_params(params)?).await?,
        Operation::Delete => delete(client, &parse_params(params)?).await?,
        Operation::GetUpdates => return get_updates(client, &parse_params(params)?).await,
        Operation::Publish => publish(&parse_params(params)?),
        other => return Err(unsupported(Resource::Branch, other)),
    };
    Ok(vec![output])
}

/// Create a branch on a project
pub async fn create(client: &ExpoClient, params: &BranchName) -> Result<JsonValue> {
    let app_id = client.resolve_project_id(&params.project_id).await?;

    let data = client
        .graphql(
            mutations::CREATE_BRANCH,
            json!({ "appId": app_id, "name": params.branch_name }),
        )
        .await?;
    require(&data, "/updateBranch/createUpdateBranchForApp", || {
        Error::failed("Failed to create branch")
    })
}

/// Fetch a branch by name
pub async fn get(client: &ExpoClient, params: &BranchName) -> Result<JsonValue> {
    let data = client
        .graphql(
            queries::GET_BRANCH,
            json!({ "appId": params.project_id, "branchName": params.branch_name }),
        )
        .await?;
    require(&data, "/app/byFullName/updateBranchByName", || {
        Error::not_found("Branch", &params.branch_name)
    })
}

/// List the branches of a project
pub async fn get_many(client: &ExpoClient, params: &ListParams) -> Result<Vec<JsonValue>> {
    client
        .fetch_connection(
            queries::GET_BRANCHES,
            json!({ "appId": params.project_id }),
            ConnectionPath::Branches,
            params.list.cap()?,
        )
        .await
}

/// Rename a branch
pub async fn rename(client: &ExpoClient, params: &RenameParams) -> Result<JsonValue> {
    let data = client
        .graphql(
            mutations::UPDATE_BRANCH,
            json!({ "branchId": params.branch_id, "name": params.new_name }),
        )
        .await?;
    require(&data, "/updateBranch/editUpdateBranch", || {
        Error::failed(format!("Failed to update branch: {}", params.branch_id))
    })
}

/// Delete a branch
pub async fn delete(client: &ExpoClient, params: &BranchRef) -> Result<JsonValue> {
    let data = client
        .graphql(
            mutations::DELETE_BRANCH,
            json!({ "branchId": params.branch_id }),
        )
        .await?;
    Ok(deleted(
        &data,
        "/updateBranch/deleteUpdateBranch",
        "branchId",
        &params.branch_id,
    ))
}

/// List the updates published to a branch
pub async fn get_updates(client: &ExpoClient, params: &UpdatesParams) -> Result<Vec<JsonValue>> {
    update::branch_updates(
        client,
        &params.project_id,
        &params.branch_name,
        params.list.cap()?,
    )
    .await
}

/// Describe a publish request for a branch
///
/// Publishing needs the EAS CLI, so no API call is made.
pub fn publish(params: &PublishParams) -> JsonValue {
    json!({
        "projectId": params.project_id,
        "branchName": params.branch_name,
        "message": params.message,
        "runtimeVersion": params.runtime_version,
        "note": PUBLISH_NOTE,
    })
}
