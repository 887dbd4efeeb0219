//! Channel operations
//!
//! Update channels and the branch each one serves.

use super::{deleted, non_empty, parse_params, require, unsupported, ListOptions};
use crate::client::ExpoClient;
use crate::engine::{Operation, Resource};
use crate::error::{Error, Result};
use crate::graphql::{mutations, queries};
use crate::pagination::ConnectionPath;
use crate::types::{JsonObject, JsonValue};
use serde::Deserialize;
use serde_json::json;

/// Mapping logic that sends every request to a single branch
pub const BRANCH_EQUALS: &str = "BRANCH_EQUALS";

/// Parameters of `create`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParams {
    pub project_id: String,
    pub channel_name: String,
    #[serde(default)]
    pub additional_fields: CreateFields,
}

/// Optional fields of `create`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFields {
    pub branch_mapping: Option<String>,
}

/// Parameters naming a channel by project and name
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelName {
    pub project_id: String,
    pub channel_name: String,
}

/// Parameters of `getMany`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub project_id: String,
    #[serde(flatten)]
    pub list: ListOptions,
}

/// Parameters of `update`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingParams {
    pub channel_id: String,
    pub branch_mapping: String,
}

/// Parameters of `linkBranch`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkParams {
    pub channel_id: String,
    pub branch_id: String,
}

/// Parameters naming a channel by id
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelRef {
    pub channel_id: String,
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
        Operation::Update => update(client, &parse_params(params)?).await?,
        Operation::Delete => delete(client, &parse_params(params)?).await?,
        Operation::LinkBranch => link_branch(client, &parse_params(params)?).await?,
        Operation::UnlinkBranch => unlink_branch(client, &parse_params(params)?).await?,
        Operation::GetLinkedBranch => get_linked_branch(client, &parse_params(params)?).await?,
        other => return Err(unsupported(Resource::Channel, other)),
    };
    Ok(vec![output])
}

/// Branch mapping that routes a channel to one branch
pub fn single_branch_mapping(branch_id: &str) -> String {
    json!({ "branchId": branch_id, "branchMappingLogic": BRANCH_EQUALS }).to_string()
}

/// Create a channel on a project
pub async fn create(client: &ExpoClient, params: &CreateParams) -> Result<JsonValue> {
    let app_id = client.resolve_project_id(&params.project_id).await?;

    let mut variables = json!({ "appId": app_id, "name": params.channel_name });
    if let Some(mapping) = non_empty(params.additional_fields.branch_mapping.as_ref()) {
        variables["branchMapping"] = json!(mapping);
    }

    let data = client.graphql(mutations::CREATE_CHANNEL, variables).await?;
    require(&data, "/updateChannel/createUpdateChannelForApp", || {
        Error::failed("Failed to create channel")
    })
}

/// Fetch a channel by name
pub async fn get(client: &ExpoClient, params: &ChannelName) -> Result<JsonValue> {
    let data = client
        .graphql(
            queries::GET_CHANNEL,
            json!({ "appId": params.project_id, "channelName": params.channel_name }),
        )
        .await?;
    require(&data, "/app/byFullName/updateChannelByName", || {
        Error::not_found("Channel", &params.channel_name)
    })
}

/// List the channels of a project
pub async fn get_many(client: &ExpoClient, params: &ListParams) -> Result<Vec<JsonValue>> {
    client
        .fetch_connection(
            queries::GET_CHANNELS,
            json!({ "appId": params.project_id }),
            ConnectionPath::Channels,
            params.list.cap()?,
        )
        .await
}

/// Replace the branch mapping of a channel
pub async fn update(client: &ExpoClient, params: &MappingParams) -> Result<JsonValue> {
    edit_mapping(client, &params.channel_id, &params.branch_mapping, || {
        Error::failed(format!("Failed to update channel: {}", params.channel_id))
    })
    .await
}

/// Delete a channel
pub async fn delete(client: &ExpoClient, params: &ChannelRef) -> Result<JsonValue> {
    let data = client
        .graphql(
            mutations::DELETE_CHANNEL,
            json!({ "channelId": params.channel_id }),
        )
        .await?;
    Ok(deleted(
        &data,
        "/updateChannel/deleteUpdateChannel",
        "channelId",
        &params.channel_id,
    ))
}

/// Point a channel at a single branch
pub async fn link_branch(client: &ExpoClient, params: &LinkParams) -> Result<JsonValue> {
    let mapping = single_branch_mapping(&params.branch_id);
    edit_mapping(client, &params.channel_id, &mapping, || {
        Error::failed(format!(
            "Failed to link branch to channel: {}",
            params.channel_id
        ))
    })
    .await
}

/// Clear the branch mapping of a channel
pub async fn unlink_branch(client: &ExpoClient, params: &ChannelRef) -> Result<JsonValue> {
    edit_mapping(client, &params.channel_id, "{}", || {
        Error::failed(format!(
            "Failed to unlink branch from channel: {}",
            params.channel_id
        ))
    })
    .await
}

/// The branch a channel currently serves
pub async fn get_linked_branch(client: &ExpoClient, params: &ChannelName) -> Result<JsonValue> {
    let channel = get(client, params).await?;

    Ok(json!({
        "channelId": channel.get("id"),
        "channelName": channel.get("name"),
        "linkedBranch": channel.get("updateBranch"),
        "branchMapping": channel.get("branchMapping"),
    }))
}

async fn edit_mapping(
    client: &ExpoClient,
    channel_id: &str,
    branch_mapping: &str,
    error: impl FnOnce() -> Error,
) -> Result<JsonValue> {
    let data = client
        .graphql(
            mutations::UPDATE_CHANNEL,
            json!({ "channelId": channel_id, "branchMapping": branch_mapping }),
        )
        .await?;
    require(&data, "/updateChannel/editUpdateChannel", error)
}
