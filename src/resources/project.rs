//! Project operations
//!
//! Projects (Expo "apps") of an account, and the builds, submissions and
//! updates that belong to them.

use super::{compact, deleted, non_empty, parse_params, require, unsupported, update, ListOptions};
use crate::client::ExpoClient;
use crate::engine::{Operation, Resource};
use crate::error::{Error, Result};
use crate::graphql::{mutations, queries};
use crate::pagination::ConnectionPath;
use crate::types::{JsonObject, JsonValue};
use serde::Deserialize;
use serde_json::json;

/// Parameters naming a project
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRef {
    pub project_id: String,
}

/// Parameters of `getMany`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(flatten)]
    pub list: ListOptions,
}

/// Parameters of `create`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParams {
    pub project_name: String,
    #[serde(default)]
    pub additional_fields: CreateFields,
}

/// Optional fields of `create`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFields {
    pub account_name: Option<String>,
    pub privacy: Option<String>,
}

/// Parameters of `update`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditParams {
    pub project_id: String,
    #[serde(default)]
    pub update_fields: EditFields,
}

/// Fields `update` can change
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditFields {
    pub privacy: Option<String>,
    pub description: Option<String>,
}

/// Parameters of `getBuilds`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildsParams {
    pub project_id: String,
    #[serde(flatten)]
    pub list: ListOptions,
    #[serde(default)]
    pub filters: BuildFilters,
}

/// Filters of `getBuilds`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildFilters {
    pub platform: Option<String>,
    pub status: Option<String>,
}

/// Parameters of `getSubmissions`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionsParams {
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

/// Parameters of `transfer`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferParams {
    pub project_id: String,
    pub to_account_name: String,
}

pub(crate) async fn execute(
    client: &ExpoClient,
    operation: Operation,
    params: &JsonObject,
) -> Result<Vec<JsonValue>> {
    let output = match operation {
        Operation::Get => get(client, &parse_params(params)?).await?,
        Operation::GetMany => return get_many(client, &parse_params(params)?).await,
        Operation::Create => create(client, &parse_params(params)?).await?,
        Operation::Update => edit(client, &parse_params(params)?).await?,
        Operation::Delete => delete(client, &parse_params(params)?).await?,
        Operation::GetBuilds => return get_builds(client, &parse_params(params)?).await,
        Operation::GetSubmissions => {
            return get_submissions(client, &parse_params(params)?).await
        }
        Operation::GetUpdates => return get_updates(client, &parse_params(params)?).await,
        Operation::Transfer => transfer(client, &parse_params(params)?).await?,
        other => return Err(unsupported(Resource::Project, other)),
    };
    Ok(vec![output])
}

/// Fetch a project by full name
pub async fn get(client: &ExpoClient, params: &ProjectRef) -> Result<JsonValue> {
    let data = client
        .graphql(queries::GET_PROJECT, json!({ "appId": params.project_id }))
        .await?;
    require(&data, "/app/byFullName", || {
        Error::not_found("Project", &params.project_id)
    })
}

/// List the projects of an account
///
/// Falls back to the credential's account when no account is given.
pub async fn get_many(client: &ExpoClient, params: &ListParams) -> Result<Vec<JsonValue>> {
    let account_name = client
        .credentials()
        .resolve_account(params.account_name.as_deref())?;

    client
        .fetch_connection(
            queries::GET_PROJECTS,
            json!({ "accountName": account_name }),
            ConnectionPath::Projects,
            params.list.cap()?,
        )
        .await
}

/// Create a project under an account
pub async fn create(client: &ExpoClient, params: &CreateParams) -> Result<JsonValue> {
    let fields = &params.additional_fields;
    let account_name = client
        .credentials()
        .resolve_account(fields.account_name.as_deref())?;

    let account_id = client
        .account_id(&account_name)
        .await?
        .ok_or_else(|| Error::not_found("Account", &account_name))?;

    let variables = compact(json!({
        "accountId": account_id,
        "projectName": params.project_name,
        "privacy": fields.privacy,
    }));

    let data = client.graphql(mutations::CREATE_PROJECT, variables).await?;
    require(&data, "/app/createApp", || {
        Error::failed("Failed to create project")
    })
}

/// Change the privacy or description of a project
pub async fn edit(client: &ExpoClient, params: &EditParams) -> Result<JsonValue> {
    let app_id = client.resolve_project_id(&params.project_id).await?;
    let fields = &params.update_fields;

    let variables = compact(json!({
        "appId": app_id,
        "privacy": fields.privacy,
        "description": fields.description,
    }));

    let data = client.graphql(mutations::UPDATE_PROJECT, variables).await?;
    require(&data, "/app/editApp", || {
        Error::failed(format!("Failed to update project: {}", params.project_id))
    })
}

/// Delete a project
pub async fn delete(client: &ExpoClient, params: &ProjectRef) -> Result<JsonValue> {
    let app_id = client.resolve_project_id(&params.project_id).await?;

    let data = client
        .graphql(mutations::DELETE_PROJECT, json!({ "appId": app_id }))
        .await?;
    Ok(deleted(
        &data,
        "/app/deleteApp",
        "projectId",
        &params.project_id,
    ))
}

/// List the builds of a project
///
/// Filters are upper-cased as given.
pub async fn get_builds(client: &ExpoClient, params: &BuildsParams) -> Result<Vec<JsonValue>> {
    let mut variables = JsonObject::new();
    variables.insert("appId".to_string(), json!(params.project_id));

    if let Some(platform) = non_empty(params.filters.platform.as_ref()) {
        variables.insert("platform".to_string(), json!(platform.to_uppercase()));
    }
    if let Some(status) = non_empty(params.filters.status.as_ref()) {
        variables.insert("status".to_string(), json!(status.to_uppercase()));
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

/// List the submissions of a project
pub async fn get_submissions(
    client: &ExpoClient,
    params: &SubmissionsParams,
) -> Result<Vec<JsonValue>> {
    client
        .fetch_connection(
            queries::GET_SUBMISSIONS,
            json!({ "appId": params.project_id }),
            ConnectionPath::Submissions,
            params.list.cap()?,
        )
        .await
}

/// List the updates on one branch of a project
pub async fn get_updates(client: &ExpoClient, params: &UpdatesParams) -> Result<Vec<JsonValue>> {
    update::branch_updates(
        client,
        &params.project_id,
        &params.branch_name,
        params.list.cap()?,
    )
    .await
}

/// Move a project to another account
pub async fn transfer(client: &ExpoClient, params: &TransferParams) -> Result<JsonValue> {
    let app_id = client.resolve_project_id(&params.project_id).await?;

    let to_account_id = client
        .account_id(&params.to_account_name)
        .await?
        .ok_or_else(|| Error::not_found("Destination account", &params.to_account_name))?;

    let data = client
        .graphql(
            mutations::TRANSFER_PROJECT,
            json!({ "appId": app_id, "toAccountId": to_account_id }),
        )
        .await?;
    require(&data, "/app/transferApp", || {
        Error::failed(format!("Failed to transfer project: {}", params.project_id))
    })
}
