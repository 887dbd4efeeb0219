//! Secret operations
//!
//! Environment secrets of a project. Values are write-only; reads return
//! names and metadata.

use super::{at, compact, deleted, parse_params, require, unsupported, with_fields};
use crate::client::ExpoClient;
use crate::engine::{Operation, Resource};
use crate::error::{Error, Result};
use crate::graphql::{mutations, queries};
use crate::types::{JsonObject, JsonValue};
use serde::Deserialize;
use serde_json::json;

/// Scope of a typed secret
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretScope {
    /// Available to EAS builds
    Build,
    /// Available to EAS updates
    Update,
}

impl SecretScope {
    /// API enum value
    pub fn api_type(self) -> &'static str {
        match self {
            Self::Build => "BUILD",
            Self::Update => "UPDATE",
        }
    }

    /// Label added to the output record
    pub fn label(self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Update => "update",
        }
    }
}

/// Parameters of `create`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParams {
    pub project_id: String,
    pub secret_name: String,
    pub secret_value: String,
    #[serde(default)]
    pub additional_fields: CreateFields,
}

/// Optional fields of `create`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFields {
    pub secret_type: Option<String>,
}

/// Parameters of `createBuildSecret` and `createUpdateSecret`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopedParams {
    pub project_id: String,
    pub secret_name: String,
    pub secret_value: String,
}

/// Parameters naming a secret by project and name
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretName {
    pub project_id: String,
    pub secret_name: String,
}

/// Parameters naming a project
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRef {
    pub project_id: String,
}

/// Parameters of `update`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParams {
    pub secret_id: String,
    pub secret_value: String,
}

/// Parameters naming a secret by id
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretRef {
    pub secret_id: String,
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
        Operation::CreateBuildSecret => {
            create_scoped(client, &parse_params(params)?, SecretScope::Build).await?
        }
        Operation::CreateUpdateSecret => {
            create_scoped(client, &parse_params(params)?, SecretScope::Update).await?
        }
        other => return Err(unsupported(Resource::Secret, other)),
    };
    Ok(vec![output])
}

/// Create a secret on a project
pub async fn create(client: &ExpoClient, params: &CreateParams) -> Result<JsonValue> {
    let app_id = client.resolve_project_id(&params.project_id).await?;

    let variables = compact(json!({
        "appId": app_id,
        "name": params.secret_name,
        "value": params.secret_value,
        "type": params.additional_fields.secret_type,
    }));

    let data = client.graphql(mutations::CREATE_SECRET, variables).await?;
    require(
        &data,
        "/environmentSecret/createEnvironmentSecretForApp",
        || Error::failed("Failed to create secret"),
    )
}

/// Create a secret scoped to builds or updates
pub async fn create_scoped(
    client: &ExpoClient,
    params: &ScopedParams,
    scope: SecretScope,
) -> Result<JsonValue> {
    let app_id = client.resolve_project_id(&params.project_id).await?;

    let data = client
        .graphql(
            mutations::CREATE_SECRET,
            json!({
                "appId": app_id,
                "name": params.secret_name,
                "value": params.secret_value,
                "type": scope.api_type(),
            }),
        )
        .await?;

    let secret = require(
        &data,
        "/environmentSecret/createEnvironmentSecretForApp",
        || Error::failed(format!("Failed to create {} secret", scope.label())),
    )?;
    Ok(with_fields(secret, json!({ "secretType": scope.label() })))
}

/// Find a secret by name
pub async fn get(client: &ExpoClient, params: &SecretName) -> Result<JsonValue> {
    list_secrets(client, &params.project_id)
        .await?
        .into_iter()
        .find(|secret| {
            secret.get("name").and_then(JsonValue::as_str) == Some(params.secret_name.as_str())
        })
        .ok_or_else(|| Error::not_found("Secret", &params.secret_name))
}

/// List the secrets of a project
pub async fn get_many(client: &ExpoClient, params: &ProjectRef) -> Result<Vec<JsonValue>> {
    list_secrets(client, &params.project_id).await
}

/// Replace the value of a secret
pub async fn update(client: &ExpoClient, params: &UpdateParams) -> Result<JsonValue> {
    let data = client
        .graphql(
            mutations::UPDATE_SECRET,
            json!({ "secretId": params.secret_id, "value": params.secret_value }),
        )
        .await?;
    require(&data, "/environmentSecret/updateEnvironmentSecret", || {
        Error::failed(format!("Failed to update secret: {}", params.secret_id))
    })
}

/// Delete a secret
pub async fn delete(client: &ExpoClient, params: &SecretRef) -> Result<JsonValue> {
    let data = client
        .graphql(
            mutations::DELETE_SECRET,
            json!({ "secretId": params.secret_id }),
        )
        .await?;
    Ok(deleted(
        &data,
        "/environmentSecret/deleteEnvironmentSecret",
        "secretId",
        &params.secret_id,
    ))
}

async fn list_secrets(client: &ExpoClient, project_id: &str) -> Result<Vec<JsonValue>> {
    let data = client
        .graphql(queries::GET_SECRETS, json!({ "appId": project_id }))
        .await?;

    Ok(at(&data, "/app/byFullName/environmentSecrets")
        .and_then(JsonValue::as_array)
        .cloned()
        .unwrap_or_default())
}
