//! Device operations
//!
//! Apple devices registered for ad hoc distribution.

use super::{at, deleted, non_empty, parse_params, require, unsupported, ListOptions};
use crate::client::ExpoClient;
use crate::engine::{Operation, Resource};
use crate::error::{Error, Result};
use crate::graphql::{mutations, queries};
use crate::normalize::is_valid_udid;
use crate::pagination::{simplify_connection, ConnectionPath};
use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Deserializer};
use serde_json::json;

/// Parameters of `register`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterParams {
    pub project_id: String,
    pub udid: String,
    #[serde(default)]
    pub additional_fields: RegisterFields,
}

/// Optional fields of `register`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterFields {
    pub name: Option<String>,
    pub device_class: Option<String>,
}

/// Parameters naming a device of a project
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDevice {
    pub project_id: String,
    pub device_id: String,
}

/// Parameters of `getMany`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub project_id: String,
    #[serde(flatten)]
    pub list: ListOptions,
}

/// Parameters naming a device by id
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRef {
    pub device_id: String,
}

/// Parameters of `createProvisioningProfile`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileParams {
    pub project_id: String,
    pub apple_team_id: String,
    #[serde(deserialize_with = "id_list")]
    pub device_ids: Vec<String>,
}

/// Accept device ids as a list or a comma-separated string
fn id_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Ids {
        List(Vec<String>),
        Joined(String),
    }

    Ok(match Ids::deserialize(deserializer)? {
        Ids::List(ids) => ids,
        Ids::Joined(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

pub(crate) async fn execute(
    client: &ExpoClient,
    operation: Operation,
    params: &JsonObject,
) -> Result<Vec<JsonValue>> {
    let output = match operation {
        Operation::Register => register(client, &parse_params(params)?).await?,
        Operation::Get => get(client, &parse_params(params)?).await?,
        Operation::GetMany => return get_many(client, &parse_params(params)?).await,
        Operation::Delete => delete(client, &parse_params(params)?).await?,
        Operation::CreateProvisioningProfile => {
            create_provisioning_profile(client, &parse_params(params)?).await?
        }
        other => return Err(unsupported(Resource::Device, other)),
    };
    Ok(vec![output])
}

/// Register an Apple device
///
/// The UDID is checked before any request is sent.
pub async fn register(client: &ExpoClient, params: &RegisterParams) -> Result<JsonValue> {
    if !is_valid_udid(&params.udid) {
        return Err(Error::invalid_param("udid", "Invalid UDID format"));
    }

    let app_id = client.resolve_project_id(&params.project_id).await?;

    let fields = &params.additional_fields;
    let mut device_data = json!({ "identifier": params.udid });
    if let Some(name) = non_empty(fields.name.as_ref()) {
        device_data["name"] = json!(name);
    }
    if let Some(class) = non_empty(fields.device_class.as_ref()) {
        device_data["deviceClass"] = json!(class.to_uppercase());
    }

    let data = client
        .graphql(
            mutations::REGISTER_DEVICE,
            json!({ "appId": app_id, "deviceData": device_data }),
        )
        .await?;
    require(&data, "/appleDevice/createAppleDevice", || {
        Error::failed("Failed to register device")
    })
}

/// Find a device among the first page of a project's devices
pub async fn get(client: &ExpoClient, params: &ProjectDevice) -> Result<JsonValue> {
    let data = client
        .graphql(queries::GET_DEVICES, json!({ "appId": params.project_id }))
        .await?;

    at(&data, "/app/byFullName/appleDevices")
        .map(simplify_connection)
        .unwrap_or_default()
        .into_iter()
        .find(|d| d.get("id").and_then(JsonValue::as_str) == Some(params.device_id.as_str()))
        .ok_or_else(|| Error::not_found("Device", &params.device_id))
}

/// List the devices of a project
pub async fn get_many(client: &ExpoClient, params: &ListParams) -> Result<Vec<JsonValue>> {
    client
        .fetch_connection(
            queries::GET_DEVICES,
            json!({ "appId": params.project_id }),
            ConnectionPath::AppleDevices,
            params.list.cap()?,
        )
        .await
}

/// Remove a registered device
pub async fn delete(client: &ExpoClient, params: &DeviceRef) -> Result<JsonValue> {
    let data = client
        .graphql(
            mutations::DELETE_DEVICE,
            json!({ "deviceId": params.device_id }),
        )
        .await?;
    Ok(deleted(
        &data,
        "/appleDevice/deleteAppleDevice",
        "deviceId",
        &params.device_id,
    ))
}

/// Create an ad hoc provisioning profile covering the given devices
pub async fn create_provisioning_profile(
    client: &ExpoClient,
    params: &ProfileParams,
) -> Result<JsonValue> {
    let app_id = client.resolve_project_id(&params.project_id).await?;

    let data = client
        .graphql(
            mutations::CREATE_PROVISIONING_PROFILE,
            json!({
                "appId": app_id,
                "appleTeamId": params.apple_team_id,
                "deviceIds": params.device_ids,
            }),
        )
        .await?;
    require(&data, "/iosAppCredentials/createProvisioningProfile", || {
        Error::failed("Failed to create provisioning profile")
    })
}
