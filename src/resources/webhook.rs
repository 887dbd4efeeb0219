//! Webhook operations
//!
//! Project webhooks and their delivery history.

use super::{at, deleted, non_empty, parse_params, require, unsupported, with_fields};
use crate::client::ExpoClient;
use crate::engine::{Operation, Resource};
use crate::error::{Error, Result};
use crate::graphql::{mutations, queries};
use crate::pagination::simplify_connection;
use crate::types::{JsonObject, JsonValue, Method};
use serde::Deserialize;
use serde_json::json;

/// Parameters of `create`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParams {
    pub project_id: String,
    pub url: String,
    pub secret: String,
    pub event: String,
}

/// Parameters naming a webhook of a project
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectWebhook {
    pub project_id: String,
    pub webhook_id: String,
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
    pub webhook_id: String,
    #[serde(default)]
    pub update_fields: UpdateFields,
}

/// Fields `update` can change
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFields {
    pub url: Option<String>,
    pub secret: Option<String>,
    pub event: Option<String>,
}

/// Parameters naming a webhook by id
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRef {
    pub webhook_id: String,
}

/// Parameters of `redeliverEvent`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeliverParams {
    pub webhook_id: String,
    pub delivery_id: String,
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
        Operation::GetDeliveries => return get_deliveries(client, &parse_params(params)?).await,
        Operation::RedeliverEvent => redeliver_event(client, &parse_params(params)?).await?,
        other => return Err(unsupported(Resource::Webhook, other)),
    };
    Ok(vec![output])
}

/// Register a webhook on a project
pub async fn create(client: &ExpoClient, params: &CreateParams) -> Result<JsonValue> {
    let app_id = client.resolve_project_id(&params.project_id).await?;

    let data = client
        .graphql(
            mutations::CREATE_WEBHOOK,
            json!({
                "appId": app_id,
                "url": params.url,
                "secret": params.secret,
                "event": params.event,
            }),
        )
        .await?;
    require(&data, "/webhook/createWebhook", || {
        Error::failed("Failed to create webhook")
    })
}

/// Find a webhook of a project by id
pub async fn get(client: &ExpoClient, params: &ProjectWebhook) -> Result<JsonValue> {
    list_webhooks(client, &params.project_id)
        .await?
        .into_iter()
        .find(|w| w.get("id").and_then(JsonValue::as_str) == Some(params.webhook_id.as_str()))
        .ok_or_else(|| Error::not_found("Webhook", &params.webhook_id))
}

/// List the webhooks of a project
pub async fn get_many(client: &ExpoClient, params: &ProjectRef) -> Result<Vec<JsonValue>> {
    list_webhooks(client, &params.project_id).await
}

/// Change the URL, secret or event of a webhook
///
/// Empty fields are left unchanged.
pub async fn update(client: &ExpoClient, params: &UpdateParams) -> Result<JsonValue> {
    let fields = &params.update_fields;
    let mut variables = json!({ "webhookId": params.webhook_id });

    for (key, value) in [
        ("url", &fields.url),
        ("secret", &fields.secret),
        ("event", &fields.event),
    ] {
        if let Some(value) = non_empty(value.as_ref()) {
            variables[key] = json!(value);
        }
    }

    let data = client.graphql(mutations::UPDATE_WEBHOOK, variables).await?;
    require(&data, "/webhook/updateWebhook", || {
        Error::failed(format!("Failed to update webhook: {}", params.webhook_id))
    })
}

/// Delete a webhook
pub async fn delete(client: &ExpoClient, params: &WebhookRef) -> Result<JsonValue> {
    let data = client
        .graphql(
            mutations::DELETE_WEBHOOK,
            json!({ "webhookId": params.webhook_id }),
        )
        .await?;
    Ok(deleted(
        &data,
        "/webhook/deleteWebhook",
        "webhookId",
        &params.webhook_id,
    ))
}

/// Recent deliveries of a webhook
pub async fn get_deliveries(client: &ExpoClient, params: &ProjectWebhook) -> Result<Vec<JsonValue>> {
    let data = client
        .graphql(
            queries::GET_WEBHOOK_DELIVERIES,
            json!({ "appId": params.project_id, "webhookId": params.webhook_id }),
        )
        .await?;

    let webhook = at(&data, "/app/byFullName/webhooks/0")
        .ok_or_else(|| Error::not_found("Webhook", &params.webhook_id))?;

    let deliveries = webhook
        .get("deliveries")
        .map(simplify_connection)
        .unwrap_or_default();

    Ok(deliveries
        .into_iter()
        .map(|delivery| with_fields(delivery, json!({ "webhookId": params.webhook_id })))
        .collect())
}

/// Ask the API to send a delivery again
pub async fn redeliver_event(client: &ExpoClient, params: &RedeliverParams) -> Result<JsonValue> {
    let response = client
        .rest(
            Method::POST,
            &[
                "webhooks",
                &params.webhook_id,
                "deliveries",
                &params.delivery_id,
                "redeliver",
            ],
            None,
        )
        .await?;

    Ok(json!({
        "success": true,
        "webhookId": params.webhook_id,
        "deliveryId": params.delivery_id,
        "response": response,
    }))
}

async fn list_webhooks(client: &ExpoClient, project_id: &str) -> Result<Vec<JsonValue>> {
    let data = client
        .graphql(queries::GET_WEBHOOKS, json!({ "appId": project_id }))
        .await?;

    Ok(at(&data, "/app/byFullName/webhooks")
        .and_then(JsonValue::as_array)
        .cloned()
        .unwrap_or_default())
}
