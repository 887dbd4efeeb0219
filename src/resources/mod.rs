//! Resource operations
//!
//! One module per Expo resource. Each module turns the parameters of an
//! input item into typed structs, issues the GraphQL or REST calls through
//! [`ExpoClient`], and shapes the response into output records.
//!
//! # Parameters
//!
//! Parameters are a camelCase JSON object. Optional groups nest under
//! `additionalFields`, `filters` and `updateFields`. List operations share
//! [`ListOptions`].

pub mod branch;
pub mod build;
pub mod channel;
pub mod credential;
pub mod device;
pub mod project;
pub mod secret;
pub mod submission;
pub mod update;
pub mod webhook;

use crate::client::ExpoClient;
use crate::engine::{Operation, Resource};
use crate::error::{Error, Result};
use crate::normalize::filter_empty_values;
use crate::types::{JsonObject, JsonValue};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

/// Default number of items returned by list operations
pub const DEFAULT_LIMIT: i64 = 50;

/// Largest accepted `limit`
pub const MAX_LIMIT: i64 = 100;

/// Run one operation of a resource for a single input item
pub async fn execute(
    client: &ExpoClient,
    resource: Resource,
    operation: Operation,
    params: &JsonObject,
) -> Result<Vec<JsonValue>> {
    resource.ensure_supports(operation)?;

    match resource {
        Resource::Build => build::execute(client, operation, params).await,
        Resource::Submission => submission::execute(client, operation, params).await,
        Resource::Update => update::execute(client, operation, params).await,
        Resource::Branch => branch::execute(client, operation, params).await,
        Resource::Channel => channel::execute(client, operation, params).await,
        Resource::Project => project::execute(client, operation, params).await,
        Resource::Secret => secret::execute(client, operation, params).await,
        Resource::Credential => credential::execute(client, operation, params).await,
        Resource::Webhook => webhook::execute(client, operation, params).await,
        Resource::Device => device::execute(client, operation, params).await,
    }
}

// ============================================================================
// Parameters
// ============================================================================

/// Deserialize an item's parameters into a typed struct
///
/// Missing required fields surface as `MissingParameter`; any other shape
/// problem is an `InvalidParameter`.
pub fn parse_params<T: DeserializeOwned>(params: &JsonObject) -> Result<T> {
    serde_json::from_value(JsonValue::Object(params.clone())).map_err(|e| {
        let message = e.to_string();
        match missing_field_name(&message) {
            Some(name) => Error::missing_param(name),
            None => Error::invalid_param("parameters", message),
        }
    })
}

fn missing_field_name(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("missing field `")?;
    rest.split('`').next()
}

/// Shared `returnAll` / `limit` parameters of list operations
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOptions {
    #[serde(default)]
    pub return_all: bool,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl ListOptions {
    /// Item cap for the fetcher, `None` when everything is requested
    pub fn cap(&self) -> Result<Option<usize>> {
        if self.return_all {
            return Ok(None);
        }

        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(Error::invalid_param(
                "limit",
                format!("must be between 1 and {MAX_LIMIT}, got {limit}"),
            ));
        }
        Ok(Some(limit as usize))
    }
}

// ============================================================================
// Response shaping
// ============================================================================

/// Value at a JSON pointer, treating `null` as absent
pub fn at<'a>(data: &'a JsonValue, pointer: &str) -> Option<&'a JsonValue> {
    data.pointer(pointer).filter(|v| !v.is_null())
}

/// Value at a JSON pointer, or the given error when absent
pub fn require(
    data: &JsonValue,
    pointer: &str,
    error: impl FnOnce() -> Error,
) -> Result<JsonValue> {
    at(data, pointer).cloned().ok_or_else(error)
}

/// JavaScript-style truthiness of a response value
pub fn is_truthy(value: Option<&JsonValue>) -> bool {
    match value {
        None | Some(JsonValue::Null) => false,
        Some(JsonValue::Bool(b)) => *b,
        Some(JsonValue::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(JsonValue::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Output record of a delete operation
pub fn deleted(data: &JsonValue, pointer: &str, id_key: &str, id: &str) -> JsonValue {
    let mut record = JsonObject::new();
    record.insert("success".to_string(), json!(is_truthy(data.pointer(pointer))));
    record.insert(id_key.to_string(), json!(id));
    JsonValue::Object(record)
}

/// Merge extra fields into an object record
///
/// Non-object records are wrapped under `value`.
pub fn with_fields(record: JsonValue, fields: JsonValue) -> JsonValue {
    let mut object = match record {
        JsonValue::Object(map) => map,
        JsonValue::Null => JsonObject::new(),
        other => {
            let mut map = JsonObject::new();
            map.insert("value".to_string(), other);
            map
        }
    };

    if let JsonValue::Object(extra) = fields {
        object.extend(extra);
    }
    JsonValue::Object(object)
}

/// Output record of a REST call, `{}` for an empty response
pub fn rest_record(value: JsonValue) -> JsonValue {
    match value {
        JsonValue::Null => JsonValue::Object(JsonObject::new()),
        other => other,
    }
}

/// Drop `null` entries from a variables object
pub fn compact(value: JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(map) => JsonValue::Object(filter_empty_values(&map)),
        other => other,
    }
}

/// Error for an operation a resource module does not dispatch
pub(crate) fn unsupported(resource: Resource, operation: Operation) -> Error {
    Error::UnknownOperation {
        resource: resource.as_str().to_string(),
        operation: operation.as_str().to_string(),
    }
}

/// Filter out empty strings from optional parameters
pub(crate) fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests;
