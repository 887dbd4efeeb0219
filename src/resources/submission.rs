//! Submission operations
//!
//! App store submissions of finished builds.

use super::{compact, non_empty, parse_params, require, unsupported, ListOptions};
use crate::client::ExpoClient;
use crate::engine::{Operation, Resource};
use crate::error::{Error, Result};
use crate::graphql::{mutations, queries};
use crate::normalize::normalize_platform;
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
///
/// The Apple fields apply to iOS submissions, the Play fields to Android.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFields {
    pub build_id: Option<String>,
    pub apple_id: Option<String>,
    pub asc_app_id: Option<String>,
    pub apple_team_id: Option<String>,
    pub track: Option<String>,
    pub release_status: Option<String>,
    pub rollout: Option<JsonValue>,
}

impl CreateFields {
    /// Store configuration for the platform, `None` when nothing applies
    pub fn submission_config(&self, platform: &str) -> Option<JsonObject> {
        let mut config = JsonObject::new();
        let mut put = |key: &str, value: Option<&String>| {
            if let Some(value) = non_empty(value) {
                config.insert(key.to_string(), json!(value));
            }
        };

        match platform.to_lowercase().as_str() {
            "ios" => {
                put("appleId", self.apple_id.as_ref());
                put("ascAppId", self.asc_app_id.as_ref());
                put("appleTeamId", self.apple_team_id.as_ref());
            }
            "android" => {
                put("track", self.track.as_ref());
                put("releaseStatus", self.release_status.as_ref());
                if let Some(rollout) = self.rollout.as_ref().filter(|r| !r.is_null()) {
                    config.insert("rollout".to_string(), rollout.clone());
                }
            }
            _ => {}
        }

        (!config.is_empty()).then_some(config)
    }
}

/// Parameters naming a single submission
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRef {
    pub submission_id: String,
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
        Operation::GetStatus => get_status(client, &parse_params(params)?).await?,
        other => return Err(unsupported(Resource::Submission, other)),
    };
    Ok(vec![output])
}

/// Submit a build to an app store
pub async fn create(client: &ExpoClient, params: &CreateParams) -> Result<JsonValue> {
    let fields = &params.additional_fields;
    let variables = compact(json!({
        "appId": params.project_id,
        "platform": normalize_platform(&params.platform),
        "buildId": fields.build_id,
        "config": fields.submission_config(&params.platform),
    }));

    let data = client.graphql(mutations::CREATE_SUBMISSION, variables).await?;
    require(&data, "/submission/createSubmission", || {
        Error::failed("Failed to create submission")
    })
}

/// Fetch a submission by id
pub async fn get(client: &ExpoClient, params: &SubmissionRef) -> Result<JsonValue> {
    fetch_submission(client, &params.submission_id).await
}

/// List the submissions of a project
pub async fn get_many(client: &ExpoClient, params: &ListParams) -> Result<Vec<JsonValue>> {
    let mut variables = JsonObject::new();
    variables.insert("appId".to_string(), json!(params.project_id));

    if let Some(platform) = non_empty(params.filters.platform.as_ref()) {
        variables.insert("platform".to_string(), json!(normalize_platform(platform)));
    }
    if let Some(status) = non_empty(params.filters.status.as_ref()) {
        variables.insert("status".to_string(), json!(status.to_uppercase()));
    }

    client
        .fetch_connection(
            queries::GET_SUBMISSIONS,
            JsonValue::Object(variables),
            ConnectionPath::Submissions,
            params.list.cap()?,
        )
        .await
}

/// Cancel a pending submission
pub async fn cancel(client: &ExpoClient, params: &SubmissionRef) -> Result<JsonValue> {
    let data = client
        .graphql(
            mutations::CANCEL_SUBMISSION,
            json!({ "submissionId": params.submission_id }),
        )
        .await?;
    require(&data, "/submission/cancelSubmission", || {
        Error::failed(format!(
            "Failed to cancel submission: {}",
            params.submission_id
        ))
    })
}

/// Retry a failed submission
pub async fn retry(client: &ExpoClient, params: &SubmissionRef) -> Result<JsonValue> {
    let data = client
        .graphql(
            mutations::RETRY_SUBMISSION,
            json!({ "submissionId": params.submission_id }),
        )
        .await?;
    require(&data, "/submission/retrySubmission", || {
        Error::failed(format!(
            "Failed to retry submission: {}",
            params.submission_id
        ))
    })
}

/// Status summary of a submission
pub async fn get_status(client: &ExpoClient, params: &SubmissionRef) -> Result<JsonValue> {
    let submission = fetch_submission(client, &params.submission_id).await?;

    Ok(json!({
        "submissionId": params.submission_id,
        "status": submission.get("status"),
        "platform": submission.get("platform"),
        "completedAt": submission.get("completedAt"),
        "error": submission.get("error"),
    }))
}

async fn fetch_submission(client: &ExpoClient, submission_id: &str) -> Result<JsonValue> {
    let data = client
        .graphql(
            queries::GET_SUBMISSION,
            json!({ "submissionId": submission_id }),
        )
        .await?;
    require(&data, "/submission/byId", || {
        Error::not_found("Submission", submission_id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fields(value: JsonValue) -> CreateFields {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_ios_config_skips_empty_values() {
        let fields = fields(json!({
            "appleId": "dev@example.com",
            "ascAppId": "",
            "appleTeamId": "TEAM1",
            "track": "internal"
        }));

        let config = fields.submission_config("IOS").unwrap();
        assert_eq!(
            JsonValue::Object(config),
            json!({"appleId": "dev@example.com", "appleTeamId": "TEAM1"})
        );
    }

    #[test]
    fn test_android_config_keeps_zero_rollout() {
        let fields = fields(json!({"track": "beta", "rollout": 0, "appleId": "x"}));

        let config = fields.submission_config("android").unwrap();
        assert_eq!(
            JsonValue::Object(config),
            json!({"track": "beta", "rollout": 0})
        );
    }

    #[test]
    fn test_config_omitted_when_empty() {
        assert!(fields(json!({})).submission_config("ios").is_none());
        assert!(fields(json!({"track": "beta"}))
            .submission_config("web")
            .is_none());
    }
}
