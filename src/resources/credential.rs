//! Credential operations
//!
//! iOS distribution and push credentials, Android keystores and FCM keys.
//! Output records are tagged with `platform` and `type`.

use super::{at, is_truthy, parse_params, require, rest_record, unsupported, with_fields};
use crate::client::ExpoClient;
use crate::engine::{Operation, Resource};
use crate::error::{Error, Result};
use crate::graphql::{mutations, queries};
use crate::normalize::is_valid_bundle_identifier;
use crate::types::{CredentialKind, CredentialPlatform, JsonObject, JsonValue, Method};
use serde::Deserialize;
use serde_json::json;

/// Parameters of `getMany`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub project_id: String,
    #[serde(default)]
    pub platform: CredentialPlatform,
}

/// Parameters naming a project
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRef {
    pub project_id: String,
}

/// Parameters of `getIosDistribution`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IosDistributionParams {
    pub project_id: String,
    #[serde(default)]
    pub additional_fields: IosDistributionFields,
}

/// Optional fields of `getIosDistribution`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IosDistributionFields {
    pub apple_team_identifier: Option<String>,
}

/// Parameters of `createIosDistribution`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIosParams {
    pub project_id: String,
    pub bundle_identifier: String,
    pub apple_team_id: String,
}

/// Parameters of `createAndroidKeystore`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateKeystoreParams {
    pub project_id: String,
    pub keystore_password: String,
    pub key_alias: String,
    pub key_password: String,
}

/// Parameters of `delete`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteParams {
    pub credential_id: String,
    pub credential_type: String,
}

/// Parameters of `downloadKeystore`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadParams {
    pub project_id: String,
    pub credential_id: String,
}

pub(crate) async fn execute(
    client: &ExpoClient,
    operation: Operation,
    params: &JsonObject,
) -> Result<Vec<JsonValue>> {
    match operation {
        Operation::GetMany => get_many(client, &parse_params(params)?).await,
        Operation::GetIosDistribution => get_ios_distribution(client, &parse_params(params)?).await,
        Operation::GetIosPush => get_ios_push(client, &parse_params(params)?).await,
        Operation::GetAndroidKeystore => get_android_keystore(client, &parse_params(params)?).await,
        Operation::GetAndroidFcm => get_android_fcm(client, &parse_params(params)?).await,
        Operation::CreateIosDistribution => {
            Ok(vec![create_ios_distribution(client, &parse_params(params)?).await?])
        }
        Operation::CreateAndroidKeystore => {
            Ok(vec![create_android_keystore(client, &parse_params(params)?).await?])
        }
        Operation::Delete => Ok(vec![delete(client, &parse_params(params)?).await?]),
        Operation::DownloadKeystore => {
            Ok(vec![download_keystore(client, &parse_params(params)?).await?])
        }
        other => Err(unsupported(Resource::Credential, other)),
    }
}

fn tagged(record: JsonValue, platform: &str, kind: &str) -> JsonValue {
    with_fields(record, json!({ "platform": platform, "type": kind }))
}

/// Credentials of a project, iOS first
pub async fn get_many(client: &ExpoClient, params: &ListParams) -> Result<Vec<JsonValue>> {
    let mut credentials = Vec::new();

    if params.platform.includes_ios() {
        let ios = app_credentials(
            client,
            queries::GET_IOS_DISTRIBUTION_CREDENTIALS,
            json!({ "appId": params.project_id }),
            "iosAppCredentials",
        )
        .await?;
        credentials.extend(ios.into_iter().map(|c| tagged(c, "ios", "distribution")));
    }

    if params.platform.includes_android() {
        let android = app_credentials(
            client,
            queries::GET_ANDROID_KEYSTORE,
            json!({ "appId": params.project_id }),
            "androidAppCredentials",
        )
        .await?;
        credentials.extend(android.into_iter().map(|c| tagged(c, "android", "keystore")));
    }

    Ok(credentials)
}

/// iOS distribution credentials, optionally for one Apple team
pub async fn get_ios_distribution(
    client: &ExpoClient,
    params: &IosDistributionParams,
) -> Result<Vec<JsonValue>> {
    let mut variables = json!({ "appId": params.project_id });
    if let Some(team) = super::non_empty(params.additional_fields.apple_team_identifier.as_ref()) {
        variables["appleTeamIdentifier"] = json!(team);
    }

    let credentials = app_credentials(
        client,
        queries::GET_IOS_DISTRIBUTION_CREDENTIALS,
        variables,
        "iosAppCredentials",
    )
    .await?;
    Ok(credentials
        .into_iter()
        .map(|c| tagged(c, "ios", "distribution"))
        .collect())
}

/// iOS push keys
///
/// Credential sets without a push key are skipped.
pub async fn get_ios_push(client: &ExpoClient, params: &ProjectRef) -> Result<Vec<JsonValue>> {
    let credentials = app_credentials(
        client,
        queries::GET_IOS_PUSH_CREDENTIALS,
        json!({ "appId": params.project_id }),
        "iosAppCredentials",
    )
    .await?;

    Ok(credentials
        .iter()
        .filter(|c| is_truthy(c.get("pushKey")))
        .map(|c| {
            json!({
                "id": c.get("id"),
                "pushKey": c.get("pushKey"),
                "platform": "ios",
                "type": "push",
            })
        })
        .collect())
}

/// Android upload keystores
pub async fn get_android_keystore(
    client: &ExpoClient,
    params: &ProjectRef,
) -> Result<Vec<JsonValue>> {
    let credentials = app_credentials(
        client,
        queries::GET_ANDROID_KEYSTORE,
        json!({ "appId": params.project_id }),
        "androidAppCredentials",
    )
    .await?;

    Ok(credentials
        .iter()
        .map(|c| {
            json!({
                "id": c.get("id"),
                "keystore": c.get("androidKeystore"),
                "platform": "android",
                "type": "keystore",
            })
        })
        .collect())
}

/// Android FCM V1 service account keys
///
/// Credential sets without an FCM key are skipped.
pub async fn get_android_fcm(client: &ExpoClient, params: &ProjectRef) -> Result<Vec<JsonValue>> {
    let credentials = app_credentials(
        client,
        queries::GET_ANDROID_FCM_CREDENTIALS,
        json!({ "appId": params.project_id }),
        "androidAppCredentials",
    )
    .await?;

    Ok(credentials
        .iter()
        .filter(|c| is_truthy(c.get("fcmV1Credential")))
        .map(|c| {
            json!({
                "id": c.get("id"),
                "fcmCredential": c.get("fcmV1Credential"),
                "platform": "android",
                "type": "fcm",
            })
        })
        .collect())
}

/// Create iOS app credentials for a bundle identifier
///
/// The bundle identifier is checked before any request is sent.
pub async fn create_ios_distribution(
    client: &ExpoClient,
    params: &CreateIosParams,
) -> Result<JsonValue> {
    if !is_valid_bundle_identifier(&params.bundle_identifier) {
        return Err(Error::invalid_param(
            "bundleIdentifier",
            "Invalid bundle identifier format",
        ));
    }

    let data = client
        .graphql(
            mutations::CREATE_IOS_APP_CREDENTIALS,
            json!({
                "appId": params.project_id,
                "bundleIdentifier": params.bundle_identifier,
                "appleTeamId": params.apple_team_id,
            }),
        )
        .await?;

    let credential = require(&data, "/iosAppCredentials/createIosAppCredentials", || {
        Error::failed("Failed to create iOS distribution credentials")
    })?;
    Ok(tagged(credential, "ios", "distribution"))
}

/// Create Android app credentials with a new keystore
pub async fn create_android_keystore(
    client: &ExpoClient,
    params: &CreateKeystoreParams,
) -> Result<JsonValue> {
    let data = client
        .graphql(
            mutations::CREATE_ANDROID_KEYSTORE,
            json!({
                "appId": params.project_id,
                "keystore": {
                    "keystorePassword": params.keystore_password,
                    "keyAlias": params.key_alias,
                    "keyPassword": params.key_password,
                },
            }),
        )
        .await?;

    let credential = require(
        &data,
        "/androidAppCredentials/createAndroidAppCredentials",
        || Error::failed("Failed to create Android keystore"),
    )?;
    Ok(tagged(credential, "android", "keystore"))
}

/// Parse a `credentialType` parameter
pub fn parse_credential_kind(value: &str) -> Result<CredentialKind> {
    match value {
        "ios_distribution" => Ok(CredentialKind::IosDistribution),
        "android_keystore" => Ok(CredentialKind::AndroidKeystore),
        other => Err(Error::invalid_param(
            "credentialType",
            format!("Unknown credential type: {other}"),
        )),
    }
}

/// Delete an iOS or Android credential set
pub async fn delete(client: &ExpoClient, params: &DeleteParams) -> Result<JsonValue> {
    let kind = parse_credential_kind(&params.credential_type)?;
    let document = match kind {
        CredentialKind::IosDistribution => mutations::DELETE_IOS_APP_CREDENTIALS,
        CredentialKind::AndroidKeystore => mutations::DELETE_ANDROID_APP_CREDENTIALS,
    };

    let data = client
        .graphql(document, json!({ "credentialId": params.credential_id }))
        .await?;

    Ok(json!({
        "success": is_truthy(Some(&data)),
        "credentialId": params.credential_id,
        "credentialType": kind.as_str(),
    }))
}

/// Download a keystore through the REST API
pub async fn download_keystore(client: &ExpoClient, params: &DownloadParams) -> Result<JsonValue> {
    let response = client
        .rest(
            Method::GET,
            &[
                "projects",
                &params.project_id,
                "credentials",
                &params.credential_id,
                "keystore",
            ],
            None,
        )
        .await?;
    Ok(rest_record(response))
}

async fn app_credentials(
    client: &ExpoClient,
    document: &str,
    variables: JsonValue,
    field: &str,
) -> Result<Vec<JsonValue>> {
    let data = client.graphql(document, variables).await?;

    Ok(at(&data, &format!("/app/byFullName/{field}"))
        .and_then(JsonValue::as_array)
        .cloned()
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("ios_distribution", CredentialKind::IosDistribution)]
    #[test_case("android_keystore", CredentialKind::AndroidKeystore)]
    fn test_parse_credential_kind(value: &str, expected: CredentialKind) {
        assert_eq!(parse_credential_kind(value).unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_credential_kind() {
        let err = parse_credential_kind("ios_push").unwrap_err();
        assert!(err.to_string().contains("Unknown credential type: ios_push"));
    }

    #[test]
    fn test_tagged_record() {
        let record = tagged(json!({"id": "c1"}), "ios", "distribution");
        assert_eq!(
            record,
            json!({"id": "c1", "platform": "ios", "type": "distribution"})
        );
    }
}
