//! Value normalization and validation helpers
//!
//! Converts user-facing parameter spellings into the enum values the Expo
//! API expects, and validates identifiers before they reach the network.

use crate::types::JsonObject;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use regex::Regex;
use sha1::Sha1;
use std::sync::LazyLock;

/// 40 hex characters (legacy UDID)
static UDID_HEX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{40}$").unwrap());

/// 36 hex/dash characters (modern UDID)
static UDID_DASHED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F-]{36}$").unwrap());

static BUNDLE_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9-]*(\.[a-zA-Z][a-zA-Z0-9-]*)+$").unwrap()
});

static UUID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$").unwrap()
});

/// Prefix of the `expo-signature` header value
pub const SIGNATURE_PREFIX: &str = "sha1=";

// ============================================================================
// Enum spellings
// ============================================================================

/// Map a platform name to the API's `AppPlatform` spelling
pub fn normalize_platform(platform: &str) -> String {
    match platform.to_ascii_lowercase().as_str() {
        "ios" => "IOS".to_string(),
        "android" => "ANDROID".to_string(),
        "all" => "ALL".to_string(),
        _ => platform.to_uppercase(),
    }
}

/// Map a build status to the API's `BuildStatus` spelling
pub fn normalize_build_status(status: &str) -> String {
    let known = match status.to_lowercase().as_str() {
        "new" => "NEW",
        "in_queue" => "IN_QUEUE",
        "in_progress" => "IN_PROGRESS",
        "pending_cancel" => "PENDING_CANCEL",
        "canceled" => "CANCELED",
        "finished" => "FINISHED",
        "errored" => "ERRORED",
        _ => return status.to_uppercase(),
    };
    known.to_string()
}

/// `camelCase` to `SCREAMING_SNAKE_CASE`
pub fn to_screaming_snake_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    for c in value.chars() {
        if c.is_ascii_uppercase() && !out.is_empty() {
            out.push('_');
        }
        out.extend(c.to_uppercase());
    }
    out
}

// ============================================================================
// Objects
// ============================================================================

/// Drop `null` entries; `0`, `false` and `""` are kept
pub fn filter_empty_values(object: &JsonObject) -> JsonObject {
    object
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

// ============================================================================
// Projects
// ============================================================================

/// Account and project parts of an `@account/project` slug
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSlug {
    pub account: String,
    pub project: String,
}

/// Split an `@account/project` slug
///
/// Returns `None` for UUIDs and for anything not shaped like a slug.
pub fn parse_project_slug(slug: &str) -> Option<ProjectSlug> {
    if UUID_REGEX.is_match(slug) {
        return None;
    }

    let rest = slug.strip_prefix('@')?;
    let mut parts = rest.split('/');
    let account = parts.next().filter(|s| !s.is_empty())?;
    let project = parts.next().filter(|s| !s.is_empty())?;
    if parts.next().is_some() {
        return None;
    }

    Some(ProjectSlug {
        account: account.to_string(),
        project: project.to_string(),
    })
}

/// `@account/project`, adding the `@` when missing
pub fn format_project_id(account: &str, project: &str) -> String {
    if account.starts_with('@') {
        format!("{account}/{project}")
    } else {
        format!("@{account}/{project}")
    }
}

/// Project identifier from parameters: an explicit id wins
pub fn build_project_identifier(
    account: Option<&str>,
    slug: Option<&str>,
    id: Option<&str>,
) -> Option<String> {
    fn non_empty(value: Option<&str>) -> Option<&str> {
        value.filter(|s| !s.is_empty())
    }

    if let Some(id) = non_empty(id) {
        return Some(id.to_string());
    }

    match (non_empty(account), non_empty(slug)) {
        (Some(account), Some(slug)) => Some(format!("@{account}/{slug}")),
        _ => None,
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Check an iOS device UDID
pub fn is_valid_udid(udid: &str) -> bool {
    UDID_HEX_REGEX.is_match(udid) || UDID_DASHED_REGEX.is_match(udid)
}

/// Check a reverse-DNS bundle identifier such as `com.example.app`
pub fn is_valid_bundle_identifier(bundle_id: &str) -> bool {
    BUNDLE_ID_REGEX.is_match(bundle_id)
}

/// Verify an `expo-signature` header against the raw request body
///
/// The header carries `sha1=` followed by the hex HMAC-SHA1 of the payload.
pub fn verify_webhook_signature(payload: &[u8], signature: &str, secret: &str) -> bool {
    let Some(digest) = signature
        .strip_prefix(SIGNATURE_PREFIX)
        .and_then(|hex_digest| hex::decode(hex_digest).ok())
    else {
        return false;
    };

    let Ok(mut mac) = Hmac::<Sha1>::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(payload);
    mac.verify_slice(&digest).is_ok()
}

/// Compute the `expo-signature` header value for a payload
pub fn sign_webhook_payload(payload: &[u8], secret: &str) -> Option<String> {
    let mut mac = Hmac::<Sha1>::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(payload);
    Some(format!(
        "{SIGNATURE_PREFIX}{}",
        hex::encode(mac.finalize().into_bytes())
    ))
}

// ============================================================================
// Dates
// ============================================================================

/// Render a timestamp as ISO-8601 UTC with milliseconds
///
/// Unparseable input is returned unchanged; an empty value yields `""`.
pub fn format_date(value: Option<&str>) -> String {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return String::new();
    };

    parse_timestamp(value)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| value.to_string())
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
