//! Tests for resource helpers

use super::*;
use pretty_assertions::assert_eq;
use test_case::test_case;

fn object(value: JsonValue) -> JsonObject {
    match value {
        JsonValue::Object(map) => map,
        _ => panic!("expected an object"),
    }
}

// ============================================================================
// Parameters
// ============================================================================

#[test]
fn test_parse_params_nested_groups() {
    let params: build::CreateParams = parse_params(&object(json!({
        "projectId": "@acme/app",
        "platform": "ios",
        "additionalFields": {"buildProfile": "production"}
    })))
    .unwrap();

    assert_eq!(params.project_id, "@acme/app");
    assert_eq!(
        params.additional_fields.build_profile.as_deref(),
        Some("production")
    );
    assert!(params.additional_fields.channel.is_none());
}

#[test]
fn test_parse_params_missing_field() {
    let err = parse_params::<build::BuildRef>(&JsonObject::new()).unwrap_err();
    assert!(matches!(err, Error::MissingParameter { ref name } if name == "buildId"));
}

#[test]
fn test_parse_params_wrong_type() {
    let err = parse_params::<build::BuildRef>(&object(json!({"buildId": 7}))).unwrap_err();
    assert!(matches!(err, Error::InvalidParameter { .. }));
}

#[test]
fn test_parse_params_flattened_list_options() {
    let params: branch::ListParams = parse_params(&object(json!({
        "projectId": "@acme/app",
        "returnAll": true
    })))
    .unwrap();

    assert!(params.list.return_all);
    assert_eq!(params.list.cap().unwrap(), None);
}

// ============================================================================
// ListOptions
// ============================================================================

#[test]
fn test_list_cap_defaults_to_fifty() {
    assert_eq!(ListOptions::default().cap().unwrap(), Some(50));
}

#[test_case(1, Some(1); "lower bound")]
#[test_case(100, Some(100); "upper bound")]
#[test_case(25, Some(25); "in range")]
fn test_list_cap_valid(limit: i64, expected: Option<usize>) {
    let options = ListOptions {
        return_all: false,
        limit: Some(limit),
    };
    assert_eq!(options.cap().unwrap(), expected);
}

#[test_case(0; "zero")]
#[test_case(101; "above max")]
#[test_case(-5; "negative")]
fn test_list_cap_invalid(limit: i64) {
    let options = ListOptions {
        return_all: false,
        limit: Some(limit),
    };
    assert!(matches!(
        options.cap(),
        Err(Error::InvalidParameter { ref name, .. }) if name == "limit"
    ));
}

#[test]
fn test_list_cap_ignores_limit_when_returning_all() {
    let options = ListOptions {
        return_all: true,
        limit: Some(500),
    };
    assert_eq!(options.cap().unwrap(), None);
}

// ============================================================================
// Response shaping
// ============================================================================

#[test]
fn test_require_treats_null_as_missing() {
    let data = json!({"builds": {"byId": null}});
    let err = require(&data, "/builds/byId", || Error::not_found("Build", "b1")).unwrap_err();
    assert_eq!(err.to_string(), "Build not found: b1");

    let data = json!({"builds": {"byId": {"id": "b1"}}});
    assert_eq!(
        require(&data, "/builds/byId", || Error::NoData).unwrap(),
        json!({"id": "b1"})
    );
}

#[test_case(None, false; "absent")]
#[test_case(Some(json!(null)), false; "null")]
#[test_case(Some(json!(false)), false; "false")]
#[test_case(Some(json!(0)), false; "zero")]
#[test_case(Some(json!("")), false; "empty string")]
#[test_case(Some(json!(true)), true; "true")]
#[test_case(Some(json!({"id": "x"})), true; "object")]
#[test_case(Some(json!([])), true; "empty array")]
fn test_is_truthy(value: Option<JsonValue>, expected: bool) {
    assert_eq!(is_truthy(value.as_ref()), expected);
}

#[test]
fn test_deleted_record() {
    let data = json!({"build": {"deleteBuild": {"id": "b1"}}});
    assert_eq!(
        deleted(&data, "/build/deleteBuild", "buildId", "b1"),
        json!({"success": true, "buildId": "b1"})
    );

    let data = json!({"build": {"deleteBuild": null}});
    assert_eq!(
        deleted(&data, "/build/deleteBuild", "buildId", "b1"),
        json!({"success": false, "buildId": "b1"})
    );
}

#[test]
fn test_with_fields_merges_and_overrides() {
    assert_eq!(
        with_fields(json!({"id": "s1", "type": "OLD"}), json!({"type": "new"})),
        json!({"id": "s1", "type": "new"})
    );
    assert_eq!(
        with_fields(JsonValue::Null, json!({"buildId": "b1"})),
        json!({"buildId": "b1"})
    );
}

#[test]
fn test_rest_record_empty_body() {
    assert_eq!(rest_record(JsonValue::Null), json!({}));
    assert_eq!(rest_record(json!({"id": "u1"})), json!({"id": "u1"}));
}

#[test]
fn test_compact_keeps_falsy_values() {
    assert_eq!(
        compact(json!({"a": null, "b": "", "c": 0, "d": false})),
        json!({"b": "", "c": 0, "d": false})
    );
}

#[test]
fn test_branch_publish_record() {
    let params: branch::PublishParams = parse_params(&object(json!({
        "projectId": "@acme/app",
        "branchName": "main"
    })))
    .unwrap();

    assert_eq!(
        branch::publish(&params),
        json!({
            "projectId": "@acme/app",
            "branchName": "main",
            "message": "",
            "runtimeVersion": "",
            "note": branch::PUBLISH_NOTE,
        })
    );
}

#[test]
fn test_secret_scope_labels() {
    assert_eq!(secret::SecretScope::Build.api_type(), "BUILD");
    assert_eq!(secret::SecretScope::Update.label(), "update");
}
