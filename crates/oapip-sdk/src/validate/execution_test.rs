use super::{
    validate_execution_against_process, validate_execution_against_process_with_options,
    ConformanceOptions,
};
use crate::execute::parse_execution_request;
use crate::process::{parse_process_description, ProcessDescription};
use oapip_core::StructuredIssue;
use serde_json::{json, Value};

fn buffer_process() -> ProcessDescription {
    parse_process_description(&json!({
        "id": "buffer",
        "version": "1.0.0",
        "jobControlOptions": ["async-execute"],
        "outputTransmission": ["value"],
        "inputs": {
            "distance": {
                "schema": { "type": "number", "minimum": 0, "exclusiveMinimum": true }
            },
            "layers": {
                "schema": { "type": "string", "enum": ["roads", "rivers", "rail"] },
                "minOccurs": 1,
                "maxOccurs": 2
            },
            "dem": {
                "schema": { "type": "string", "contentMediaType": "image/tiff" },
                "minOccurs": 0
            }
        },
        "outputs": {
            "result": { "schema": { "type": "object" } }
        }
    }))
    .expect("fixture must parse")
}

fn check(request: Value) -> Vec<StructuredIssue> {
    let request = parse_execution_request(&request).expect("request must parse");
    validate_execution_against_process(&request, &buffer_process())
}

fn has_issue(issues: &[StructuredIssue], reference: &str, path: &str) -> bool {
    issues.iter().any(|issue| {
        issue.reference.as_deref() == Some(reference) && issue.field_path.to_string() == path
    })
}

#[test]
fn conforming_request_has_no_issues() {
    let issues = check(json!({
        "inputs": {
            "distance": 12.5,
            "layers": ["roads", "rivers"],
            "dem": { "href": "https://example.org/dem.tif" }
        },
        "outputs": { "result": { "transmissionMode": "value" } }
    }));
    assert!(issues.is_empty(), "unexpected issues: {issues:?}");
}

#[test]
fn unknown_and_missing_inputs() {
    let issues = check(json!({ "inputs": { "distance": 1, "radius": 4 } }));
    assert!(has_issue(&issues, "execute.unknown_input", "$.inputs.radius"));
    assert!(has_issue(&issues, "execute.missing_input", "$.inputs.layers"));
    assert!(!has_issue(&issues, "execute.missing_input", "$.inputs.dem"));
}

#[test]
fn cardinality_is_enforced() {
    let issues = check(json!({
        "inputs": { "distance": 1, "layers": ["roads", "rivers", "rail"] }
    }));
    assert!(has_issue(&issues, "execute.cardinality", "$.inputs.layers"));

    let issues = check(json!({
        "inputs": { "distance": [1, 2], "layers": "roads" }
    }));
    assert!(has_issue(&issues, "json_schema.validation", "$.inputs.distance"));
}

#[test]
fn schema_violations_point_at_the_occurrence() {
    let issues = check(json!({
        "inputs": { "distance": 0, "layers": ["roads", "lakes"] }
    }));
    assert!(has_issue(&issues, "json_schema.validation", "$.inputs.distance"));
    assert!(has_issue(&issues, "json_schema.validation", "$.inputs.layers[1]"));
    assert!(!has_issue(&issues, "json_schema.validation", "$.inputs.layers[0]"));
}

#[test]
fn qualified_values_are_validated_and_links_skipped() {
    let issues = check(json!({
        "inputs": {
            "distance": { "value": -3, "mediaType": "text/plain" },
            "layers": [{ "href": "https://example.org/layers/1" }, { "value": "rail" }]
        }
    }));
    assert_eq!(issues.len(), 1, "unexpected issues: {issues:?}");
    assert!(has_issue(&issues, "json_schema.validation", "$.inputs.distance"));
}

#[test]
fn schema_checks_can_be_disabled() {
    let request = parse_execution_request(&json!({
        "inputs": { "distance": -1, "layers": "lakes" }
    }))
    .expect("request must parse");
    let issues = validate_execution_against_process_with_options(
        &request,
        &buffer_process(),
        ConformanceOptions {
            validate_schemas: false,
        },
    );
    assert!(issues.is_empty());
}

#[test]
fn outputs_and_transmission_modes() {
    let issues = check(json!({
        "inputs": { "distance": 1, "layers": "roads" },
        "outputs": {
            "result": { "transmissionMode": "reference" },
            "preview": {}
        }
    }));
    assert!(has_issue(&issues, "execute.transmission_mode", "$.outputs.result.transmissionMode"));
    assert!(has_issue(&issues, "execute.unknown_output", "$.outputs.preview"));
}

#[test]
fn issues_are_sorted_stably() {
    let request = json!({ "inputs": { "zeta": 1, "alpha": 2 } });
    let first = check(request.clone());
    let mut resorted = first.clone();
    StructuredIssue::sort_stable(&mut resorted);
    assert_eq!(first, resorted);
    assert_eq!(first, check(request));
}
