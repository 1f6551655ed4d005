use super::{parse_process_summary, ProcessSummary};
use crate::error::OapipError;
use crate::process::parse_process_description;
use crate::vocabulary::JobControlOption;
use serde_json::json;

#[test]
fn only_id_and_version_are_required() {
    let summary = parse_process_summary(&json!({ "id": "buffer", "version": "1.0.0" }))
        .expect("must parse");
    assert_eq!(summary.job_control_options, None);
    assert_eq!(summary.output_transmission, None);
    assert_eq!(
        serde_json::to_value(&summary).expect("serialize"),
        json!({ "id": "buffer", "version": "1.0.0" })
    );

    let err = parse_process_summary(&json!({ "id": "buffer" })).expect_err("must reject");
    assert!(matches!(err, OapipError::MissingRequiredField { ref field, .. } if field == "version"));
}

#[test]
fn description_projects_to_summary() {
    let description = parse_process_description(&json!({
        "id": "buffer",
        "version": "1.0.0",
        "title": "Buffer",
        "jobControlOptions": ["async-execute"],
        "outputTransmission": ["value", "reference"],
        "inputs": { "distance": { "schema": { "type": "number" } } },
        "outputs": { "result": { "schema": { "type": "object" } } }
    }))
    .expect("must parse");
    let summary = ProcessSummary::from(&description);
    assert_eq!(summary.job_control_options, Some(vec![JobControlOption::AsyncExecute]));
    assert_eq!(summary.links, None);

    let serialized = serde_json::to_value(&summary).expect("serialize");
    assert!(serialized.get("inputs").is_none());
    let reparsed: ProcessSummary = serde_json::from_value(serialized).expect("reparse");
    assert_eq!(reparsed, summary);
}

#[test]
fn summary_rejects_description_only_keys() {
    let err = parse_process_summary(&json!({
        "id": "buffer",
        "version": "1.0.0",
        "inputs": {}
    }))
    .expect_err("must reject");
    assert_eq!(err.path().to_string(), "$.inputs");
}
