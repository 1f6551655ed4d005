use super::{execute_execute, execute_process, execute_schema, execute_status, run, CliError};
use crate::cli::{
    Cli, Commands, ExecuteCommand, OutputFormat, ProcessCommand, SchemaCommand, StatusCommand,
};
use crate::config::CliConfig;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

const BUFFER_PROCESS: &str = r#"
id: buffer
version: 1.2.0
title: Buffer features
jobControlOptions: [sync-execute, async-execute]
outputTransmission: [value]
inputs:
  distance:
    schema:
      type: number
      minimum: 0
  layers:
    schema:
      type: string
      enum: [roads, rivers]
    minOccurs: 1
    maxOccurs: unbounded
outputs:
  result:
    schema:
      type: object
"#;

#[test]
fn schema_text_prints_normalized_yaml() {
    let path = write_temp_file("schema", "yaml", "type: string\nmaxLength: 8\n");
    let output = execute_schema(
        &SchemaCommand { file: path },
        &CliConfig::default(),
        OutputFormat::Text,
    )
    .expect("schema must validate");
    assert!(output.contains("type: string"));
    assert!(output.contains("maxLength: 8"));
}

#[test]
fn schema_respects_configured_depth() {
    let path = write_temp_file(
        "schema-deep",
        "json",
        r#"{ "type": "array", "items": { "type": "array", "items": { "type": "string" } } }"#,
    );
    let config = CliConfig {
        max_schema_depth: 1,
        ..CliConfig::default()
    };
    let error = execute_schema(&SchemaCommand { file: path }, &config, OutputFormat::Json)
        .expect_err("must exceed depth");
    assert!(matches!(error, CliError::Document { .. }));
    assert_eq!(error.issues().len(), 1);
}

#[test]
fn process_json_and_summary() {
    let path = write_temp_file("process", "yaml", BUFFER_PROCESS);
    let full = execute_process(
        &ProcessCommand {
            file: path.clone(),
            summary: false,
        },
        &CliConfig::default(),
        OutputFormat::Json,
    )
    .expect("process must parse");
    let full: Value = serde_json::from_str(full.as_str()).expect("must be valid json");
    assert_eq!(full["inputs"]["layers"]["maxOccurs"], "unbounded");

    let summary = execute_process(
        &ProcessCommand {
            file: path,
            summary: true,
        },
        &CliConfig::default(),
        OutputFormat::Json,
    )
    .expect("summary must render");
    let summary: Value = serde_json::from_str(summary.as_str()).expect("must be valid json");
    assert_eq!(summary["id"], "buffer");
    assert!(summary.get("inputs").is_none());
}

#[test]
fn process_text_lists_inputs() {
    let path = write_temp_file("process-text", "yaml", BUFFER_PROCESS);
    let output = execute_process(
        &ProcessCommand {
            file: path,
            summary: false,
        },
        &CliConfig::default(),
        OutputFormat::Text,
    )
    .expect("process must parse");
    assert!(output.starts_with("process buffer 1.2.0"));
    assert!(output.contains("title: Buffer features"));
    assert!(output.contains("jobControlOptions: sync-execute, async-execute"));
    assert!(output.contains("  layers [1..unbounded] string"));
}

#[test]
fn execute_checks_conformance_when_process_given() {
    let process = write_temp_file("exec-process", "yaml", BUFFER_PROCESS);
    let request = write_temp_file(
        "exec-ok",
        "json",
        r#"{ "inputs": { "distance": 5, "layers": ["roads", "rivers"] }, "response": "document" }"#,
    );
    let output = execute_execute(
        &ExecuteCommand {
            file: request,
            process: Some(process.clone()),
        },
        &CliConfig::default(),
        OutputFormat::Text,
    )
    .expect("request must conform");
    assert!(output.contains("2 input(s), 0 output(s), response document"));
    assert!(output.contains("conforms to process `buffer` 1.2.0"));

    let bad = write_temp_file(
        "exec-bad",
        "json",
        r#"{ "inputs": { "distance": -5, "radius": 1 } }"#,
    );
    let error = execute_execute(
        &ExecuteCommand {
            file: bad.clone(),
            process: Some(process),
        },
        &CliConfig::default(),
        OutputFormat::Text,
    )
    .expect_err("request must not conform");
    let references = error
        .issues()
        .iter()
        .filter_map(|issue| issue.reference.as_deref())
        .collect::<Vec<_>>();
    assert!(references.contains(&"execute.unknown_input"));
    assert!(references.contains(&"execute.missing_input"));
    assert!(references.contains(&"json_schema.validation"));
    assert!(error.issues().iter().all(|issue| {
        issue.related.as_ref().and_then(|related| related.get("file"))
            == Some(&Value::String(bad.display().to_string()))
    }));
}

#[test]
fn execute_without_process_only_resolves() {
    let request = write_temp_file(
        "exec-resolve",
        "json",
        r#"{ "inputs": { "aoi": { "bbox": [0, 0, 1, 1] }, "dem": { "href": "https://example.org/dem.tif" } } }"#,
    );
    let output = execute_execute(
        &ExecuteCommand {
            file: request,
            process: None,
        },
        &CliConfig::default(),
        OutputFormat::Json,
    )
    .expect("request must resolve");
    let parsed: Value = serde_json::from_str(output.as_str()).expect("must be valid json");
    assert_eq!(
        parsed["inputs"]["aoi"]["crs"],
        "http://www.opengis.net/def/crs/OGC/1.3/CRS84"
    );
    assert_eq!(parsed["response"], "raw");
}

#[test]
fn status_text_and_invalid_status() {
    let path = write_temp_file(
        "status",
        "json",
        r#"{ "jobID": "j-1", "processID": "buffer", "status": "running", "progress": 40 }"#,
    );
    let output = execute_status(&StatusCommand { file: path }, OutputFormat::Text)
        .expect("status must parse");
    assert!(output.starts_with("job j-1 (process `buffer`): running"));
    assert!(output.contains("progress: 40%"));

    let bad = write_temp_file(
        "status-bad",
        "json",
        r#"{ "jobID": "j-1", "processID": "buffer", "status": "paused" }"#,
    );
    let error = execute_status(&StatusCommand { file: bad }, OutputFormat::Text)
        .expect_err("unknown status must fail");
    assert_eq!(error.issues()[0].kind, "unknown_enumeration_value");
}

#[test]
fn status_text_is_one_line_per_fact() {
    let path = write_temp_file(
        "status-lines",
        "json",
        r#"{ "jobID": "j-2", "processID": "buffer", "status": "successful", "progress": 100, "message": "done" }"#,
    );
    let output = execute_status(&StatusCommand { file: path }, OutputFormat::Text)
        .expect("status must parse");
    assert_eq!(
        output,
        "job j-2 (process `buffer`): successful\nprogress: 100%\nmessage: done\nfinished: yes"
    );
}

#[test]
fn process_summary_text_stops_before_inputs() {
    let path = write_temp_file("process-summary-text", "yaml", BUFFER_PROCESS);
    let output = execute_process(
        &ProcessCommand {
            file: path,
            summary: true,
        },
        &CliConfig::default(),
        OutputFormat::Text,
    )
    .expect("process must parse");
    assert_eq!(
        output,
        "process buffer 1.2.0\ntitle: Buffer features\njobControlOptions: sync-execute, async-execute\noutputTransmission: value"
    );
}

#[test]
fn run_loads_config_before_dispatch() {
    let config = write_temp_file("run-config", "yaml", "schema: other/1\n");
    let schema = write_temp_file("run-schema", "json", r#"{ "type": "string" }"#);
    let error = run(&Cli {
        config: Some(config),
        verbose: false,
        format: OutputFormat::Text,
        command: Commands::Schema(SchemaCommand { file: schema }),
    })
    .expect_err("bad config must fail");
    assert!(matches!(error, CliError::Config(_)));
    assert!(error.to_string().contains("cli.config.schema"));
}

fn write_temp_file(prefix: &str, extension: &str, content: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time must be monotonic")
        .as_nanos();
    path.push(format!(
        "oapip-run-{prefix}-{}-{nanos}.{extension}",
        std::process::id()
    ));
    fs::write(&path, content).expect("must write temp file");
    path
}
