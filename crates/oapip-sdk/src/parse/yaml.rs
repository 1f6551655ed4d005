use oapip_core::{FieldPath, StructuredIssue};
use serde_json::{json, Value};

pub fn parse_yaml(input: &str) -> Result<Value, Vec<StructuredIssue>> {
    let yaml_value: serde_yaml::Value = serde_yaml::from_str(input).map_err(|err| {
        let message = err.to_string();
        let reference = if message.to_ascii_lowercase().contains("duplicate") {
            "yaml.duplicate_key"
        } else {
            "yaml.parse_error"
        };
        let mut issue = StructuredIssue::error(
            "parse_error",
            FieldPath::root(),
            format!("yaml parse failed: {message}"),
            reference,
        );
        if let Some(location) = err.location() {
            issue = issue.with_related(json!({ "line": location.line(), "column": location.column() }));
        }
        vec![issue]
    })?;

    serde_json::to_value(yaml_value).map_err(|err| {
        vec![StructuredIssue::error(
            "parse_error",
            FieldPath::root(),
            format!("yaml-to-json conversion failed: {err}"),
            "yaml.to_json_error",
        )]
    })
}
