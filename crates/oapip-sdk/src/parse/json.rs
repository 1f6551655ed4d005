use oapip_core::{FieldPath, StructuredIssue};
use serde_json::{json, Value};

pub fn parse_json(input: &str) -> Result<Value, Vec<StructuredIssue>> {
    serde_json::from_str::<Value>(input).map_err(|err| {
        vec![StructuredIssue::error(
            "parse_error",
            FieldPath::root(),
            format!("json parse failed: {err}"),
            "json.parse_error",
        )
        .with_related(json!({ "line": err.line(), "column": err.column() }))]
    })
}
