use oapip_core::{FieldPath, StructuredIssue};
use oapip_sdk::{parse_text, DocumentFormat, OapipError};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Reads a JSON or YAML file into a value. Every issue carries the file in `related.file`.
pub fn read_value(path: &Path) -> Result<Value, Vec<StructuredIssue>> {
    let text = fs::read_to_string(path).map_err(|error| {
        vec![StructuredIssue::error(
            "cli_io_error",
            FieldPath::root(),
            format!("read file failed: {error}"),
            "cli.read_file_failed",
        )
        .with_related(file_related(path))]
    })?;
    parse_text(text.as_str(), format_for(path)).map_err(|issues| {
        issues
            .into_iter()
            .map(|issue| attach_issue_file(issue, path))
            .collect()
    })
}

/// Reads a file and assembles it with `assemble`.
pub fn read_document<T>(
    path: &Path,
    assemble: impl FnOnce(&Value) -> Result<T, OapipError>,
) -> Result<T, Vec<StructuredIssue>> {
    let value = read_value(path)?;
    let document = assemble(&value).map_err(|error| vec![attach_issue_file(error.to_issue(), path)])?;
    tracing::debug!(file = %path.display(), "document assembled");
    Ok(document)
}

fn format_for(path: &Path) -> DocumentFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => DocumentFormat::Json,
        Some("yaml") | Some("yml") => DocumentFormat::Yaml,
        _ => DocumentFormat::Auto,
    }
}

fn file_related(path: &Path) -> Value {
    let mut object = Map::new();
    object.insert("file".to_string(), Value::String(path.display().to_string()));
    Value::Object(object)
}

pub(crate) fn attach_issue_file(mut issue: StructuredIssue, path: &Path) -> StructuredIssue {
    let file = Value::String(path.display().to_string());
    issue.related = Some(match issue.related.take() {
        Some(Value::Object(mut object)) => {
            object.insert("file".to_string(), file);
            Value::Object(object)
        }
        Some(other) => {
            let mut object = Map::new();
            object.insert("file".to_string(), file);
            object.insert("details".to_string(), other);
            Value::Object(object)
        }
        None => file_related(path),
    });
    issue
}

#[cfg(test)]
#[path = "read_document_test.rs"]
mod tests;
