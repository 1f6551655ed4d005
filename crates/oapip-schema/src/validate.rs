use jsonschema::{Draft, JSONSchema};
use oapip_core::{FieldPath, StructuredIssue};
use serde_json::Value;

/// Compiles `schema` as a draft-07 JSON Schema, reporting a compile failure as a single issue.
pub fn compile_check(schema: &Value) -> Result<(), StructuredIssue> {
    compile(schema, &FieldPath::root()).map(|_| ())
}

pub fn validate_instance(schema: &Value, instance: &Value) -> Vec<StructuredIssue> {
    validate_instance_at(schema, instance, &FieldPath::root())
}

/// Validates `instance` against `schema`; issue paths are reported relative to `base`.
pub fn validate_instance_at(
    schema: &Value,
    instance: &Value,
    base: &FieldPath,
) -> Vec<StructuredIssue> {
    let compiled = match compile(schema, base) {
        Ok(compiled) => compiled,
        Err(issue) => return vec![issue],
    };

    let mut issues = Vec::new();
    if let Err(errors) = compiled.validate(instance) {
        for error in errors {
            let relative = FieldPath::from_json_pointer(error.instance_path.to_string().as_str());
            issues.push(
                StructuredIssue::error(
                    "schema_error",
                    base.join(&relative),
                    error.to_string(),
                    "json_schema.validation",
                )
                .with_related(Value::String(error.schema_path.to_string())),
            );
        }
    }
    tracing::trace!(path = %base, issues = issues.len(), "validated instance against schema");
    StructuredIssue::sort_stable(&mut issues);
    issues
}

fn compile(schema: &Value, base: &FieldPath) -> Result<JSONSchema, StructuredIssue> {
    JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(schema)
        .map_err(|err| {
            StructuredIssue::error(
                "schema_error",
                base.clone(),
                format!("schema compile failed: {err}"),
                "json_schema.compile_failed",
            )
        })
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
