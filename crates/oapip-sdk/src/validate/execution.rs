use crate::execute::{ExecutionInputValue, ExecutionRequest, InputEntry};
use crate::process::{MaxOccurs, ProcessDescription, ProcessInput};
use crate::vocabulary::ProcessIoType;
use oapip_core::{FieldPath, StructuredIssue};
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConformanceOptions {
    /// Validate inline values against the input schemas with `jsonschema`.
    pub validate_schemas: bool,
}

impl Default for ConformanceOptions {
    fn default() -> Self {
        Self {
            validate_schemas: true,
        }
    }
}

pub fn validate_execution_against_process(
    request: &ExecutionRequest,
    process: &ProcessDescription,
) -> Vec<StructuredIssue> {
    validate_execution_against_process_with_options(request, process, ConformanceOptions::default())
}

/// Collects every mismatch between a request and the process it targets.
pub fn validate_execution_against_process_with_options(
    request: &ExecutionRequest,
    process: &ProcessDescription,
    options: ConformanceOptions,
) -> Vec<StructuredIssue> {
    let mut issues = Vec::new();
    let inputs_path = FieldPath::root().key("inputs");
    let outputs_path = FieldPath::root().key("outputs");

    for (name, entry) in &request.inputs {
        let path = inputs_path.key(name.as_str());
        match process.input(name) {
            Some(input) => validate_input(entry, input, &path, options, &mut issues),
            None => issues.push(issue(
                &path,
                format!("process `{}` has no input `{name}`", process.id),
                "execute.unknown_input",
            )),
        }
    }

    for (name, input) in &process.inputs {
        if input.is_required() && !request.inputs.contains_key(name) {
            issues.push(
                issue(
                    &inputs_path.key(name.as_str()),
                    format!("input `{name}` is required"),
                    "execute.missing_input",
                )
                .with_related(json!({ "minOccurs": input.min_occurs })),
            );
        }
    }

    for (name, output) in &request.outputs {
        let path = outputs_path.key(name.as_str());
        if process.output(name).is_none() {
            issues.push(issue(
                &path,
                format!("process `{}` has no output `{name}`", process.id),
                "execute.unknown_output",
            ));
            continue;
        }
        if !process.offers_transmission(output.transmission_mode) {
            issues.push(
                issue(
                    &path.key("transmissionMode"),
                    format!(
                        "transmission mode `{}` is not offered by process `{}`",
                        output.transmission_mode, process.id
                    ),
                    "execute.transmission_mode",
                )
                .with_related(json!(process.output_transmission)),
            );
        }
    }

    tracing::debug!(
        process = %process.id,
        issues = issues.len(),
        "checked execution request against process"
    );
    StructuredIssue::sort_stable(&mut issues);
    issues
}

fn validate_input(
    entry: &InputEntry,
    input: &ProcessInput,
    path: &FieldPath,
    options: ConformanceOptions,
    issues: &mut Vec<StructuredIssue>,
) {
    let occurrences = occurrences(entry, input, path);
    let count = occurrences.len() as u64;
    if count < input.min_occurs || !input.max_occurs.admits(count) {
        let max_occurs = match input.max_occurs {
            MaxOccurs::Count(max) => json!(max),
            MaxOccurs::Unbounded => json!("unbounded"),
        };
        issues.push(
            issue(
                path,
                format!(
                    "{count} value(s) supplied, expected between {} and {max_occurs}",
                    input.min_occurs
                ),
                "execute.cardinality",
            )
            .with_related(json!({
                "count": count,
                "minOccurs": input.min_occurs,
                "maxOccurs": max_occurs,
            })),
        );
    }

    if !options.validate_schemas {
        return;
    }
    let schema = input.schema.to_json_schema();
    for (occurrence_path, value) in occurrences {
        if let Some(instance) = value.instance() {
            issues.extend(oapip_schema::validate_instance_at(&schema, &instance, &occurrence_path));
        }
    }
}

/// An array given for an input that accepts several values, and whose schema
/// is not itself an array, counts as one occurrence per element.
fn occurrences(
    entry: &InputEntry,
    input: &ProcessInput,
    path: &FieldPath,
) -> Vec<(FieldPath, ExecutionInputValue)> {
    match entry {
        InputEntry::Single(ExecutionInputValue::Array(items))
            if input.max_occurs != MaxOccurs::Count(1)
                && input.schema.schema_type != Some(ProcessIoType::Array) =>
        {
            items
                .iter()
                .enumerate()
                .map(|(index, item)| (path.index(index), item.clone().into()))
                .collect()
        }
        InputEntry::Single(value) => vec![(path.clone(), value.clone())],
        InputEntry::Multiple(values) => values
            .iter()
            .enumerate()
            .map(|(index, value)| (path.index(index), value.clone()))
            .collect(),
    }
}

fn issue(path: &FieldPath, message: impl Into<String>, reference: &str) -> StructuredIssue {
    StructuredIssue::error("conformance_error", path.clone(), message, reference)
}

#[cfg(test)]
#[path = "execution_test.rs"]
mod tests;
