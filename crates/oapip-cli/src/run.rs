use crate::cli::{
    Cli, Commands, ExecuteCommand, OutputFormat, ProcessCommand, SchemaCommand, StatusCommand,
};
use crate::config::{load_cli_config, render_issues, CliConfig, ConfigError};
use crate::io::{attach_issue_file, read_document};
use oapip_core::StructuredIssue;
use oapip_sdk::{
    parse_execution_request, parse_job_status_info, parse_process_description_with_options,
    parse_schema_node_with_options, validate_execution_against_process_with_options,
    ExecutionRequest, InputEntry, JobStatusInfo, LocalizedText, MaxOccurs, ProcessDescription,
};
use serde::Serialize;
use std::path::Path;

const TEXT_LANGUAGE: &str = "en";

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("config load failed: {0}")]
    Config(#[from] ConfigError),
    #[error("document `{path}` is invalid:\n{}", render_issues(.issues))]
    Document {
        path: String,
        issues: Vec<StructuredIssue>,
    },
    #[error("execution request does not conform to the process:\n{}", render_issues(.0))]
    NonConforming(Vec<StructuredIssue>),
    #[error("output encode failed: {0}")]
    Encode(String),
}

impl CliError {
    /// Issues behind the failure, if it came from a document.
    pub fn issues(&self) -> &[StructuredIssue] {
        match self {
            CliError::Config(ConfigError::Validation(issues))
            | CliError::Document { issues, .. }
            | CliError::NonConforming(issues) => issues.as_slice(),
            CliError::Config(_) | CliError::Encode(_) => &[],
        }
    }
}

pub fn run(cli: &Cli) -> Result<String, CliError> {
    let config = match &cli.config {
        Some(path) => load_cli_config(path.as_path())?,
        None => CliConfig::default(),
    };
    if let Some(manager) = &config.manager {
        tracing::debug!(
            manager = %manager.name,
            connection = %manager.connection,
            output_dir = %manager.output_dir,
            "process manager configured"
        );
    }
    match &cli.command {
        Commands::Schema(command) => execute_schema(command, &config, cli.format),
        Commands::Process(command) => execute_process(command, &config, cli.format),
        Commands::Execute(command) => execute_execute(command, &config, cli.format),
        Commands::Status(command) => execute_status(command, cli.format),
    }
}

pub fn execute_schema(
    command: &SchemaCommand,
    config: &CliConfig,
    format: OutputFormat,
) -> Result<String, CliError> {
    let options = config.schema_options();
    let node = read_document(command.file.as_path(), |value| {
        parse_schema_node_with_options(value, &options)
    })
    .map_err(|issues| document_error(command.file.as_path(), issues))?;
    match format {
        OutputFormat::Json => to_json(&node),
        OutputFormat::Text => serde_yaml::to_string(&node)
            .map(|text| text.trim_end().to_string())
            .map_err(|error| CliError::Encode(error.to_string())),
    }
}

pub fn execute_process(
    command: &ProcessCommand,
    config: &CliConfig,
    format: OutputFormat,
) -> Result<String, CliError> {
    let process = read_process(command.file.as_path(), config)?;
    match (format, command.summary) {
        (OutputFormat::Json, true) => to_json(&process.summary()),
        (OutputFormat::Json, false) => to_json(&process),
        (OutputFormat::Text, summary) => Ok(render_process_text(&process, summary)),
    }
}

pub fn execute_execute(
    command: &ExecuteCommand,
    config: &CliConfig,
    format: OutputFormat,
) -> Result<String, CliError> {
    let request = read_document(command.file.as_path(), parse_execution_request)
        .map_err(|issues| document_error(command.file.as_path(), issues))?;

    let process = match &command.process {
        Some(path) => {
            let process = read_process(path.as_path(), config)?;
            let issues = validate_execution_against_process_with_options(
                &request,
                &process,
                config.conformance_options(),
            );
            if !issues.is_empty() {
                return Err(CliError::NonConforming(
                    issues
                        .into_iter()
                        .map(|issue| attach_issue_file(issue, command.file.as_path()))
                        .collect(),
                ));
            }
            Some(process)
        }
        None => None,
    };

    match format {
        OutputFormat::Json => to_json(&request),
        OutputFormat::Text => Ok(render_request_text(&request, process.as_ref())),
    }
}

pub fn execute_status(command: &StatusCommand, format: OutputFormat) -> Result<String, CliError> {
    let status = read_document(command.file.as_path(), parse_job_status_info)
        .map_err(|issues| document_error(command.file.as_path(), issues))?;
    match format {
        OutputFormat::Json => to_json(&status),
        OutputFormat::Text => Ok(render_status_text(&status)),
    }
}

fn read_process(path: &Path, config: &CliConfig) -> Result<ProcessDescription, CliError> {
    let options = config.schema_options();
    read_document(path, |value| {
        parse_process_description_with_options(value, &options)
    })
    .map_err(|issues| document_error(path, issues))
}

fn document_error(path: &Path, issues: Vec<StructuredIssue>) -> CliError {
    CliError::Document {
        path: path.display().to_string(),
        issues,
    }
}

fn to_json(value: &impl Serialize) -> Result<String, CliError> {
    serde_json::to_string_pretty(value).map_err(|error| CliError::Encode(error.to_string()))
}

fn localized(text: Option<&LocalizedText>) -> Option<&str> {
    text.and_then(|text| text.resolve(TEXT_LANGUAGE))
}

fn join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_process_text(process: &ProcessDescription, summary_only: bool) -> String {
    let mut lines = vec![format!("process {} {}", process.id, process.version)];
    if let Some(title) = localized(process.title.as_ref()) {
        lines.push(format!("title: {title}"));
    }
    lines.push(format!("jobControlOptions: {}", join(&process.job_control_options)));
    lines.push(format!("outputTransmission: {}", join(&process.output_transmission)));
    if summary_only {
        return lines.join("\n");
    }

    lines.push(format!("inputs: {}", process.inputs.len()));
    lines.extend(process.inputs.iter().map(|(name, input)| {
        let max = match input.max_occurs {
            MaxOccurs::Count(max) => max.to_string(),
            MaxOccurs::Unbounded => "unbounded".to_string(),
        };
        let schema_type = input
            .schema
            .schema_type
            .map(|schema_type| schema_type.to_string())
            .unwrap_or_else(|| "any".to_string());
        format!("  {name} [{}..{max}] {schema_type}", input.min_occurs)
    }));
    lines.push(format!("outputs: {}", process.outputs.len()));
    lines.extend(process.outputs.keys().map(|name| format!("  {name}")));
    lines.join("\n")
}

fn render_request_text(request: &ExecutionRequest, process: Option<&ProcessDescription>) -> String {
    let mut lines = vec![format!(
        "execution request: {} input(s), {} output(s), response {}",
        request.inputs.len(),
        request.outputs.len(),
        request.response
    )];
    lines.extend(request.inputs.iter().map(|(name, entry)| {
        let kinds = entry
            .values()
            .iter()
            .map(|value| value.variant_name())
            .collect::<Vec<_>>()
            .join(", ");
        match entry {
            InputEntry::Single(_) => format!("  {name}: {kinds}"),
            InputEntry::Multiple(values) => {
                format!("  {name}: {} occurrence(s): {kinds}", values.len())
            }
        }
    }));
    lines.extend(
        request
            .outputs
            .iter()
            .map(|(name, output)| format!("  output {name}: {}", output.transmission_mode)),
    );
    if let Some(subscriber) = &request.subscriber {
        lines.push(format!("subscriber: {}", subscriber.success_uri));
    }
    if let Some(process) = process {
        lines.push(format!("conforms to process `{}` {}", process.id, process.version));
    }
    lines.join("\n")
}

fn render_status_text(status: &JobStatusInfo) -> String {
    let mut lines = vec![format!(
        "job {} ({} `{}`): {}",
        status.job_id, status.job_type, status.process_id, status.status
    )];
    if let Some(progress) = status.progress {
        lines.push(format!("progress: {progress}%"));
    }
    if let Some(message) = &status.message {
        lines.push(format!("message: {message}"));
    }
    if let Some(updated) = status.updated {
        lines.push(format!("updated: {}", updated.to_rfc3339()));
    }
    if status.is_finished() {
        lines.push("finished: yes".to_string());
    }
    lines.join("\n")
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
