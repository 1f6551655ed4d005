use oapip_core::{FieldPath, StructuredIssue};
use oapip_sdk::{ConformanceOptions, SchemaParseOptions, DEFAULT_MAX_SCHEMA_DEPTH};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CLI_CONFIG_SCHEMA: &str = "oapip-cli/0.0.1";
const MAX_SCHEMA_DEPTH_LIMIT: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default = "default_cli_schema")]
    pub schema: String,
    #[serde(default = "default_max_schema_depth")]
    pub max_schema_depth: usize,
    #[serde(default = "default_validate_input_schemas")]
    pub validate_input_schemas: bool,
    /// Job manager the documents are destined for. No command talks to it; the
    /// section is checked for shape and reported in the debug log.
    #[serde(default)]
    pub manager: Option<ProcessManagerConfig>,
}

/// Job manager wiring as declared in a pygeoapi-style server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessManagerConfig {
    pub name: String,
    pub connection: String,
    pub output_dir: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            schema: default_cli_schema(),
            max_schema_depth: default_max_schema_depth(),
            validate_input_schemas: default_validate_input_schemas(),
            manager: None,
        }
    }
}

impl CliConfig {
    pub fn schema_options(&self) -> SchemaParseOptions {
        SchemaParseOptions {
            max_depth: self.max_schema_depth,
            ..SchemaParseOptions::default()
        }
    }

    pub fn conformance_options(&self) -> ConformanceOptions {
        ConformanceOptions {
            validate_schemas: self.validate_input_schemas,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("read config failed `{path}`: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("config parse failed: {0}")]
    Parse(String),
    #[error("config validation failed:\n{}", render_issues(.0))]
    Validation(Vec<StructuredIssue>),
}

pub fn load_cli_config(path: &Path) -> Result<CliConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;
    let expanded = expand_env_placeholders(raw.as_str()).map_err(ConfigError::Parse)?;
    let config: CliConfig = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(expanded.as_str())
            .map_err(|error| ConfigError::Parse(format!("json decode error: {error}")))?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(expanded.as_str())
            .map_err(|error| ConfigError::Parse(format!("yaml decode error: {error}")))?,
        _ => serde_yaml::from_str(expanded.as_str())
            .or_else(|_| serde_json::from_str(expanded.as_str()))
            .map_err(|error| ConfigError::Parse(error.to_string()))?,
    };

    let mut issues = validate_cli_config(&config);
    StructuredIssue::sort_stable(&mut issues);
    if !issues.is_empty() {
        return Err(ConfigError::Validation(issues));
    }
    tracing::debug!(path = %path.display(), "loaded cli config");
    Ok(config)
}

pub fn validate_cli_config(config: &CliConfig) -> Vec<StructuredIssue> {
    let mut issues = Vec::new();
    let root = FieldPath::root();

    if config.schema != CLI_CONFIG_SCHEMA {
        issues.push(config_issue(
            "cli.config.schema",
            root.key("schema"),
            format!(
                "unsupported config schema `{}` (expected `{CLI_CONFIG_SCHEMA}`)",
                config.schema
            ),
        ));
    }
    if !(1..=MAX_SCHEMA_DEPTH_LIMIT).contains(&config.max_schema_depth) {
        issues.push(config_issue(
            "cli.config.max_schema_depth.range",
            root.key("max_schema_depth"),
            format!(
                "max_schema_depth must be within 1..={MAX_SCHEMA_DEPTH_LIMIT}, got {}",
                config.max_schema_depth
            ),
        ));
    }

    if let Some(manager) = &config.manager {
        let path = root.key("manager");
        for (field, value) in [
            ("name", &manager.name),
            ("connection", &manager.connection),
            ("output_dir", &manager.output_dir),
        ] {
            if value.trim().is_empty() {
                issues.push(config_issue(
                    "cli.config.manager.non_empty",
                    path.key(field),
                    format!("manager {field} must not be empty"),
                ));
            }
        }
    }

    issues
}

pub(crate) fn render_issues(issues: &[StructuredIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("  {issue}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn config_issue(reference: &str, path: FieldPath, message: String) -> StructuredIssue {
    StructuredIssue::error("cli_config_error", path, message, reference)
}

fn default_cli_schema() -> String {
    CLI_CONFIG_SCHEMA.to_string()
}

fn default_max_schema_depth() -> usize {
    DEFAULT_MAX_SCHEMA_DEPTH
}

fn default_validate_input_schemas() -> bool {
    true
}

fn expand_env_placeholders(input: &str) -> Result<String, String> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find('}')
            .ok_or_else(|| "unterminated env placeholder `${...`".to_string())?;
        let key = &after[..end];
        if key.is_empty() {
            return Err("empty env placeholder `${}`".to_string());
        }
        let value = std::env::var(key)
            .map_err(|_| format!("missing env var for placeholder `${{{key}}}`"))?;
        out.push_str(value.as_str());
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
