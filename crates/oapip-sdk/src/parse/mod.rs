mod json;
mod yaml;

use crate::error::OapipError;
use oapip_core::StructuredIssue;
use serde_json::Value;

pub use json::parse_json;
pub use yaml::parse_yaml;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DocumentFormat {
    #[default]
    Auto,
    Json,
    Yaml,
}

/// Turns document text into a JSON value. `Auto` reads text starting with `{` or `[` as JSON.
pub fn parse_text(input: &str, format: DocumentFormat) -> Result<Value, Vec<StructuredIssue>> {
    match format {
        DocumentFormat::Auto => {
            if looks_like_json(input) {
                parse_json(input)
            } else {
                parse_yaml(input)
            }
        }
        DocumentFormat::Json => parse_json(input),
        DocumentFormat::Yaml => parse_yaml(input),
    }
}

/// Parses text and assembles it into `T`, e.g. a process description or an execution request.
pub fn parse_document<T>(input: &str, format: DocumentFormat) -> Result<T, Vec<StructuredIssue>>
where
    T: TryFrom<Value, Error = OapipError>,
{
    let value = parse_text(input, format)?;
    T::try_from(value).map_err(|err| vec![err.to_issue()])
}

fn looks_like_json(input: &str) -> bool {
    let trimmed = input.trim_start();
    trimmed.starts_with('{') || trimmed.starts_with('[')
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
