use crate::decode::{decode_list, invalid_field, ObjectReader};
use crate::error::OapipError;
use oapip_core::FieldPath;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Title or description, either plain text or keyed by language tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LocalizedText {
    Plain(String),
    Localized(BTreeMap<String, String>),
}

impl LocalizedText {
    /// Text for `language`, falling back to the first available translation.
    pub fn resolve(&self, language: &str) -> Option<&str> {
        match self {
            LocalizedText::Plain(text) => Some(text),
            LocalizedText::Localized(texts) => texts
                .get(language)
                .or_else(|| texts.values().next())
                .map(String::as_str),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdditionalParameter {
    pub name: String,
    pub value: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdditionalParameters {
    #[serde(flatten)]
    pub metadata: ProcessMetadata,
    pub parameters: Vec<AdditionalParameter>,
}

pub(crate) fn parse_localized(
    reader: &ObjectReader<'_>,
    key: &str,
) -> Result<Option<LocalizedText>, OapipError> {
    match reader.get(key) {
        None => Ok(None),
        Some(Value::String(text)) => Ok(Some(LocalizedText::Plain(text.clone()))),
        Some(Value::Object(_)) => Ok(reader
            .optional_string_map(key)?
            .map(LocalizedText::Localized)),
        Some(_) => Err(reader.invalid(key, format!("`{key}` must be a string or a language map"))),
    }
}

fn read_metadata(reader: &ObjectReader<'_>) -> Result<ProcessMetadata, OapipError> {
    Ok(ProcessMetadata {
        title: reader.optional_str("title")?,
        role: reader.optional_str("role")?,
        href: reader.optional_str("href")?,
    })
}

pub(crate) fn parse_metadata_list(
    reader: &ObjectReader<'_>,
) -> Result<Option<Vec<ProcessMetadata>>, OapipError> {
    decode_list(reader, "metadata", |value, path| {
        let entry = ObjectReader::new(value, path, "metadata", invalid_field)?;
        entry.reject_unknown(&["title", "role", "href"])?;
        read_metadata(&entry)
    })
}

pub(crate) fn parse_additional_parameters(
    reader: &ObjectReader<'_>,
) -> Result<Option<AdditionalParameters>, OapipError> {
    let Some(value) = reader.get("additionalParameters") else {
        return Ok(None);
    };
    let path = reader.key_path("additionalParameters");
    let entry = ObjectReader::new(value, &path, "additionalParameters", invalid_field)?;
    entry.reject_unknown(&["title", "role", "href", "parameters"])?;
    let parameters = decode_list(&entry, "parameters", parse_parameter)?
        .ok_or_else(|| entry.missing("parameters"))?;
    Ok(Some(AdditionalParameters {
        metadata: read_metadata(&entry)?,
        parameters,
    }))
}

fn parse_parameter(value: &Value, path: &FieldPath) -> Result<AdditionalParameter, OapipError> {
    let reader = ObjectReader::new(value, path, "parameter", invalid_field)?;
    reader.reject_unknown(&["name", "value"])?;
    let name = reader.required_str("name")?;
    let values = reader.optional_array("value")?.ok_or_else(|| reader.missing("value"))?;
    if values.is_empty() {
        return Err(reader.invalid("value", "`value` must hold at least one entry"));
    }
    Ok(AdditionalParameter {
        name,
        value: values.clone(),
    })
}
