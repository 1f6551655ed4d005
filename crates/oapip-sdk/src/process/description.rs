use super::metadata::{
    parse_additional_parameters, parse_localized, parse_metadata_list, AdditionalParameters,
    LocalizedText, ProcessMetadata,
};
use crate::decode::{invalid_field, ObjectReader};
use crate::error::OapipError;
use crate::link::{parse_links, Link};
use crate::schema::{parse_schema_node_with_options, SchemaNode, SchemaParseOptions};
use crate::vocabulary::{JobControlOption, TransmissionMode};
use oapip_core::FieldPath;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxOccurs {
    Count(u64),
    Unbounded,
}

impl MaxOccurs {
    pub fn admits(self, count: u64) -> bool {
        match self {
            MaxOccurs::Count(max) => count <= max,
            MaxOccurs::Unbounded => true,
        }
    }
}

impl Default for MaxOccurs {
    fn default() -> Self {
        MaxOccurs::Count(1)
    }
}

impl Serialize for MaxOccurs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MaxOccurs::Count(count) => serializer.serialize_u64(*count),
            MaxOccurs::Unbounded => serializer.serialize_str("unbounded"),
        }
    }
}

/// Descriptive fields shared by process inputs and outputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IoDescription {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Vec<ProcessMetadata>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_parameters: Option<AdditionalParameters>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessOutput {
    #[serde(flatten)]
    pub info: IoDescription,
    pub schema: SchemaNode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInput {
    #[serde(flatten)]
    pub info: IoDescription,
    pub schema: SchemaNode,
    pub min_occurs: u64,
    pub max_occurs: MaxOccurs,
}

impl ProcessInput {
    pub fn is_required(&self) -> bool {
        self.min_occurs > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "Value")]
pub struct ProcessDescription {
    pub id: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<LocalizedText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<LocalizedText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Vec<ProcessMetadata>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_parameters: Option<AdditionalParameters>,
    pub job_control_options: Vec<JobControlOption>,
    pub output_transmission: Vec<TransmissionMode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
    pub inputs: BTreeMap<String, ProcessInput>,
    pub outputs: BTreeMap<String, ProcessOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Map<String, Value>>,
}

impl ProcessDescription {
    pub fn input(&self, name: &str) -> Option<&ProcessInput> {
        self.inputs.get(name)
    }

    pub fn output(&self, name: &str) -> Option<&ProcessOutput> {
        self.outputs.get(name)
    }

    pub fn supports(&self, option: JobControlOption) -> bool {
        self.job_control_options.contains(&option)
    }

    pub fn offers_transmission(&self, mode: TransmissionMode) -> bool {
        self.output_transmission.contains(&mode)
    }
}

impl TryFrom<Value> for ProcessDescription {
    type Error = OapipError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        parse_process_description(&value)
    }
}

const PROCESS_KEYS: [&str; 13] = [
    "id",
    "version",
    "title",
    "description",
    "keywords",
    "metadata",
    "additionalParameters",
    "jobControlOptions",
    "outputTransmission",
    "links",
    "inputs",
    "outputs",
    "example",
];

const IO_KEYS: [&str; 6] = [
    "title",
    "description",
    "keywords",
    "metadata",
    "additionalParameters",
    "schema",
];

pub fn parse_process_description(raw: &Value) -> Result<ProcessDescription, OapipError> {
    parse_process_description_with_options(raw, &SchemaParseOptions::default())
}

/// Like [`parse_process_description`]; `options.max_depth` bounds every input and output schema.
pub fn parse_process_description_with_options(
    raw: &Value,
    options: &SchemaParseOptions,
) -> Result<ProcessDescription, OapipError> {
    let reader = ObjectReader::new(raw, &FieldPath::root(), "process", invalid_field)?;
    reader.reject_unknown(&PROCESS_KEYS)?;

    let id = reader.required_str("id")?;
    let version = reader.required_str("version")?;

    let job_control_options =
        parse_token_list(&reader, "jobControlOptions", JobControlOption::parse_at)?
            .ok_or_else(|| reader.missing("jobControlOptions"))?;
    if job_control_options.is_empty() {
        return Err(reader.invalid(
            "jobControlOptions",
            "at least one job control option is required",
        ));
    }
    let output_transmission =
        parse_token_list(&reader, "outputTransmission", TransmissionMode::parse_at)?
            .unwrap_or_else(|| vec![TransmissionMode::Value]);
    if output_transmission.is_empty() {
        return Err(reader.invalid(
            "outputTransmission",
            "at least one transmission mode is required",
        ));
    }

    let mut inputs = BTreeMap::new();
    if let Some(raw_inputs) = reader.optional_object("inputs")? {
        let base = reader.key_path("inputs");
        for (name, value) in raw_inputs {
            inputs.insert(name.clone(), parse_input(value, &base.key(name.as_str()), options)?);
        }
    }
    let mut outputs = BTreeMap::new();
    if let Some(raw_outputs) = reader.optional_object("outputs")? {
        let base = reader.key_path("outputs");
        for (name, value) in raw_outputs {
            outputs.insert(name.clone(), parse_output(value, &base.key(name.as_str()), options)?);
        }
    }

    let description = ProcessDescription {
        id,
        version,
        title: parse_localized(&reader, "title")?,
        description: parse_localized(&reader, "description")?,
        keywords: reader.optional_string_list("keywords")?,
        metadata: parse_metadata_list(&reader)?,
        additional_parameters: parse_additional_parameters(&reader)?,
        job_control_options,
        output_transmission,
        links: parse_links(&reader)?.unwrap_or_default(),
        inputs,
        outputs,
        example: reader.optional_object("example")?.cloned(),
    };
    tracing::debug!(
        process = %description.id,
        version = %description.version,
        inputs = description.inputs.len(),
        outputs = description.outputs.len(),
        "assembled process description"
    );
    Ok(description)
}

/// Reads an optional list of vocabulary tokens, rejecting repeats.
pub(crate) fn parse_token_list<T: PartialEq>(
    reader: &ObjectReader<'_>,
    key: &str,
    parse: fn(&str, &FieldPath) -> Result<T, OapipError>,
) -> Result<Option<Vec<T>>, OapipError> {
    let Some(tokens) = reader.optional_string_list(key)? else {
        return Ok(None);
    };
    let base = reader.key_path(key);
    let mut seen = BTreeSet::new();
    let mut out = Vec::with_capacity(tokens.len());
    for (index, token) in tokens.iter().enumerate() {
        let path = base.index(index);
        let parsed = parse(token, &path)?;
        if !seen.insert(token.as_str()) {
            return Err(OapipError::invalid(&path, key, format!("duplicate entry `{token}`")));
        }
        out.push(parsed);
    }
    Ok(Some(out))
}

fn parse_io_description(reader: &ObjectReader<'_>) -> Result<IoDescription, OapipError> {
    Ok(IoDescription {
        title: reader.optional_str("title")?,
        description: reader.optional_str("description")?,
        keywords: reader.optional_string_list("keywords")?,
        metadata: parse_metadata_list(reader)?,
        additional_parameters: parse_additional_parameters(reader)?,
    })
}

fn parse_io_schema(
    reader: &ObjectReader<'_>,
    options: &SchemaParseOptions,
) -> Result<SchemaNode, OapipError> {
    let raw = reader.get("schema").ok_or_else(|| reader.missing("schema"))?;
    let options = SchemaParseOptions {
        max_depth: options.max_depth,
        base_path: reader.key_path("schema"),
    };
    parse_schema_node_with_options(raw, &options)
}

fn parse_output(
    raw: &Value,
    path: &FieldPath,
    options: &SchemaParseOptions,
) -> Result<ProcessOutput, OapipError> {
    let reader = ObjectReader::new(raw, path, "output", invalid_field)?;
    reader.reject_unknown(&IO_KEYS)?;
    Ok(ProcessOutput {
        info: parse_io_description(&reader)?,
        schema: parse_io_schema(&reader, options)?,
    })
}

fn parse_input(
    raw: &Value,
    path: &FieldPath,
    options: &SchemaParseOptions,
) -> Result<ProcessInput, OapipError> {
    let reader = ObjectReader::new(raw, path, "input", invalid_field)?;
    let mut known = IO_KEYS.to_vec();
    known.extend(["minOccurs", "maxOccurs"]);
    reader.reject_unknown(&known)?;

    let min_occurs = reader.optional_u64("minOccurs")?.unwrap_or(1);
    let max_occurs = match reader.get("maxOccurs") {
        None => MaxOccurs::default(),
        Some(Value::String(token)) if token == "unbounded" => MaxOccurs::Unbounded,
        Some(Value::Number(number)) => match number.as_u64() {
            Some(count) if count > 0 => MaxOccurs::Count(count),
            _ => {
                return Err(reader.invalid(
                    "maxOccurs",
                    format!("`maxOccurs` must be a positive integer, got {number}"),
                ))
            }
        },
        Some(_) => {
            return Err(reader.invalid(
                "maxOccurs",
                "`maxOccurs` must be a positive integer or \"unbounded\"",
            ))
        }
    };
    if !max_occurs.admits(min_occurs) {
        return Err(reader.invalid(
            "minOccurs",
            format!(
                "minOccurs ({min_occurs}) must not exceed maxOccurs ({})",
                max_occurs_label(max_occurs)
            ),
        ));
    }

    Ok(ProcessInput {
        info: parse_io_description(&reader)?,
        schema: parse_io_schema(&reader, options)?,
        min_occurs,
        max_occurs,
    })
}

fn max_occurs_label(max_occurs: MaxOccurs) -> String {
    match max_occurs {
        MaxOccurs::Count(count) => count.to_string(),
        MaxOccurs::Unbounded => "unbounded".to_string(),
    }
}

#[cfg(test)]
#[path = "description_test.rs"]
mod tests;
