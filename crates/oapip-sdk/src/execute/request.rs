use super::resolve::{parse_format, resolve_inline_array, resolve_input_value_at, FORMAT_KEYS};
use super::value::{ExecutionInputValue, Format};
use crate::decode::{invalid_field, ObjectReader};
use crate::error::OapipError;
use crate::vocabulary::{ResponseType, TransmissionMode};
use oapip_core::FieldPath;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Values supplied for one input: a single value, or an ordered list of values
/// for inputs that accept more than one occurrence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InputEntry {
    Single(ExecutionInputValue),
    Multiple(Vec<ExecutionInputValue>),
}

impl InputEntry {
    pub fn values(&self) -> &[ExecutionInputValue] {
        match self {
            InputEntry::Single(value) => std::slice::from_ref(value),
            InputEntry::Multiple(values) => values,
        }
    }

    pub fn len(&self) -> usize {
        self.values().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
    pub transmission_mode: TransmissionMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub success_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_progress_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_uri: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct ExecutionRequest {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub inputs: BTreeMap<String, InputEntry>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, ExecutionOutput>,
    pub response: ResponseType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscriber: Option<Subscriber>,
}

impl ExecutionRequest {
    pub fn input(&self, name: &str) -> Option<&InputEntry> {
        self.inputs.get(name)
    }
}

impl TryFrom<Value> for ExecutionRequest {
    type Error = OapipError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        parse_execution_request(&value)
    }
}

pub fn parse_execution_request(raw: &Value) -> Result<ExecutionRequest, OapipError> {
    let reader = ObjectReader::new(raw, &FieldPath::root(), "execute", invalid_field)?;
    reader.reject_unknown(&["inputs", "outputs", "response", "subscriber"])?;

    let mut inputs = BTreeMap::new();
    if let Some(raw_inputs) = reader.optional_object("inputs")? {
        let base = reader.key_path("inputs");
        for (name, value) in raw_inputs {
            inputs.insert(name.clone(), resolve_input_entry(value, &base.key(name.as_str()))?);
        }
    }

    let mut outputs = BTreeMap::new();
    if let Some(raw_outputs) = reader.optional_object("outputs")? {
        let base = reader.key_path("outputs");
        for (name, value) in raw_outputs {
            outputs.insert(name.clone(), parse_output(value, &base.key(name.as_str()))?);
        }
    }

    let response = match reader.optional_str("response")? {
        Some(token) => ResponseType::parse_at(&token, &reader.key_path("response"))?,
        None => ResponseType::default(),
    };

    let subscriber = match reader.get("subscriber") {
        Some(value) => Some(parse_subscriber(value, &reader.key_path("subscriber"))?),
        None => None,
    };

    tracing::debug!(
        inputs = inputs.len(),
        outputs = outputs.len(),
        response = response.as_str(),
        "assembled execution request"
    );
    Ok(ExecutionRequest {
        inputs,
        outputs,
        response,
        subscriber,
    })
}

/// An array is one `Array` value when every element is inline; otherwise it is
/// the list of occurrences and each element resolves on its own.
pub fn resolve_input_entry(raw: &Value, path: &FieldPath) -> Result<InputEntry, OapipError> {
    let Value::Array(items) = raw else {
        return resolve_input_value_at(raw, path).map(InputEntry::Single);
    };
    if let Ok(elements) = resolve_inline_array(items, path) {
        return Ok(InputEntry::Single(ExecutionInputValue::Array(elements)));
    }
    tracing::debug!(path = %path, "array holds non-inline values; resolving each as an occurrence");
    items
        .iter()
        .enumerate()
        .map(|(index, item)| resolve_input_value_at(item, &path.index(index)))
        .collect::<Result<Vec<_>, _>>()
        .map(InputEntry::Multiple)
}

fn parse_output(raw: &Value, path: &FieldPath) -> Result<ExecutionOutput, OapipError> {
    let reader = ObjectReader::new(raw, path, "output", invalid_field)?;
    reader.reject_unknown(&["format", "transmissionMode"])?;

    let format = match reader.get("format") {
        Some(value) => {
            let format = ObjectReader::new(value, &reader.key_path("format"), "format", invalid_field)?;
            format.reject_unknown(&FORMAT_KEYS)?;
            parse_format(&format)?
        }
        None => None,
    };

    let transmission_mode = match reader.optional_str("transmissionMode")? {
        Some(token) => TransmissionMode::parse_at(&token, &reader.key_path("transmissionMode"))?,
        None => TransmissionMode::default(),
    };

    Ok(ExecutionOutput {
        format,
        transmission_mode,
    })
}

fn parse_subscriber(raw: &Value, path: &FieldPath) -> Result<Subscriber, OapipError> {
    let reader = ObjectReader::new(raw, path, "subscriber", invalid_field)?;
    reader.reject_unknown(&["successUri", "inProgressUri", "failedUri"])?;
    Ok(Subscriber {
        success_uri: reader.required_str("successUri")?,
        in_progress_uri: reader.optional_str("inProgressUri")?,
        failed_uri: reader.optional_str("failedUri")?,
    })
}

#[cfg(test)]
#[path = "request_test.rs"]
mod tests;
