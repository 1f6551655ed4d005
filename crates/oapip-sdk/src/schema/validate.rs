use super::node::{semantic_field, AdditionalProperties, SchemaItems, SchemaNode, SCHEMA_KEYWORDS};
use crate::decode::ObjectReader;
use crate::error::OapipError;
use crate::vocabulary::{ProcessIoFormat, ProcessIoType};
use oapip_core::FieldPath;
use regex::Regex;
use serde_json::{Number, Value};
use std::collections::{BTreeMap, BTreeSet};

pub const DEFAULT_MAX_SCHEMA_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaParseOptions {
    /// Deepest nesting of subschemas accepted before the fragment is rejected.
    pub max_depth: usize,
    /// Location of the fragment inside the enclosing document, prefixed to error paths.
    pub base_path: FieldPath,
}

impl Default for SchemaParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_SCHEMA_DEPTH,
            base_path: FieldPath::root(),
        }
    }
}

pub fn parse_schema_node(value: &Value) -> Result<SchemaNode, OapipError> {
    parse_schema_node_with_options(value, &SchemaParseOptions::default())
}

pub fn parse_schema_node_with_options(
    value: &Value,
    options: &SchemaParseOptions,
) -> Result<SchemaNode, OapipError> {
    let node = parse_node(value, &options.base_path, 0, options)?;
    tracing::trace!(path = %options.base_path, "schema fragment accepted");
    Ok(node)
}

impl TryFrom<Value> for SchemaNode {
    type Error = OapipError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        parse_schema_node(&value)
    }
}

fn schema_field_error(path: &FieldPath, key: &str, message: String) -> OapipError {
    OapipError::schema(path, semantic_field(key).unwrap_or(key), message)
}

fn parse_node(
    value: &Value,
    path: &FieldPath,
    depth: usize,
    options: &SchemaParseOptions,
) -> Result<SchemaNode, OapipError> {
    if depth > options.max_depth {
        return Err(OapipError::schema(
            path,
            "schema",
            format!("schema nesting exceeds the limit of {} levels", options.max_depth),
        ));
    }

    let reader = ObjectReader::new(value, path, "schema", schema_field_error)?;
    let known = SCHEMA_KEYWORDS.iter().map(|(wire, _)| *wire).collect::<Vec<_>>();
    reader.reject_unknown(&known)?;

    let node = SchemaNode {
        title: reader.optional_str("title")?,
        description: reader.optional_str("description")?,
        default: reader.get_raw("default").cloned(),
        example: reader.get_raw("example").cloned(),
        deprecated: reader.optional_bool("deprecated")?.unwrap_or(false),
        nullable: reader.optional_bool("nullable")?.unwrap_or(false),
        read_only: reader.optional_bool("readOnly")?.unwrap_or(false),
        write_only: reader.optional_bool("writeOnly")?.unwrap_or(false),
        multiple_of: reader.optional_number("multipleOf")?,
        minimum: reader.optional_number("minimum")?,
        maximum: reader.optional_number("maximum")?,
        exclusive_minimum: reader.optional_bool("exclusiveMinimum")?.unwrap_or(false),
        exclusive_maximum: reader.optional_bool("exclusiveMaximum")?.unwrap_or(false),
        min_length: reader.optional_u64("minLength")?.unwrap_or(0),
        max_length: reader.optional_u64("maxLength")?,
        pattern: parse_pattern(&reader)?,
        content_media_type: reader.optional_str("contentMediaType")?,
        content_encoding: reader.optional_str("contentEncoding")?,
        content_schema: reader.optional_str("contentSchema")?,
        min_items: reader.optional_u64("minItems")?.unwrap_or(0),
        max_items: reader.optional_u64("maxItems")?,
        unique_items: reader.optional_bool("uniqueItems")?.unwrap_or(false),
        min_properties: reader.optional_u64("minProperties")?.unwrap_or(0),
        max_properties: reader.optional_u64("maxProperties")?,
        required: parse_required(&reader)?,
        properties: parse_properties(&reader, depth, options)?,
        additional_properties: parse_additional_properties(&reader, depth, options)?,
        enum_values: parse_enum(&reader)?,
        schema_type: parse_vocabulary::<ProcessIoType>(&reader, "type")?,
        format: parse_vocabulary::<ProcessIoFormat>(&reader, "format")?,
        not: match reader.get("not") {
            Some(child) => Some(Box::new(parse_node(child, &path.key("not"), depth + 1, options)?)),
            None => None,
        },
        all_of: parse_node_list(&reader, "allOf", depth, options)?,
        one_of: parse_node_list(&reader, "oneOf", depth, options)?,
        any_of: parse_node_list(&reader, "anyOf", depth, options)?,
        items: parse_items(&reader, depth, options)?,
        reference: reader.optional_str("$ref")?,
    };

    check_invariants(&node, path)?;
    Ok(node)
}

fn parse_vocabulary<T>(reader: &ObjectReader<'_>, key: &str) -> Result<Option<T>, OapipError>
where
    T: std::str::FromStr<Err = crate::vocabulary::UnknownToken>,
{
    let Some(token) = reader.optional_str(key)? else {
        return Ok(None);
    };
    token
        .parse::<T>()
        .map(Some)
        .map_err(|err| OapipError::schema(&reader.key_path(key), key, err.to_string()))
}

fn parse_pattern(reader: &ObjectReader<'_>) -> Result<Option<String>, OapipError> {
    let Some(pattern) = reader.optional_str("pattern")? else {
        return Ok(None);
    };
    Regex::new(pattern.as_str()).map_err(|err| {
        OapipError::schema(
            &reader.key_path("pattern"),
            "pattern",
            format!("pattern is not a valid regular expression: {err}"),
        )
    })?;
    Ok(Some(pattern))
}

fn parse_required(reader: &ObjectReader<'_>) -> Result<Option<Vec<String>>, OapipError> {
    let Some(required) = reader.optional_string_list("required")? else {
        return Ok(None);
    };
    let path = reader.key_path("required");
    if required.is_empty() {
        return Err(OapipError::schema(&path, "required", "required must not be empty"));
    }
    let mut seen = BTreeSet::new();
    for (index, name) in required.iter().enumerate() {
        if !seen.insert(name.as_str()) {
            return Err(OapipError::schema(
                &path.index(index),
                "required",
                format!("required entries must be unique, `{name}` repeats"),
            ));
        }
    }
    Ok(Some(required))
}

fn parse_enum(reader: &ObjectReader<'_>) -> Result<Option<Vec<Value>>, OapipError> {
    let Some(values) = reader.optional_array("enum")? else {
        return Ok(None);
    };
    if values.is_empty() {
        return Err(OapipError::schema(
            &reader.key_path("enum"),
            "enum",
            "enum must not be empty",
        ));
    }
    Ok(Some(values.clone()))
}

fn parse_node_list(
    reader: &ObjectReader<'_>,
    key: &str,
    depth: usize,
    options: &SchemaParseOptions,
) -> Result<Option<Vec<SchemaNode>>, OapipError> {
    let Some(items) = reader.optional_array(key)? else {
        return Ok(None);
    };
    let base = reader.key_path(key);
    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_node(item, &base.index(index), depth + 1, options))
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

fn parse_items(
    reader: &ObjectReader<'_>,
    depth: usize,
    options: &SchemaParseOptions,
) -> Result<Option<SchemaItems>, OapipError> {
    match reader.get("items") {
        None => Ok(None),
        Some(child @ Value::Object(_)) => {
            let node = parse_node(child, &reader.key_path("items"), depth + 1, options)?;
            Ok(Some(SchemaItems::Single(Box::new(node))))
        }
        Some(Value::Array(_)) => Ok(parse_node_list(reader, "items", depth, options)?.map(SchemaItems::Tuple)),
        Some(_) => Err(OapipError::schema(
            &reader.key_path("items"),
            "items",
            "items must be a schema or an array of schemas",
        )),
    }
}

fn parse_properties(
    reader: &ObjectReader<'_>,
    depth: usize,
    options: &SchemaParseOptions,
) -> Result<Option<BTreeMap<String, SchemaNode>>, OapipError> {
    let Some(properties) = reader.optional_object("properties")? else {
        return Ok(None);
    };
    let base = reader.key_path("properties");
    let mut out = BTreeMap::new();
    for (name, child) in properties {
        let node = parse_node(child, &base.key(name.as_str()), depth + 1, options)?;
        out.insert(name.clone(), node);
    }
    Ok(Some(out))
}

fn parse_additional_properties(
    reader: &ObjectReader<'_>,
    depth: usize,
    options: &SchemaParseOptions,
) -> Result<AdditionalProperties, OapipError> {
    match reader.get("additionalProperties") {
        None => Ok(AdditionalProperties::default()),
        Some(Value::Bool(flag)) => Ok(AdditionalProperties::Allowed(*flag)),
        Some(child @ Value::Object(_)) => {
            let path = reader.key_path("additionalProperties");
            let node = parse_node(child, &path, depth + 1, options)?;
            Ok(AdditionalProperties::Schema(Box::new(node)))
        }
        Some(_) => Err(OapipError::schema(
            &reader.key_path("additionalProperties"),
            "additional_properties",
            "additionalProperties must be a boolean or a schema",
        )),
    }
}

fn check_invariants(node: &SchemaNode, path: &FieldPath) -> Result<(), OapipError> {
    check_count_range(path, "min_length", node.min_length, "max_length", node.max_length)?;
    check_count_range(path, "min_items", node.min_items, "max_items", node.max_items)?;
    check_count_range(
        path,
        "min_properties",
        node.min_properties,
        "max_properties",
        node.max_properties,
    )?;

    if let Some(multiple_of) = &node.multiple_of {
        if as_f64(multiple_of) <= 0.0 {
            return Err(OapipError::schema(
                path,
                "multiple_of",
                format!("multiple_of must be greater than 0, got {multiple_of}"),
            ));
        }
    }

    if node.exclusive_minimum && node.minimum.is_none() {
        return Err(OapipError::schema(
            path,
            "exclusive_minimum",
            "exclusive_minimum requires minimum",
        ));
    }
    if node.exclusive_maximum && node.maximum.is_none() {
        return Err(OapipError::schema(
            path,
            "exclusive_maximum",
            "exclusive_maximum requires maximum",
        ));
    }

    if let (Some(minimum), Some(maximum)) = (&node.minimum, &node.maximum) {
        let (low, high) = (as_f64(minimum), as_f64(maximum));
        let exclusive = node.exclusive_minimum || node.exclusive_maximum;
        if low > high || (exclusive && low == high) {
            return Err(OapipError::schema(
                path,
                "minimum",
                format!("minimum ({minimum}) and maximum ({maximum}) leave no admissible value"),
            ));
        }
    }

    Ok(())
}

fn check_count_range(
    path: &FieldPath,
    min_field: &str,
    min: u64,
    max_field: &str,
    max: Option<u64>,
) -> Result<(), OapipError> {
    match max {
        Some(max) if min > max => Err(OapipError::schema(
            path,
            min_field,
            format!("{min_field} ({min}) must not exceed {max_field} ({max})"),
        )),
        _ => Ok(()),
    }
}

fn as_f64(number: &Number) -> f64 {
    number.as_f64().unwrap_or(f64::NAN)
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
