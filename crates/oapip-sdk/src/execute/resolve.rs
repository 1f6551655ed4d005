use super::value::{
    BoundingBox, ExecutionInputValue, Format, FormatSchema, InlineValue, QualifiedContent,
    QualifiedInputValue, Scalar,
};
use crate::decode::ObjectReader;
use crate::error::OapipError;
use crate::link::parse_link;
use crate::vocabulary::CRS84;
use oapip_core::FieldPath;
use serde_json::{Map, Value};

const QUALIFIED_KEYS: [&str; 5] = ["value", "format", "mediaType", "encoding", "schema"];
pub(crate) const FORMAT_KEYS: [&str; 3] = ["mediaType", "encoding", "schema"];

pub(crate) fn input_error(path: &FieldPath, _key: &str, message: String) -> OapipError {
    OapipError::input_value(path, message)
}

enum BBoxMatch {
    Absent,
    Matched(BoundingBox),
    Malformed(OapipError),
}

/// Resolves one raw input value into exactly one variant.
///
/// Candidates are tried in a fixed order and the first match wins:
/// bounding box, qualified value (`value` key), link (`href` key),
/// array of inline values, scalar. Anything else is rejected.
///
/// An object whose `bbox` holds 4 numbers is a bounding box whatever other
/// keys it carries; those keys are ignored.
pub fn resolve_input_value(raw: &Value) -> Result<ExecutionInputValue, OapipError> {
    resolve_input_value_at(raw, &FieldPath::root())
}

pub fn resolve_input_value_at(
    raw: &Value,
    path: &FieldPath,
) -> Result<ExecutionInputValue, OapipError> {
    let resolved = resolve(raw, path)?;
    tracing::trace!(path = %path, variant = resolved.variant_name(), "resolved input value");
    Ok(resolved)
}

fn resolve(raw: &Value, path: &FieldPath) -> Result<ExecutionInputValue, OapipError> {
    match raw {
        Value::Object(object) => {
            let bbox = match_bbox(object, path);
            if let BBoxMatch::Matched(bbox) = bbox {
                return Ok(ExecutionInputValue::BBox(bbox));
            }
            if object.contains_key("value") {
                return resolve_qualified(object, path).map(ExecutionInputValue::QualifiedValue);
            }
            if object.contains_key("href") {
                return parse_link(raw, path, input_error)
                    .map(ExecutionInputValue::Link)
                    .map_err(|err| as_input_error(err, path));
            }
            match bbox {
                BBoxMatch::Malformed(err) => Err(err),
                _ => Err(OapipError::input_value(
                    path,
                    "object carries none of `bbox`, `value` or `href`",
                )),
            }
        }
        Value::Array(items) => resolve_inline_array(items, path).map(ExecutionInputValue::Array),
        Value::Null => Err(OapipError::input_value(path, "null is not an input value")),
        scalar => Ok(ExecutionInputValue::Scalar(to_scalar(scalar, path)?)),
    }
}

/// A by-reference value with an unusable `href` is a malformed input value, not a missing field.
pub(crate) fn as_input_error(err: OapipError, path: &FieldPath) -> OapipError {
    match err {
        OapipError::MissingRequiredField { field, .. } => {
            OapipError::input_value(&path.key(&field), format!("`{field}` must be a string"))
        }
        other => other,
    }
}

pub(crate) fn resolve_inline_array(
    items: &[Value],
    path: &FieldPath,
) -> Result<Vec<InlineValue>, OapipError> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| resolve_inline(item, &path.index(index)))
        .collect()
}

fn resolve_inline(raw: &Value, path: &FieldPath) -> Result<InlineValue, OapipError> {
    match raw {
        Value::Object(object) => match match_bbox(object, path) {
            BBoxMatch::Matched(bbox) => Ok(InlineValue::BBox(bbox)),
            BBoxMatch::Malformed(err) => Err(err),
            BBoxMatch::Absent => Err(OapipError::input_value(
                path,
                "array elements must be bounding boxes, scalars or arrays",
            )),
        },
        Value::Array(items) => resolve_inline_array(items, path).map(InlineValue::Array),
        Value::Null => Err(OapipError::input_value(path, "null is not an input value")),
        scalar => Ok(InlineValue::Scalar(to_scalar(scalar, path)?)),
    }
}

fn to_scalar(raw: &Value, path: &FieldPath) -> Result<Scalar, OapipError> {
    match raw {
        Value::Bool(flag) => Ok(Scalar::Bool(*flag)),
        Value::Number(number) => Ok(Scalar::Number(number.clone())),
        Value::String(text) => Ok(Scalar::String(text.clone())),
        _ => Err(OapipError::input_value(path, "expected a boolean, number or string")),
    }
}

fn match_bbox(object: &Map<String, Value>, path: &FieldPath) -> BBoxMatch {
    let Some(raw_bbox) = object.get("bbox") else {
        return BBoxMatch::Absent;
    };
    let malformed = |key: &str, message: &str| {
        BBoxMatch::Malformed(OapipError::input_value(&path.key(key), message))
    };
    let corners = match raw_bbox.as_array() {
        Some(items) if items.len() == 4 => items.iter().map(Value::as_f64).collect::<Option<Vec<_>>>(),
        _ => None,
    };
    let Some(corners) = corners else {
        return malformed("bbox", "`bbox` must hold exactly 4 numbers");
    };
    let crs = match object.get("crs") {
        None | Some(Value::Null) => CRS84.to_string(),
        Some(Value::String(crs)) => crs.clone(),
        Some(_) => return malformed("crs", "`crs` must be a string"),
    };
    BBoxMatch::Matched(BoundingBox {
        bbox: [corners[0], corners[1], corners[2], corners[3]],
        crs,
    })
}

fn resolve_qualified(
    object: &Map<String, Value>,
    path: &FieldPath,
) -> Result<QualifiedInputValue, OapipError> {
    let reader = ObjectReader::from_map(object, path, input_error);
    reader.reject_unknown(&QUALIFIED_KEYS)?;

    let value_path = reader.key_path("value");
    let value = match reader.get("value") {
        None => return Err(OapipError::input_value(&value_path, "`value` must not be null")),
        Some(Value::Object(inner)) => match match_bbox(inner, &value_path) {
            BBoxMatch::Matched(bbox) => QualifiedContent::Inline(InlineValue::BBox(bbox)),
            _ => QualifiedContent::Object(inner.clone()),
        },
        Some(inner) => QualifiedContent::Inline(resolve_inline(inner, &value_path)?),
    };

    let nested = match reader.optional_object("format")? {
        Some(format) => {
            let format = ObjectReader::from_map(format, &reader.key_path("format"), input_error);
            format.reject_unknown(&FORMAT_KEYS)?;
            parse_format(&format)?
        }
        None => None,
    };
    let inline = parse_format(&reader)?;
    let format = match (nested, inline) {
        (Some(_), Some(_)) => {
            return Err(OapipError::input_value(
                path,
                "give the format either as a `format` object or as inline keys, not both",
            ))
        }
        (nested, inline) => nested.or(inline),
    };

    Ok(QualifiedInputValue { value, format })
}

/// Reads the format keys from `reader`; `None` when none of them is present.
pub(crate) fn parse_format(reader: &ObjectReader<'_>) -> Result<Option<Format>, OapipError> {
    let schema = match reader.get("schema") {
        None => None,
        Some(Value::String(reference)) => Some(FormatSchema::Reference(reference.clone())),
        Some(Value::Object(inline)) => Some(FormatSchema::Inline(inline.clone())),
        Some(_) => {
            return Err(reader.invalid("schema", "`schema` must be a reference string or an object"))
        }
    };
    let format = Format {
        media_type: reader.optional_str("mediaType")?,
        encoding: reader.optional_str("encoding")?,
        schema,
    };
    if format == Format::default() {
        return Ok(None);
    }
    Ok(Some(format))
}

#[cfg(test)]
#[path = "resolve_test.rs"]
mod tests;
