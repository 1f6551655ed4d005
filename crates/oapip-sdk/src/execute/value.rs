use crate::link::Link;
use crate::vocabulary::CRS84;
use serde::Serialize;
use serde_json::{json, Map, Number, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundingBox {
    pub bbox: [f64; 4],
    pub crs: String,
}

impl BoundingBox {
    pub fn new(bbox: [f64; 4]) -> Self {
        Self {
            bbox,
            crs: CRS84.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(Number),
    String(String),
}

/// Values that may appear inline, without an object wrapper (`inputValueNoObject`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InlineValue {
    BBox(BoundingBox),
    Scalar(Scalar),
    Array(Vec<InlineValue>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QualifiedContent {
    Inline(InlineValue),
    /// Structured object with no discriminator of its own, e.g. a GeoJSON feature.
    Object(Map<String, Value>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FormatSchema {
    Reference(String),
    Inline(Map<String, Value>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Format {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<FormatSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualifiedInputValue {
    pub value: QualifiedContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
}

/// One resolved execution input value. Variants are mutually exclusive; see
/// [`crate::execute::resolve_input_value`] for the order in which they are tried.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExecutionInputValue {
    BBox(BoundingBox),
    Scalar(Scalar),
    Array(Vec<InlineValue>),
    QualifiedValue(QualifiedInputValue),
    Link(Link),
}

impl Scalar {
    pub fn to_value(&self) -> Value {
        match self {
            Scalar::Bool(flag) => Value::Bool(*flag),
            Scalar::Number(number) => Value::Number(number.clone()),
            Scalar::String(text) => Value::String(text.clone()),
        }
    }
}

impl BoundingBox {
    pub fn to_value(&self) -> Value {
        json!({ "bbox": self.bbox, "crs": self.crs })
    }
}

impl InlineValue {
    pub fn to_value(&self) -> Value {
        match self {
            InlineValue::BBox(bbox) => bbox.to_value(),
            InlineValue::Scalar(scalar) => scalar.to_value(),
            InlineValue::Array(items) => Value::Array(items.iter().map(InlineValue::to_value).collect()),
        }
    }

    /// Nesting depth of arrays; a bbox or scalar has depth 0.
    pub fn array_depth(&self) -> usize {
        match self {
            InlineValue::Array(items) => 1 + items.iter().map(InlineValue::array_depth).max().unwrap_or(0),
            _ => 0,
        }
    }
}

impl From<InlineValue> for ExecutionInputValue {
    fn from(value: InlineValue) -> Self {
        match value {
            InlineValue::BBox(bbox) => ExecutionInputValue::BBox(bbox),
            InlineValue::Scalar(scalar) => ExecutionInputValue::Scalar(scalar),
            InlineValue::Array(items) => ExecutionInputValue::Array(items),
        }
    }
}

impl ExecutionInputValue {
    pub fn variant_name(&self) -> &'static str {
        match self {
            ExecutionInputValue::BBox(_) => "bbox",
            ExecutionInputValue::Scalar(_) => "scalar",
            ExecutionInputValue::Array(_) => "array",
            ExecutionInputValue::QualifiedValue(_) => "qualified_value",
            ExecutionInputValue::Link(_) => "link",
        }
    }

    /// The concrete JSON the process would receive, or `None` for values passed by reference.
    pub fn instance(&self) -> Option<Value> {
        match self {
            ExecutionInputValue::BBox(bbox) => Some(bbox.to_value()),
            ExecutionInputValue::Scalar(scalar) => Some(scalar.to_value()),
            ExecutionInputValue::Array(items) => {
                Some(Value::Array(items.iter().map(InlineValue::to_value).collect()))
            }
            ExecutionInputValue::QualifiedValue(qualified) => Some(match &qualified.value {
                QualifiedContent::Inline(inline) => inline.to_value(),
                QualifiedContent::Object(object) => Value::Object(object.clone()),
            }),
            ExecutionInputValue::Link(_) => None,
        }
    }
}
