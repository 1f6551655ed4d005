use crate::vocabulary::{ProcessIoFormat, ProcessIoType};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// Wire keyword → semantic field name, for every keyword a schema fragment may carry.
pub const SCHEMA_KEYWORDS: &[(&str, &str)] = &[
    ("title", "title"),
    ("description", "description"),
    ("default", "default"),
    ("example", "example"),
    ("deprecated", "deprecated"),
    ("nullable", "nullable"),
    ("readOnly", "read_only"),
    ("writeOnly", "write_only"),
    ("multipleOf", "multiple_of"),
    ("minimum", "minimum"),
    ("maximum", "maximum"),
    ("exclusiveMinimum", "exclusive_minimum"),
    ("exclusiveMaximum", "exclusive_maximum"),
    ("minLength", "min_length"),
    ("maxLength", "max_length"),
    ("pattern", "pattern"),
    ("contentMediaType", "content_media_type"),
    ("contentEncoding", "content_encoding"),
    ("contentSchema", "content_schema"),
    ("minItems", "min_items"),
    ("maxItems", "max_items"),
    ("uniqueItems", "unique_items"),
    ("minProperties", "min_properties"),
    ("maxProperties", "max_properties"),
    ("required", "required"),
    ("properties", "properties"),
    ("additionalProperties", "additional_properties"),
    ("enum", "enum"),
    ("type", "type"),
    ("format", "format"),
    ("not", "not"),
    ("allOf", "all_of"),
    ("oneOf", "one_of"),
    ("anyOf", "any_of"),
    ("items", "items"),
    ("$ref", "reference"),
];

pub fn semantic_field(wire_key: &str) -> Option<&'static str> {
    SCHEMA_KEYWORDS
        .iter()
        .find(|(wire, _)| *wire == wire_key)
        .map(|(_, semantic)| *semantic)
}

/// One JSON-Schema-like constraint set, as used by process inputs and outputs.
///
/// Built through [`crate::schema::parse_schema_node`]; the `Deserialize` impl
/// goes through the same validation. Serializing reproduces the camelCase
/// keywords that were present, leaving out fields that hold their default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "Value")]
pub struct SchemaNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(skip_serializing_if = "is_false")]
    pub deprecated: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub nullable: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub read_only: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub write_only: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,
    #[serde(skip_serializing_if = "is_false")]
    pub exclusive_minimum: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub exclusive_maximum: bool,

    #[serde(skip_serializing_if = "is_zero")]
    pub min_length: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_schema: Option<String>,

    #[serde(skip_serializing_if = "is_zero")]
    pub min_items: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    #[serde(skip_serializing_if = "is_false")]
    pub unique_items: bool,

    #[serde(skip_serializing_if = "is_zero")]
    pub min_properties: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, SchemaNode>>,
    #[serde(skip_serializing_if = "AdditionalProperties::is_default")]
    pub additional_properties: AdditionalProperties,

    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<ProcessIoType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ProcessIoFormat>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<SchemaNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<SchemaNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<SchemaNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<SchemaNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<SchemaItems>,

    /// `$ref` target, kept as written; references are not resolved.
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SchemaItems {
    Single(Box<SchemaNode>),
    Tuple(Vec<SchemaNode>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Allowed(bool),
    Schema(Box<SchemaNode>),
}

impl Default for AdditionalProperties {
    fn default() -> Self {
        AdditionalProperties::Allowed(true)
    }
}

impl AdditionalProperties {
    pub fn is_default(&self) -> bool {
        matches!(self, AdditionalProperties::Allowed(true))
    }
}

impl SchemaItems {
    pub fn nodes(&self) -> &[SchemaNode] {
        match self {
            SchemaItems::Single(node) => std::slice::from_ref(node.as_ref()),
            SchemaItems::Tuple(nodes) => nodes,
        }
    }
}

impl SchemaNode {
    /// Direct subschemas in keyword order: not, allOf, oneOf, anyOf, items, properties, additionalProperties.
    pub fn children(&self) -> Vec<&SchemaNode> {
        let mut out: Vec<&SchemaNode> = Vec::new();
        out.extend(self.not.as_deref());
        for list in [&self.all_of, &self.one_of, &self.any_of] {
            out.extend(list.iter().flatten());
        }
        out.extend(self.items.iter().flat_map(|items| items.nodes()));
        out.extend(self.properties.iter().flat_map(|properties| properties.values()));
        if let AdditionalProperties::Schema(node) = &self.additional_properties {
            out.push(node.as_ref());
        }
        out
    }

    /// Longest chain of nested subschemas below this node (a leaf has depth 0).
    pub fn depth(&self) -> usize {
        self.children()
            .into_iter()
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn is_required_property(&self, name: &str) -> bool {
        self.required
            .as_ref()
            .is_some_and(|required| required.iter().any(|entry| entry == name))
    }
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

fn is_zero(count: &u64) -> bool {
    *count == 0
}
