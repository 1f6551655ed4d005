use super::node::{AdditionalProperties, SchemaItems, SchemaNode};
use serde_json::{json, Map, Value};

impl SchemaNode {
    /// Renders the node as a draft-07 JSON Schema that `jsonschema` can compile.
    ///
    /// OpenAPI 3.0 keywords are translated: boolean `exclusiveMinimum` /
    /// `exclusiveMaximum` become numeric bounds, `nullable` admits `null`,
    /// `example` becomes `examples`. `deprecated`, `$ref` and the OGC
    /// geometry formats carry no draft-07 meaning and are dropped.
    pub fn to_json_schema(&self) -> Value {
        let mut out = Map::new();

        insert_opt(&mut out, "title", self.title.clone().map(Value::String));
        insert_opt(&mut out, "description", self.description.clone().map(Value::String));
        insert_opt(&mut out, "default", self.default.clone());
        if let Some(example) = &self.example {
            out.insert("examples".to_string(), json!([example]));
        }
        if self.read_only {
            out.insert("readOnly".to_string(), Value::Bool(true));
        }
        if self.write_only {
            out.insert("writeOnly".to_string(), Value::Bool(true));
        }

        if let Some(schema_type) = self.schema_type {
            let rendered = if self.nullable {
                json!([schema_type.as_str(), "null"])
            } else {
                json!(schema_type.as_str())
            };
            out.insert("type".to_string(), rendered);
        }
        if let Some(format) = self.format.filter(|format| format.is_json_schema_format()) {
            out.insert("format".to_string(), json!(format.as_str()));
        }
        if let Some(values) = &self.enum_values {
            let mut values = values.clone();
            if self.nullable && !values.contains(&Value::Null) {
                values.push(Value::Null);
            }
            out.insert("enum".to_string(), Value::Array(values));
        }

        insert_opt(&mut out, "multipleOf", self.multiple_of.clone().map(Value::Number));
        if let Some(minimum) = &self.minimum {
            let key = if self.exclusive_minimum { "exclusiveMinimum" } else { "minimum" };
            out.insert(key.to_string(), Value::Number(minimum.clone()));
        }
        if let Some(maximum) = &self.maximum {
            let key = if self.exclusive_maximum { "exclusiveMaximum" } else { "maximum" };
            out.insert(key.to_string(), Value::Number(maximum.clone()));
        }

        insert_count(&mut out, "minLength", self.min_length);
        insert_opt(&mut out, "maxLength", self.max_length.map(Value::from));
        insert_opt(&mut out, "pattern", self.pattern.clone().map(Value::String));
        insert_opt(
            &mut out,
            "contentMediaType",
            self.content_media_type.clone().map(Value::String),
        );
        insert_opt(
            &mut out,
            "contentEncoding",
            self.content_encoding.clone().map(Value::String),
        );

        insert_count(&mut out, "minItems", self.min_items);
        insert_opt(&mut out, "maxItems", self.max_items.map(Value::from));
        if self.unique_items {
            out.insert("uniqueItems".to_string(), Value::Bool(true));
        }
        match &self.items {
            Some(SchemaItems::Single(node)) => {
                out.insert("items".to_string(), node.to_json_schema());
            }
            Some(SchemaItems::Tuple(nodes)) => {
                out.insert("items".to_string(), render_list(nodes));
            }
            None => {}
        }

        insert_count(&mut out, "minProperties", self.min_properties);
        insert_opt(&mut out, "maxProperties", self.max_properties.map(Value::from));
        if let Some(required) = &self.required {
            out.insert("required".to_string(), json!(required));
        }
        if let Some(properties) = &self.properties {
            let rendered = properties
                .iter()
                .map(|(name, node)| (name.clone(), node.to_json_schema()))
                .collect::<Map<_, _>>();
            out.insert("properties".to_string(), Value::Object(rendered));
        }
        match &self.additional_properties {
            AdditionalProperties::Allowed(true) => {}
            AdditionalProperties::Allowed(false) => {
                out.insert("additionalProperties".to_string(), Value::Bool(false));
            }
            AdditionalProperties::Schema(node) => {
                out.insert("additionalProperties".to_string(), node.to_json_schema());
            }
        }

        if let Some(node) = &self.not {
            out.insert("not".to_string(), node.to_json_schema());
        }
        for (key, list) in [("allOf", &self.all_of), ("oneOf", &self.one_of), ("anyOf", &self.any_of)] {
            if let Some(nodes) = list {
                out.insert(key.to_string(), render_list(nodes));
            }
        }

        Value::Object(out)
    }
}

fn render_list(nodes: &[SchemaNode]) -> Value {
    Value::Array(nodes.iter().map(SchemaNode::to_json_schema).collect())
}

fn insert_opt(out: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        out.insert(key.to_string(), value);
    }
}

fn insert_count(out: &mut Map<String, Value>, key: &str, count: u64) {
    if count > 0 {
        out.insert(key.to_string(), Value::from(count));
    }
}

#[cfg(test)]
#[path = "json_schema_test.rs"]
mod tests;
