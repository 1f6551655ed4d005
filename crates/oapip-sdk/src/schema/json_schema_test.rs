use crate::schema::parse_schema_node;
use oapip_schema::validate_instance;
use serde_json::json;

#[test]
fn exclusive_bounds_become_numeric() {
    let node = parse_schema_node(&json!({
        "type": "number",
        "minimum": 0,
        "exclusiveMinimum": true,
        "maximum": 10
    }))
    .expect("must parse");
    assert_eq!(
        node.to_json_schema(),
        json!({ "type": "number", "exclusiveMinimum": 0, "maximum": 10 })
    );
}

#[test]
fn nullable_admits_null() {
    let node = parse_schema_node(&json!({ "type": "string", "enum": ["a"], "nullable": true }))
        .expect("must parse");
    let rendered = node.to_json_schema();
    assert_eq!(rendered["type"], json!(["string", "null"]));
    assert_eq!(rendered["enum"], json!(["a", null]));
    assert!(validate_instance(&rendered, &json!(null)).is_empty());
}

#[test]
fn openapi_only_keywords_are_dropped() {
    let node = parse_schema_node(&json!({
        "deprecated": true,
        "$ref": "https://example.org/schemas/geometry.json",
        "format": "geojson-geometry",
        "example": { "type": "Point" }
    }))
    .expect("must parse");
    assert_eq!(
        node.to_json_schema(),
        json!({ "examples": [{ "type": "Point" }] })
    );
}

#[test]
fn rendered_schema_validates_instances() {
    let node = parse_schema_node(&json!({
        "type": "object",
        "required": ["level"],
        "properties": {
            "level": { "type": "integer", "minimum": 1, "maximum": 5 },
            "tags": { "type": "array", "items": { "type": "string" }, "maxItems": 2 }
        },
        "additionalProperties": false
    }))
    .expect("must parse");
    let schema = node.to_json_schema();

    assert!(validate_instance(&schema, &json!({ "level": 3, "tags": ["a"] })).is_empty());
    assert!(!validate_instance(&schema, &json!({ "level": 9 })).is_empty());
    assert!(!validate_instance(&schema, &json!({ "level": 1, "other": true })).is_empty());
    assert!(!validate_instance(&schema, &json!({ "tags": ["a", "b", "c"] })).is_empty());
}
