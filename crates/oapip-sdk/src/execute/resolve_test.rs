use super::{resolve_input_value, resolve_input_value_at};
use crate::error::OapipError;
use crate::execute::{
    BoundingBox, ExecutionInputValue, Format, FormatSchema, InlineValue, QualifiedContent, Scalar,
};
use crate::link::Link;
use crate::vocabulary::CRS84;
use oapip_core::FieldPath;
use proptest::prelude::*;
use serde_json::{json, Value};

fn input_error(value: Value) -> (String, String) {
    match resolve_input_value(&value).expect_err("must reject") {
        OapipError::AmbiguousOrInvalidInputValue { path, message } => (path.to_string(), message),
        other => panic!("expected input value error, got {other}"),
    }
}

#[test]
fn bbox_scenario_defaults_to_crs84() {
    let resolved = resolve_input_value(&json!({ "bbox": [-71.1, 42.3, -71.0, 42.4] }))
        .expect("must resolve");
    assert_eq!(
        resolved,
        ExecutionInputValue::BBox(BoundingBox {
            bbox: [-71.1, 42.3, -71.0, 42.4],
            crs: CRS84.to_string(),
        })
    );
}

#[test]
fn bbox_keeps_explicit_crs() {
    let resolved = resolve_input_value(&json!({
        "bbox": [0, 0, 10, 10],
        "crs": "http://www.opengis.net/def/crs/EPSG/0/3857"
    }))
    .expect("must resolve");
    match resolved {
        ExecutionInputValue::BBox(bbox) => {
            assert_eq!(bbox.crs, "http://www.opengis.net/def/crs/EPSG/0/3857");
            assert_eq!(bbox.bbox, [0.0, 0.0, 10.0, 10.0]);
        }
        other => panic!("expected bbox, got {other:?}"),
    }
}

#[test]
fn bbox_wins_over_every_later_candidate() {
    let resolved = resolve_input_value(&json!({ "bbox": [0, 0, 1, 1] })).expect("must resolve");
    assert_eq!(resolved, ExecutionInputValue::BBox(BoundingBox::new([0.0, 0.0, 1.0, 1.0])));
}

#[test]
fn qualified_scenario_with_nested_format() {
    let resolved = resolve_input_value(&json!({ "value": 42, "format": { "mediaType": "text/plain" } }))
        .expect("must resolve");
    match resolved {
        ExecutionInputValue::QualifiedValue(qualified) => {
            assert_eq!(
                qualified.value,
                QualifiedContent::Inline(InlineValue::Scalar(Scalar::Number(42.into())))
            );
            assert_eq!(
                qualified.format,
                Some(Format {
                    media_type: Some("text/plain".to_string()),
                    ..Format::default()
                })
            );
        }
        other => panic!("expected qualified value, got {other:?}"),
    }
}

#[test]
fn qualified_value_accepts_inline_format_keys() {
    let resolved = resolve_input_value(&json!({
        "value": "PGZlYXR1cmVzLz4=",
        "mediaType": "application/gml+xml",
        "encoding": "base64",
        "schema": "https://schemas.opengis.net/gml/3.2.1/gml.xsd"
    }))
    .expect("must resolve");
    let ExecutionInputValue::QualifiedValue(qualified) = resolved else {
        panic!("expected qualified value");
    };
    let format = qualified.format.expect("format");
    assert_eq!(format.encoding.as_deref(), Some("base64"));
    assert_eq!(
        format.schema,
        Some(FormatSchema::Reference("https://schemas.opengis.net/gml/3.2.1/gml.xsd".to_string()))
    );
}

#[test]
fn qualified_value_rejects_nested_and_inline_format_together() {
    let (path, message) = input_error(json!({
        "value": 1,
        "mediaType": "text/plain",
        "format": { "mediaType": "text/plain" }
    }));
    assert_eq!(path, "$");
    assert!(message.contains("not both"));
}

#[test]
fn qualified_value_keeps_structured_objects_opaque() {
    let feature = json!({ "type": "Feature", "geometry": { "type": "Point", "coordinates": [1, 2] } });
    let resolved = resolve_input_value(&json!({ "value": feature.clone() })).expect("must resolve");
    let ExecutionInputValue::QualifiedValue(qualified) = resolved else {
        panic!("expected qualified value");
    };
    assert_eq!(qualified.value, QualifiedContent::Object(feature.as_object().cloned().expect("object")));
    assert_eq!(qualified.format, None);
}

#[test]
fn qualified_value_rejects_null_and_unknown_keys() {
    let (path, _) = input_error(json!({ "value": null }));
    assert_eq!(path, "$.value");
    let (path, message) = input_error(json!({ "value": 1, "units": "m" }));
    assert_eq!(path, "$.units");
    assert!(message.contains("unknown field"));
}

#[test]
fn link_scenario() {
    let resolved = resolve_input_value(&json!({ "href": "https://example.org/data.json" }))
        .expect("must resolve");
    assert_eq!(resolved, ExecutionInputValue::Link(Link::new("https://example.org/data.json")));
}

#[test]
fn null_href_is_an_invalid_input_value() {
    let (path, message) = input_error(json!({ "href": null }));
    assert_eq!(path, "$.href");
    assert!(message.contains("`href` must be a string"));
    let (path, _) = input_error(json!({ "href": 7 }));
    assert_eq!(path, "$.href");
}

#[test]
fn value_key_takes_precedence_over_href() {
    let resolved = resolve_input_value(&json!({ "value": "x", "href": "https://example.org" }));
    let (path, _) = match resolved.expect_err("href is not a qualified value key") {
        OapipError::AmbiguousOrInvalidInputValue { path, message } => (path.to_string(), message),
        other => panic!("unexpected error: {other}"),
    };
    assert_eq!(path, "$.href");
}

#[test]
fn scalars_resolve_directly() {
    assert_eq!(
        resolve_input_value(&json!(true)).expect("bool"),
        ExecutionInputValue::Scalar(Scalar::Bool(true))
    );
    assert_eq!(
        resolve_input_value(&json!("river")).expect("string"),
        ExecutionInputValue::Scalar(Scalar::String("river".to_string()))
    );
    assert_eq!(
        resolve_input_value(&json!(2.5)).expect("number").instance(),
        Some(json!(2.5))
    );
}

#[test]
fn arrays_mix_inline_values() {
    let resolved = resolve_input_value(&json!([1, "two", { "bbox": [0, 0, 1, 1] }, [true]]))
        .expect("must resolve");
    let ExecutionInputValue::Array(items) = resolved else {
        panic!("expected array");
    };
    assert_eq!(items.len(), 4);
    assert!(matches!(items[2], InlineValue::BBox(_)));
    assert_eq!(items[3], InlineValue::Array(vec![InlineValue::Scalar(Scalar::Bool(true))]));
}

#[test]
fn ten_level_nested_arrays_resolve() {
    let mut raw = json!(7);
    for _ in 0..10 {
        raw = json!([raw]);
    }
    let resolved = resolve_input_value(&raw).expect("must resolve");
    let ExecutionInputValue::Array(items) = resolved else {
        panic!("expected array");
    };
    assert_eq!(InlineValue::Array(items).array_depth(), 10);
}

#[test]
fn array_elements_must_be_inline() {
    let (path, message) = input_error(json!([1, { "href": "https://example.org" }]));
    assert_eq!(path, "$[1]");
    assert!(message.contains("array elements"));
}

#[test]
fn null_and_undiscriminated_objects_are_rejected() {
    let (path, _) = input_error(Value::Null);
    assert_eq!(path, "$");
    let (_, message) = input_error(json!({ "name": "x" }));
    assert!(message.contains("none of"));
}

#[test]
fn malformed_bbox_reports_the_bbox_problem() {
    let (path, message) = input_error(json!({ "bbox": [0, 0, 1] }));
    assert_eq!(path, "$.bbox");
    assert!(message.contains("exactly 4 numbers"));
    let (path, _) = input_error(json!({ "bbox": [0, 0, 1, 1], "crs": 4326 }));
    assert_eq!(path, "$.crs");
    let (path, _) = input_error(json!({ "bbox": [0, 0, 1, "1"] }));
    assert_eq!(path, "$.bbox");
}

#[test]
fn bbox_wins_even_with_extra_keys() {
    let expected = ExecutionInputValue::BBox(BoundingBox::new([0.0, 0.0, 1.0, 1.0]));
    for raw in [
        json!({ "bbox": [0, 0, 1, 1], "note": "x" }),
        json!({ "bbox": [0, 0, 1, 1], "value": 3 }),
        json!({ "bbox": [0, 0, 1, 1], "href": "https://example.org/aoi.json" }),
    ] {
        assert_eq!(resolve_input_value(&raw).expect("must resolve"), expected, "input: {raw}");
    }
}

#[test]
fn bbox_with_extra_keys_inside_arrays_and_qualified_values() {
    let resolved = resolve_input_value(&json!([{ "bbox": [0, 0, 1, 1], "note": "x" }]))
        .expect("must resolve");
    assert_eq!(
        resolved,
        ExecutionInputValue::Array(vec![InlineValue::BBox(BoundingBox::new([0.0, 0.0, 1.0, 1.0]))])
    );

    let resolved = resolve_input_value(&json!({ "value": { "bbox": [0, 0, 1, 1], "note": "x" } }))
        .expect("must resolve");
    match resolved {
        ExecutionInputValue::QualifiedValue(qualified) => assert_eq!(
            qualified.value,
            QualifiedContent::Inline(InlineValue::BBox(BoundingBox::new([0.0, 0.0, 1.0, 1.0])))
        ),
        other => panic!("expected qualified value, got {other:?}"),
    }
}

#[test]
fn errors_carry_the_given_base_path() {
    let base = FieldPath::root().key("inputs").key("aoi");
    let err = resolve_input_value_at(&json!([1, null]), &base).expect_err("must reject");
    assert_eq!(err.path().to_string(), "$.inputs.aoi[1]");
}

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,6}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map(
                prop_oneof![
                    Just("bbox".to_string()),
                    Just("value".to_string()),
                    Just("href".to_string()),
                    Just("crs".to_string()),
                    "[a-z]{1,4}"
                ],
                inner,
                0..3
            )
            .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn resolution_is_deterministic(raw in arb_json()) {
        let first = resolve_input_value(&raw);
        let second = resolve_input_value(&raw);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn four_numbers_under_bbox_always_resolve_to_bbox(corners in prop::array::uniform4(-180.0f64..180.0)) {
        let resolved = resolve_input_value(&json!({ "bbox": corners })).expect("must resolve");
        prop_assert_eq!(resolved, ExecutionInputValue::BBox(BoundingBox::new(corners)));
    }
}
