//! # Struct Conversion
//!
//! Converts between protobuf `google.protobuf.Struct` documents and JSON.
//!
//! Crossplane sends every resource as a `Struct`. JSON is easier to navigate
//! and lets typed views deserialize straight out of the document.

use crate::error::{json_kind, ResourceError};
use prost_types::value::Kind;
use prost_types::{ListValue, Struct, Value};
use serde_json::{Map, Number};

/// Convert a protobuf `Struct` into a JSON object
///
/// # Errors
///
/// Returns [`ResourceError::NonFiniteNumber`] if any number is NaN or infinite.
pub fn struct_to_json(s: &Struct) -> Result<Map<String, serde_json::Value>, ResourceError> {
    fields_to_json(s, "")
}

/// Convert a JSON value into a protobuf `Struct`
///
/// # Errors
///
/// Returns [`ResourceError::NotAnObject`] unless the value is a JSON object.
pub fn json_to_struct(value: serde_json::Value) -> Result<Struct, ResourceError> {
    match value {
        serde_json::Value::Object(map) => Ok(map_to_struct(map)),
        other => Err(ResourceError::NotAnObject {
            kind: json_kind(&other),
        }),
    }
}

/// Convert a JSON object into a protobuf `Struct`
pub fn map_to_struct(map: Map<String, serde_json::Value>) -> Struct {
    Struct {
        fields: map
            .into_iter()
            .map(|(k, v)| (k, json_to_value(v)))
            .collect(),
    }
}

fn fields_to_json(
    s: &Struct,
    prefix: &str,
) -> Result<Map<String, serde_json::Value>, ResourceError> {
    s.fields
        .iter()
        .map(|(k, v)| {
            let path = join(prefix, k);
            value_to_json(v, &path).map(|json| (k.clone(), json))
        })
        .collect()
}

fn value_to_json(value: &Value, path: &str) -> Result<serde_json::Value, ResourceError> {
    let json = match &value.kind {
        None | Some(Kind::NullValue(_)) => serde_json::Value::Null,
        Some(Kind::BoolValue(b)) => serde_json::Value::Bool(*b),
        Some(Kind::StringValue(s)) => serde_json::Value::String(s.clone()),
        Some(Kind::NumberValue(n)) => number_to_json(*n, path)?,
        Some(Kind::StructValue(s)) => serde_json::Value::Object(fields_to_json(s, path)?),
        Some(Kind::ListValue(list)) => serde_json::Value::Array(
            list.values
                .iter()
                .enumerate()
                .map(|(i, v)| value_to_json(v, &format!("{path}[{i}]")))
                .collect::<Result<_, _>>()?,
        ),
    };
    Ok(json)
}

/// Struct numbers are always doubles; integral values go back to JSON as integers
/// so names like `replicas: 3` don't turn into `3.0`.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Only whole numbers within i64 range are cast"
)]
fn number_to_json(n: f64, path: &str) -> Result<serde_json::Value, ResourceError> {
    if !n.is_finite() {
        return Err(ResourceError::NonFiniteNumber {
            path: path.to_string(),
        });
    }
    if n.fract() == 0.0 && n.abs() < 9.007_199_254_740_992e15 {
        return Ok(serde_json::Value::Number(Number::from(n as i64)));
    }
    Number::from_f64(n)
        .map(serde_json::Value::Number)
        .ok_or_else(|| ResourceError::NonFiniteNumber {
            path: path.to_string(),
        })
}

#[allow(
    clippy::cast_precision_loss,
    reason = "Struct numbers are doubles on the wire"
)]
fn json_to_value(value: serde_json::Value) -> Value {
    let kind = match value {
        serde_json::Value::Null => Kind::NullValue(0),
        serde_json::Value::Bool(b) => Kind::BoolValue(b),
        serde_json::Value::Number(n) => Kind::NumberValue(n.as_f64().unwrap_or_default()),
        serde_json::Value::String(s) => Kind::StringValue(s),
        serde_json::Value::Array(items) => Kind::ListValue(ListValue {
            values: items.into_iter().map(json_to_value).collect(),
        }),
        serde_json::Value::Object(map) => Kind::StructValue(map_to_struct(map)),
    };
    Value { kind: Some(kind) }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_struct_to_json_preserves_nested_documents() {
        let doc = json!({
            "apiVersion": "example.org/v1",
            "metadata": {"name": "xr", "labels": {"a": "b"}},
            "spec": {"replicas": 3, "ratio": 0.5, "enabled": true, "tags": ["x", "y"], "nothing": null}
        });
        let s = json_to_struct(doc.clone()).unwrap();
        let back = struct_to_json(&s).unwrap();
        assert_eq!(serde_json::Value::Object(back), doc);
    }

    #[test]
    fn test_whole_numbers_come_back_as_integers() {
        let s = json_to_struct(json!({"count": 3})).unwrap();
        let back = struct_to_json(&s).unwrap();
        assert_eq!(back["count"], json!(3));
        assert!(back["count"].is_i64());
    }

    #[test]
    fn test_non_finite_number_reports_path() {
        let s = Struct {
            fields: [(
                "spec".to_string(),
                Value {
                    kind: Some(Kind::StructValue(Struct {
                        fields: [(
                            "ratio".to_string(),
                            Value {
                                kind: Some(Kind::NumberValue(f64::NAN)),
                            },
                        )]
                        .into_iter()
                        .collect(),
                    })),
                },
            )]
            .into_iter()
            .collect(),
        };
        let err = struct_to_json(&s).unwrap_err();
        assert_eq!(err.to_string(), "field spec.ratio holds a non-finite number");
    }

    #[test]
    fn test_json_to_struct_rejects_non_objects() {
        let err = json_to_struct(json!(["a"])).unwrap_err();
        assert!(matches!(err, ResourceError::NotAnObject { kind: "array" }));
    }

    #[test]
    fn test_missing_kind_is_null() {
        let s = Struct {
            fields: [("empty".to_string(), Value { kind: None })]
                .into_iter()
                .collect(),
        };
        let back = struct_to_json(&s).unwrap();
        assert_eq!(back["empty"], serde_json::Value::Null);
    }
}
