//! # Resource Errors
//!
//! Errors raised while reading or writing the structured documents carried in
//! a function request or response.

use thiserror::Error;

/// Failure converting or mutating a resource document
#[derive(Debug, Error)]
pub enum ResourceError {
    /// A number in a protobuf `Struct` has no JSON representation (NaN or infinite)
    #[error("field {path} holds a non-finite number")]
    NonFiniteNumber { path: String },

    /// A JSON value that must become a protobuf `Struct` is not an object
    #[error("cannot convert {kind} to a structured object")]
    NotAnObject { kind: &'static str },

    /// A field path has an empty segment
    #[error("invalid field path {0:?}")]
    InvalidFieldPath(String),

    /// A field path walks through a value that is not an object
    #[error("cannot set {path}: {segment} is not an object")]
    NotTraversable { path: String, segment: String },

    /// Serializing or deserializing a typed value failed
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Short type name used in error context, similar to Go's `%T`
///
/// `type_name_of(&request)` yields `RunFunctionRequest` rather than the fully
/// qualified path.
pub fn type_name_of<T: ?Sized>(_: &T) -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// JSON type name of a value, for error messages
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
