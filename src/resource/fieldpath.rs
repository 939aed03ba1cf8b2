//! # Field Paths
//!
//! Dotted field paths (`status.binding.name`) over JSON objects.

use crate::error::ResourceError;
use serde_json::{Map, Value};

/// Split a dotted field path into its segments
fn segments(path: &str) -> Result<Vec<&str>, ResourceError> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(ResourceError::InvalidFieldPath(path.to_string()));
    }
    Ok(segments)
}

/// Look up the value at `path`, if every segment exists
pub fn get<'a>(object: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let segments = segments(path).ok()?;
    let (last, parents) = segments.split_last()?;
    let mut current = object;
    for segment in parents {
        current = current.get(*segment)?.as_object()?;
    }
    current.get(*last)
}

/// Set `value` at `path`, creating intermediate objects as needed
///
/// Missing or `null` intermediate fields become empty objects. Every other
/// existing field is left untouched.
///
/// # Errors
///
/// Fails if the path is malformed or an intermediate field holds a scalar or list.
pub fn set(object: &mut Map<String, Value>, path: &str, value: Value) -> Result<(), ResourceError> {
    let segments = segments(path)?;
    let Some((last, parents)) = segments.split_last() else {
        return Err(ResourceError::InvalidFieldPath(path.to_string()));
    };

    let mut current = object;
    for segment in parents {
        let entry = current
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if entry.is_null() {
            *entry = Value::Object(Map::new());
        }
        current = entry
            .as_object_mut()
            .ok_or_else(|| ResourceError::NotTraversable {
                path: path.to_string(),
                segment: (*segment).to_string(),
            })?;
    }
    current.insert((*last).to_string(), value);
    Ok(())
}
