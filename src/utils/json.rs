use crate::error::{Result, UpdaterError};
use serde::Serialize;
use serde_json::{Map, Value};

/// Helpers for inspecting and editing the sources JSON document in place.
pub struct JsonUtils;

impl JsonUtils {
    /// Reads an integer that may be stored as a number or a numeric string.
    pub fn as_integer(value: &Value) -> Option<i64> {
        match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Serializes a struct into a JSON object, keeping field declaration order.
    pub fn to_object<T: Serialize>(value: &T) -> Result<Map<String, Value>> {
        match serde_json::to_value(value)? {
            Value::Object(map) => Ok(map),
            other => Err(UpdaterError::Parse(format!(
                "expected an object, serialized to {}",
                Self::kind(&other)
            ))),
        }
    }

    /// Overwrites each field on `target`. Existing keys keep their position,
    /// new keys are appended.
    pub fn merge_fields(target: &mut Map<String, Value>, fields: Map<String, Value>) {
        for (key, value) in fields {
            target.insert(key, value);
        }
    }

    /// Returns the child object under `key`, creating it when missing or null.
    pub fn ensure_object<'a>(
        parent: &'a mut Map<String, Value>,
        key: &str,
        owner: &str,
    ) -> Result<&'a mut Map<String, Value>> {
        let slot = parent
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if slot.is_null() {
            *slot = Value::Object(Map::new());
        }
        let kind = Self::kind(slot);
        slot.as_object_mut().ok_or_else(|| {
            UpdaterError::Parse(format!(
                "`{}` of '{}' must be an object, found {}",
                key, owner, kind
            ))
        })
    }

    /// Returns the child array under `key`, creating it when missing or null.
    pub fn ensure_array<'a>(
        parent: &'a mut Map<String, Value>,
        key: &str,
        owner: &str,
    ) -> Result<&'a mut Vec<Value>> {
        let slot = parent
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if slot.is_null() {
            *slot = Value::Array(Vec::new());
        }
        let kind = Self::kind(slot);
        slot.as_array_mut().ok_or_else(|| {
            UpdaterError::Parse(format!(
                "`{}` of '{}' must be an array, found {}",
                key, owner, kind
            ))
        })
    }

    /// Short name of a JSON value's type for diagnostics.
    pub fn kind(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
            Value::Array(_) => "an array",
            Value::Object(_) => "an object",
        }
    }
}
