//! Raw-value decoding helpers shared by the entity model.
//!
//! Entities are reconstructed from untyped JSON by popping structurally-known
//! keys out of the object (recognition is purely by key name) and carrying
//! every remaining key verbatim as an extension field. `shift_remove` keeps
//! the leftover extension keys in their original insertion order.

use serde_json::{Map, Value};

use crate::error::DecodeError;
use crate::types::json_type_name;

pub(crate) fn invalid(path: &str, expected: &'static str, actual: &Value) -> DecodeError {
    DecodeError::InvalidField {
        path: path.to_string(),
        expected,
        actual: json_type_name(actual).to_string(),
    }
}

/// Unwrap a raw entity value into its backing object map.
pub(crate) fn into_map(value: Value, path: &str) -> Result<Map<String, Value>, DecodeError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(invalid(path, "object", &other)),
    }
}

pub(crate) fn take_value(map: &mut Map<String, Value>, key: &str) -> Option<Value> {
    map.shift_remove(key)
}

pub(crate) fn take_string(
    map: &mut Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<Option<String>, DecodeError> {
    match map.shift_remove(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(invalid(&format!("{}/{}", path, key), "string", &other)),
    }
}

pub(crate) fn take_number(
    map: &mut Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<Option<f64>, DecodeError> {
    match map.shift_remove(key) {
        None => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(other) => Err(invalid(&format!("{}/{}", path, key), "number", &other)),
    }
}

pub(crate) fn take_bool(
    map: &mut Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<Option<bool>, DecodeError> {
    match map.shift_remove(key) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(b)),
        Some(other) => Err(invalid(&format!("{}/{}", path, key), "boolean", &other)),
    }
}

pub(crate) fn take_string_list(
    map: &mut Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<Option<Vec<String>>, DecodeError> {
    let Some(value) = map.shift_remove(key) else {
        return Ok(None);
    };
    let items = match value {
        Value::Array(items) => items,
        other => return Err(invalid(&format!("{}/{}", path, key), "array", &other)),
    };

    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        match item {
            Value::String(s) => out.push(s),
            other => {
                return Err(invalid(&format!("{}/{}/{}", path, key, i), "string", &other));
            }
        }
    }
    Ok(Some(out))
}

/// Pop a structurally-known sub-entity and recursively construct it.
pub(crate) fn take_entity<T>(
    map: &mut Map<String, Value>,
    key: &str,
    path: &str,
    decode: impl Fn(Value, &str) -> Result<T, DecodeError>,
) -> Result<Option<T>, DecodeError> {
    match map.shift_remove(key) {
        None => Ok(None),
        Some(value) => decode(value, &format!("{}/{}", path, key)).map(Some),
    }
}

/// Pop a structurally-known list field and construct each element.
pub(crate) fn take_entity_list<T>(
    map: &mut Map<String, Value>,
    key: &str,
    path: &str,
    decode: impl Fn(Value, &str) -> Result<T, DecodeError>,
) -> Result<Option<Vec<T>>, DecodeError> {
    let Some(value) = map.shift_remove(key) else {
        return Ok(None);
    };
    let items = match value {
        Value::Array(items) => items,
        other => return Err(invalid(&format!("{}/{}", path, key), "array", &other)),
    };

    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        out.push(decode(item, &format!("{}/{}/{}", path, key, i))?);
    }
    Ok(Some(out))
}

/// Insert a field only when it has a value.
pub(crate) fn emit(map: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        map.insert(key.to_string(), value);
    }
}

pub(crate) fn emit_string(map: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    emit(map, key, value.as_ref().map(|s| Value::String(s.clone())));
}

pub(crate) fn emit_number(map: &mut Map<String, Value>, key: &str, value: &Option<f64>) {
    emit(
        map,
        key,
        value.and_then(serde_json::Number::from_f64).map(Value::Number),
    );
}

pub(crate) fn emit_bool(map: &mut Map<String, Value>, key: &str, value: &Option<bool>) {
    emit(map, key, value.map(Value::Bool));
}

pub(crate) fn emit_string_list(
    map: &mut Map<String, Value>,
    key: &str,
    value: &Option<Vec<String>>,
) {
    emit(
        map,
        key,
        value.as_ref().map(|items| {
            Value::Array(items.iter().cloned().map(Value::String).collect())
        }),
    );
}

pub(crate) fn emit_entity_list<T>(
    map: &mut Map<String, Value>,
    key: &str,
    value: &Option<Vec<T>>,
    encode: impl Fn(&T) -> Value,
) {
    emit(
        map,
        key,
        value
            .as_ref()
            .map(|items| Value::Array(items.iter().map(&encode).collect())),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        into_map(value, "").unwrap()
    }

    #[test]
    fn take_string_pops_the_key() {
        let mut m = map(json!({ "a": "x", "b": 1 }));
        assert_eq!(take_string(&mut m, "a", "").unwrap(), Some("x".into()));
        assert!(!m.contains_key("a"));
        assert!(m.contains_key("b"));
    }

    #[test]
    fn take_string_wrong_type_errors_with_path() {
        let mut m = map(json!({ "a": 1 }));
        let err = take_string(&mut m, "a", "/event").unwrap_err();
        assert!(matches!(
            err,
            DecodeError::InvalidField { ref path, .. } if path == "/event/a"
        ));
    }

    #[test]
    fn take_string_list_checks_elements() {
        let mut m = map(json!({ "epcList": ["a", 2] }));
        let err = take_string_list(&mut m, "epcList", "").unwrap_err();
        assert!(matches!(
            err,
            DecodeError::InvalidField { ref path, .. } if path == "/epcList/1"
        ));
    }

    #[test]
    fn shift_remove_preserves_leftover_order() {
        let mut m = map(json!({ "x": 1, "known": 2, "y": 3, "z": 4 }));
        take_value(&mut m, "known");
        let keys: Vec<&str> = m.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["x", "y", "z"]);
    }

    #[test]
    fn emit_skips_absent_fields() {
        let mut m = Map::new();
        emit_string(&mut m, "a", &None);
        emit_string(&mut m, "b", &Some("v".into()));
        assert_eq!(Value::Object(m), json!({ "b": "v" }));
    }
}
