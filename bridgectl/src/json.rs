//! JSON ↔ bridge value conversion

use crate::commands::CliError;
use bridge_types::Value;
use literal_codec::encode_float;
use serde_json::{json, Map, Number};
use std::collections::BTreeMap;

/// Maps a JSON document onto a bridge value
///
/// Arrays become lists and objects become dicts. Integers that do not fit in
/// `i64` are rejected rather than turned into floats.
pub fn json_to_value(json: &serde_json::Value) -> Result<Value, CliError> {
    Ok(match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(*b),
        serde_json::Value::Number(n) => number_to_value(n)?,
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => Value::Array(
            items
                .iter()
                .map(json_to_value)
                .collect::<Result<_, _>>()?,
        ),
        serde_json::Value::Object(entries) => {
            let mut dict = BTreeMap::new();
            for (key, value) in entries {
                dict.insert(key.clone(), json_to_value(value)?);
            }
            Value::Dict(dict)
        }
    })
}

fn number_to_value(n: &Number) -> Result<Value, CliError> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::Integer(i));
    }
    if n.is_u64() {
        return Err(CliError::InvalidInput(format!("integer {} is too large", n)));
    }
    n.as_f64()
        .map(Value::Float)
        .ok_or_else(|| CliError::InvalidInput(format!("unsupported number {}", n)))
}

/// Renders a decoded value as JSON
///
/// Non-finite floats have no JSON form and are written as their host
/// spelling. Handles and functions become single-key objects.
pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null | Value::Undefined => serde_json::Value::Null,
        Value::Boolean(b) => json!(b),
        Value::Integer(i) => json!(i),
        Value::Float(f) => match Number::from_f64(*f) {
            Some(n) => serde_json::Value::Number(n),
            None => json!(encode_float(*f)),
        },
        Value::String(s) | Value::Enum(s) => json!(s),
        Value::EnumSet(members) => json!(members),
        Value::Array(items) | Value::Tuple(items) => {
            serde_json::Value::Array(items.iter().map(value_to_json).collect())
        }
        Value::MultiDimArray(matrix) => serde_json::Value::Array(
            matrix
                .row_slices()
                .map(|row| serde_json::Value::Array(row.iter().map(value_to_json).collect()))
                .collect(),
        ),
        Value::Dict(entries) => {
            let mut map = Map::new();
            for (key, value) in entries {
                map.insert(key.clone(), value_to_json(value));
            }
            serde_json::Value::Object(map)
        }
        Value::Handle(handle) => json!({ "handle": handle.accessor() }),
        Value::Function(function) => json!({ "function": function.name }),
    }
}
