//! Host literal text to bridge values
//!
//! Decoding happens in two steps: the text is parsed into a [`Literal`], then
//! the literal is checked against the expected [`ValueKind`]. Either step can
//! fail with [`UndecodableTextError`]. When that happens the host has already
//! evaluated the request; only the result is lost.

use crate::literal::Literal;
use crate::parser::parse_literal;
use bridge_types::{
    BridgeConfig, IntegerRange, Matrix, RemoteHandle, UndecodableTextError, Value, ValueKind,
};
use std::collections::{BTreeMap, BTreeSet};

/// Largest integer magnitude an `f64` holds exactly
const MAX_EXACT_FLOAT_INT: u128 = 1 << 53;

/// Decodes host text as the expected kind
///
/// `ValueKind::Object` does not parse anything: the text is taken as the
/// accessor of a new handle (see [`decode_handle`]).
pub fn decode(
    text: &str,
    expected: &ValueKind,
    config: &BridgeConfig,
) -> Result<Value, UndecodableTextError> {
    if *expected == ValueKind::Object {
        if text.trim() == "None" {
            return Ok(Value::Null);
        }
        return decode_handle(text).map(Value::Handle);
    }

    let literal = parse_literal(text, config.max_depth).map_err(|err| {
        tracing::warn!(target: "literal_codec", %text, expected = %expected, "undecodable host text");
        UndecodableTextError::new(text, expected.clone(), err.offset, err.reason)
    })?;
    convert(&literal, expected, config.integer_range).map_err(|reason| {
        tracing::warn!(target: "literal_codec", %text, expected = %expected, %reason, "host text has the wrong kind");
        UndecodableTextError::new(text, expected.clone(), 0, reason)
    })
}

/// Decodes host text with no expected kind
///
/// Only the literal grammar is used; host output is never evaluated.
pub fn decode_any(text: &str, config: &BridgeConfig) -> Result<Value, UndecodableTextError> {
    decode(text, &ValueKind::Any, config)
}

/// Treats a constructor-style response as the accessor of a new handle
pub fn decode_handle(text: &str) -> Result<RemoteHandle, UndecodableTextError> {
    let accessor = text.trim();
    if accessor.is_empty() {
        return Err(UndecodableTextError::new(
            text,
            ValueKind::Object,
            0,
            "empty accessor",
        ));
    }
    if accessor == "None" {
        return Err(UndecodableTextError::new(
            text,
            ValueKind::Object,
            0,
            "host returned None, not an object",
        ));
    }
    if accessor.contains(['\n', '\r']) {
        return Err(UndecodableTextError::new(
            text,
            ValueKind::Object,
            accessor.find(['\n', '\r']).unwrap_or(0),
            "accessor spans multiple lines",
        ));
    }
    Ok(RemoteHandle::new(accessor))
}

fn mismatch(expected: &ValueKind, found: &Literal) -> String {
    format!("expected {}, found {}", expected, found.type_name())
}

fn convert(literal: &Literal, expected: &ValueKind, range: IntegerRange) -> Result<Value, String> {
    match expected {
        ValueKind::Any => convert_any(literal, range),
        ValueKind::Null => match literal {
            Literal::None => Ok(Value::Null),
            other => Err(mismatch(expected, other)),
        },
        ValueKind::Boolean => match literal {
            Literal::Bool(v) => Ok(Value::Boolean(*v)),
            other => Err(mismatch(expected, other)),
        },
        ValueKind::Integer => match literal {
            Literal::Int(v) => convert_int(*v, range),
            other => Err(mismatch(expected, other)),
        },
        ValueKind::Float => match literal {
            Literal::Float(v) => Ok(Value::Float(*v)),
            Literal::Int(v) if v.unsigned_abs() <= MAX_EXACT_FLOAT_INT => {
                Ok(Value::Float(*v as f64))
            }
            Literal::Int(v) => Err(format!("integer {} has no exact float form", v)),
            other => Err(mismatch(expected, other)),
        },
        ValueKind::String => match literal {
            Literal::Str(s) => Ok(Value::String(s.clone())),
            other => Err(mismatch(expected, other)),
        },
        ValueKind::Enum => match literal {
            Literal::Str(s) => Ok(Value::Enum(s.clone())),
            other => Err(mismatch(expected, other)),
        },
        ValueKind::EnumSet => match literal {
            Literal::Set(items) | Literal::List(items) | Literal::Tuple(items) => {
                convert_members(items).map(Value::EnumSet)
            }
            other => Err(mismatch(expected, other)),
        },
        ValueKind::Array(element) => match literal {
            Literal::List(items) | Literal::Tuple(items) => items
                .iter()
                .map(|item| convert_element(item, element, range))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => Err(mismatch(expected, other)),
        },
        ValueKind::MultiDimArray(element) => convert_matrix(literal, expected, element, range),
        ValueKind::Tuple(elements) => match literal {
            Literal::Tuple(items) | Literal::List(items) => {
                if items.len() != elements.len() {
                    return Err(format!(
                        "expected {} elements, found {}",
                        elements.len(),
                        items.len()
                    ));
                }
                items
                    .iter()
                    .zip(elements)
                    .map(|(item, kind)| convert(item, kind, range))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Tuple)
            }
            other => Err(mismatch(expected, other)),
        },
        ValueKind::Dict(value_kind) => match literal {
            Literal::Dict(entries) => convert_dict(entries, value_kind, range),
            other => Err(mismatch(expected, other)),
        },
        ValueKind::Object => Err("object references cannot be decoded from a literal".to_string()),
    }
}

fn convert_any(literal: &Literal, range: IntegerRange) -> Result<Value, String> {
    match literal {
        Literal::None => Ok(Value::Null),
        Literal::Bool(v) => Ok(Value::Boolean(*v)),
        Literal::Int(v) => convert_int(*v, range),
        Literal::Float(v) => Ok(Value::Float(*v)),
        Literal::Str(s) => Ok(Value::String(s.clone())),
        Literal::List(items) => items
            .iter()
            .map(|item| convert_any(item, range))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Literal::Tuple(items) => items
            .iter()
            .map(|item| convert_any(item, range))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Tuple),
        Literal::Set(items) => convert_members(items).map(Value::EnumSet),
        Literal::Dict(entries) => convert_dict(entries, &ValueKind::Any, range),
    }
}

fn convert_int(value: i128, range: IntegerRange) -> Result<Value, String> {
    if !range.contains_wide(value) {
        return Err(format!("integer {} is outside the {} range", value, range));
    }
    Ok(Value::Integer(value as i64))
}

/// Array and matrix cells may be `None` whatever the element kind
fn convert_element(
    literal: &Literal,
    element: &ValueKind,
    range: IntegerRange,
) -> Result<Value, String> {
    match literal {
        Literal::None => Ok(Value::Null),
        other => convert(other, element, range),
    }
}

fn convert_members(items: &[Literal]) -> Result<BTreeSet<String>, String> {
    items
        .iter()
        .map(|item| match item {
            Literal::Str(s) => Ok(s.clone()),
            other => Err(format!("set member must be str, found {}", other.type_name())),
        })
        .collect()
}

fn convert_matrix(
    literal: &Literal,
    expected: &ValueKind,
    element: &ValueKind,
    range: IntegerRange,
) -> Result<Value, String> {
    let Literal::List(rows) = literal else {
        return Err(mismatch(expected, literal));
    };
    let mut cols = None;
    let mut items = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        let Literal::List(cells) = row else {
            return Err(format!("row {} is a {}, not a list", index, row.type_name()));
        };
        match cols {
            None => cols = Some(cells.len()),
            Some(width) if width != cells.len() => {
                return Err(format!(
                    "row {} has {} columns, expected {}",
                    index,
                    cells.len(),
                    width
                ))
            }
            Some(_) => {}
        }
        for cell in cells {
            items.push(convert_element(cell, element, range)?);
        }
    }
    Ok(Value::MultiDimArray(Matrix::new(
        rows.len(),
        cols.unwrap_or(0),
        items,
    )))
}

fn convert_dict(
    entries: &[(Literal, Literal)],
    value_kind: &ValueKind,
    range: IntegerRange,
) -> Result<Value, String> {
    let mut dict = BTreeMap::new();
    for (key, value) in entries {
        let Literal::Str(key) = key else {
            return Err(format!("dict key must be str, found {}", key.type_name()));
        };
        dict.insert(key.clone(), convert_element(value, value_kind, range)?);
    }
    Ok(Value::Dict(dict))
}
