//! Bridge values to host literal text
//!
//! Every function here is total over representable values and fails with
//! [`UnencodableValueError`] otherwise. Nothing is partially produced: the
//! caller gets the whole literal or an error.

use bridge_types::{
    is_identifier, BridgeConfig, IntegerRange, Matrix, UnencodableValueError, Value,
};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

/// Encodes a value as host literal text
pub fn encode(value: &Value, config: &BridgeConfig) -> Result<String, UnencodableValueError> {
    let mut out = String::new();
    write_value(&mut out, value, config, 0)?;
    Ok(out)
}

pub fn encode_null() -> &'static str {
    "None"
}

pub fn encode_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Encodes an integer, rejecting values outside `range`
pub fn encode_integer(value: i64, range: IntegerRange) -> Result<String, UnencodableValueError> {
    if !range.contains(value) {
        return Err(UnencodableValueError::IntegerOutOfRange { value, range });
    }
    Ok(value.to_string())
}

/// Encodes a float with enough digits to recover the exact value
pub fn encode_float(value: f64) -> String {
    if value.is_nan() {
        "float('nan')".to_string()
    } else if value.is_infinite() {
        if value > 0.0 {
            "float('inf')".to_string()
        } else {
            "float('-inf')".to_string()
        }
    } else {
        // `Debug` is the shortest representation that parses back to the
        // same bits, and always carries a `.` or an exponent.
        format!("{:?}", value)
    }
}

/// Encodes a double-quoted string literal
///
/// Quotes, backslashes, every control character, and the Unicode line
/// separators are escaped, so the literal can neither close early nor span
/// lines.
pub fn encode_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() && (c as u32) <= 0xff => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c if c.is_control() || c == '\u{2028}' || c == '\u{2029}' => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Encodes an enumeration set as a host set literal, members sorted
pub fn encode_enum_set(members: &BTreeSet<String>) -> String {
    if members.is_empty() {
        return "set()".to_string();
    }
    let mut out = String::from("{");
    for (i, member) in members.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&encode_string(member));
    }
    out.push('}');
    out
}

/// Encodes a call's argument list: positional values, then `name=value`
pub fn encode_call_args(
    positional: &[Value],
    keyword: &[(String, Value)],
    config: &BridgeConfig,
) -> Result<String, UnencodableValueError> {
    let mut out = String::new();
    for (i, value) in positional.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_value(&mut out, value, config, 0)?;
    }
    for (i, (name, value)) in keyword.iter().enumerate() {
        if !is_identifier(name) {
            return Err(UnencodableValueError::InvalidIdentifier(name.clone()));
        }
        if i > 0 || !positional.is_empty() {
            out.push_str(", ");
        }
        out.push_str(name);
        out.push('=');
        write_value(&mut out, value, config, 0)?;
    }
    Ok(out)
}

fn write_value(
    out: &mut String,
    value: &Value,
    config: &BridgeConfig,
    depth: usize,
) -> Result<(), UnencodableValueError> {
    match value {
        Value::Null | Value::Undefined => out.push_str(encode_null()),
        Value::Boolean(v) => out.push_str(encode_bool(*v)),
        Value::Integer(v) => out.push_str(&encode_integer(*v, config.integer_range)?),
        Value::Float(v) => out.push_str(&encode_float(*v)),
        Value::String(s) | Value::Enum(s) => out.push_str(&encode_string(s)),
        Value::EnumSet(members) => {
            // `set()` is a call, not a bracketed container
            if !members.is_empty() {
                enter(depth, config)?;
            }
            out.push_str(&encode_enum_set(members));
        }
        Value::Array(items) => {
            enter(depth, config)?;
            check_homogeneous(items)?;
            write_items(out, items, config, depth + 1, '[', ']')?;
        }
        Value::Tuple(items) => {
            enter(depth, config)?;
            write_items(out, items, config, depth + 1, '(', ')')?;
            if items.len() == 1 {
                // `(x)` is just `x` to the host
                out.insert(out.len() - 1, ',');
            }
        }
        Value::MultiDimArray(matrix) => {
            enter(depth, config)?;
            write_matrix(out, matrix, config, depth + 1)?;
        }
        Value::Dict(entries) => {
            enter(depth, config)?;
            write_dict(out, entries, config, depth + 1)?;
        }
        Value::Handle(handle) => out.push_str(handle.accessor()),
        Value::Function(function) => {
            return Err(UnencodableValueError::Function {
                name: function.name.clone(),
            })
        }
    }
    Ok(())
}

fn enter(depth: usize, config: &BridgeConfig) -> Result<(), UnencodableValueError> {
    if depth >= config.max_depth {
        return Err(UnencodableValueError::TooDeep(config.max_depth));
    }
    Ok(())
}

fn write_items(
    out: &mut String,
    items: &[Value],
    config: &BridgeConfig,
    depth: usize,
    open: char,
    close: char,
) -> Result<(), UnencodableValueError> {
    out.push(open);
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_value(out, item, config, depth)?;
    }
    out.push(close);
    Ok(())
}

fn write_matrix(
    out: &mut String,
    matrix: &Matrix,
    config: &BridgeConfig,
    depth: usize,
) -> Result<(), UnencodableValueError> {
    // A 0×N matrix prints as `[]`, which reads back as 0×0
    if !matrix.is_well_formed() || (matrix.rows == 0 && matrix.cols != 0) {
        return Err(UnencodableValueError::MatrixShape {
            rows: matrix.rows,
            cols: matrix.cols,
            len: matrix.items.len(),
        });
    }
    check_homogeneous(&matrix.items)?;
    out.push('[');
    for row in 0..matrix.rows {
        if row > 0 {
            out.push_str(", ");
        }
        let start = row * matrix.cols;
        let cells = &matrix.items[start..start + matrix.cols];
        enter(depth, config)?;
        write_items(out, cells, config, depth + 1, '[', ']')?;
    }
    out.push(']');
    Ok(())
}

fn write_dict(
    out: &mut String,
    entries: &BTreeMap<String, Value>,
    config: &BridgeConfig,
    depth: usize,
) -> Result<(), UnencodableValueError> {
    out.push('{');
    for (i, (key, value)) in entries.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&encode_string(key));
        out.push_str(": ");
        write_value(out, value, config, depth)?;
    }
    out.push('}');
    Ok(())
}

fn check_homogeneous(items: &[Value]) -> Result<(), UnencodableValueError> {
    let mut first: Option<&'static str> = None;
    for item in items.iter().filter(|item| !item.is_null()) {
        let kind = item.kind_name();
        match first {
            None => first = Some(kind),
            Some(seen) if seen != kind => {
                return Err(UnencodableValueError::MixedArray {
                    first: seen,
                    other: kind,
                })
            }
            Some(_) => {}
        }
    }
    Ok(())
}
