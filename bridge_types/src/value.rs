//! Values that cross the bridge

use crate::handle::RemoteHandle;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A value the bridge can marshal to or from host literal text
///
/// `Undefined` encodes to the host null literal and decodes back as `Null`.
/// `Function` is never representable: encoding it always fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Undefined,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// Member name of a host enumeration, sent as a string literal
    Enum(String),
    /// Unordered set of member names
    EnumSet(BTreeSet<String>),
    /// Homogeneous list (null elements allowed)
    Array(Vec<Value>),
    MultiDimArray(Matrix),
    Tuple(Vec<Value>),
    Dict(BTreeMap<String, Value>),
    Handle(RemoteHandle),
    Function(FunctionRef),
}

impl Value {
    /// Short name of this value's kind, used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Undefined => "undefined",
            Value::Boolean(_) => "bool",
            Value::Integer(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "str",
            Value::Enum(_) => "enum",
            Value::EnumSet(_) => "enumset",
            Value::Array(_) => "list",
            Value::MultiDimArray(_) => "matrix",
            Value::Tuple(_) => "tuple",
            Value::Dict(_) => "dict",
            Value::Handle(_) => "object",
            Value::Function(_) => "function",
        }
    }

    /// Returns true for `Null` and `Undefined`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null | Value::Undefined)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text of a `String` or `Enum`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) | Value::Enum(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_handle(&self) -> Option<&RemoteHandle> {
        match self {
            Value::Handle(handle) => Some(handle),
            _ => None,
        }
    }

    /// Builds an `EnumSet` from member names in any order
    pub fn enum_set<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::EnumSet(members.into_iter().map(Into::into).collect())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<RemoteHandle> for Value {
    fn from(handle: RemoteHandle) -> Self {
        Value::Handle(handle)
    }
}

/// Row-major two-dimensional array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub items: Vec<Value>,
}

impl Matrix {
    /// Creates a matrix; the shape is checked when encoding
    pub fn new(rows: usize, cols: usize, items: Vec<Value>) -> Self {
        Self { rows, cols, items }
    }

    /// Builds a matrix from rows, or `None` if the rows are ragged
    pub fn from_rows(rows: Vec<Vec<Value>>) -> Option<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != cols) {
            return None;
        }
        let row_count = rows.len();
        let items = rows.into_iter().flatten().collect();
        Some(Self::new(row_count, cols, items))
    }

    /// Returns true if `rows * cols` matches the item count
    pub fn is_well_formed(&self) -> bool {
        self.rows.checked_mul(self.cols) == Some(self.items.len())
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.items.get(row * self.cols + col)
    }

    /// Iterates rows as slices; stops early on a malformed matrix
    pub fn row_slices(&self) -> impl Iterator<Item = &[Value]> {
        let cols = self.cols;
        (0..self.rows).map_while(move |row| self.items.get(row * cols..(row + 1) * cols))
    }
}

/// A calling-runtime callback; carried only so it can be rejected by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRef {
    pub name: String,
}

impl FunctionRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
