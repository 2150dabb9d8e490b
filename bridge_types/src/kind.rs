//! Expected-kind tags for decoding

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind a caller expects the host's text to decode to
///
/// Decoding dispatches on this tag. `Any` is the generic fallback and only
/// ever runs the literal grammar; it never evaluates host output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// Whatever the literal grammar produces
    Any,
    /// `None`
    Null,
    Boolean,
    Integer,
    Float,
    String,
    /// A member name of a host enumeration
    Enum,
    /// An unordered set of enumeration member names
    EnumSet,
    /// A list whose elements all decode to the given kind
    Array(Box<ValueKind>),
    /// A rectangular list of lists
    MultiDimArray(Box<ValueKind>),
    /// A fixed-arity sequence with one kind per position
    Tuple(Vec<ValueKind>),
    /// A mapping from string keys to values of the given kind
    Dict(Box<ValueKind>),
    /// A remote object; the response text is an accessor path
    Object,
}

impl ValueKind {
    pub fn array_of(element: ValueKind) -> Self {
        ValueKind::Array(Box::new(element))
    }

    pub fn matrix_of(element: ValueKind) -> Self {
        ValueKind::MultiDimArray(Box::new(element))
    }

    pub fn dict_of(value: ValueKind) -> Self {
        ValueKind::Dict(Box::new(value))
    }

    /// Parses the short kind names used on the command line
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "any" => ValueKind::Any,
            "null" | "none" => ValueKind::Null,
            "bool" => ValueKind::Boolean,
            "int" => ValueKind::Integer,
            "float" => ValueKind::Float,
            "str" => ValueKind::String,
            "enum" => ValueKind::Enum,
            "enumset" => ValueKind::EnumSet,
            "list" => ValueKind::array_of(ValueKind::Any),
            "dict" => ValueKind::dict_of(ValueKind::Any),
            "object" => ValueKind::Object,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Any => write!(f, "any"),
            ValueKind::Null => write!(f, "null"),
            ValueKind::Boolean => write!(f, "bool"),
            ValueKind::Integer => write!(f, "int"),
            ValueKind::Float => write!(f, "float"),
            ValueKind::String => write!(f, "str"),
            ValueKind::Enum => write!(f, "enum"),
            ValueKind::EnumSet => write!(f, "enumset"),
            ValueKind::Array(element) => write!(f, "list[{}]", element),
            ValueKind::MultiDimArray(element) => write!(f, "matrix[{}]", element),
            ValueKind::Tuple(elements) => {
                write!(f, "tuple[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, "]")
            }
            ValueKind::Dict(value) => write!(f, "dict[str, {}]", value),
            ValueKind::Object => write!(f, "object"),
        }
    }
}
