//! Remote object handles

use crate::error::UnencodableValueError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A reference to an object that lives only in the host process
///
/// The handle stores the accessor path: a host expression that yields the
/// object when evaluated. Nothing is cached; every read re-evaluates a path
/// derived from this one.
///
/// Two handles are equal only when their accessor text is equal. Two
/// different paths that reach the same host object are not detected as
/// aliases.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RemoteHandle {
    accessor: String,
}

impl RemoteHandle {
    /// Creates a handle from an accessor path the caller already trusts
    pub fn new(accessor: impl Into<String>) -> Self {
        Self {
            accessor: accessor.into(),
        }
    }

    /// Returns the accessor path
    pub fn accessor(&self) -> &str {
        &self.accessor
    }

    /// Consumes the handle, returning the accessor path
    pub fn into_accessor(self) -> String {
        self.accessor
    }

    /// Returns the handle for `self.field`
    ///
    /// The field name must be a plain host identifier so it cannot alter the
    /// structure of the composed expression.
    pub fn child(&self, field: &str) -> Result<Self, UnencodableValueError> {
        check_identifier(field)?;
        Ok(Self::new(format!("{}.{}", self.accessor, field)))
    }

    /// Returns the handle for `self[index]`
    pub fn index(&self, index: i64) -> Self {
        Self::new(format!("{}[{}]", self.accessor, index))
    }

    /// Returns the handle for `self[<literal>]` where `literal` is already
    /// encoded host text
    pub fn subscript_literal(&self, literal: &str) -> Self {
        Self::new(format!("{}[{}]", self.accessor, literal))
    }
}

impl fmt::Display for RemoteHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Remote({})", self.accessor)
    }
}

impl From<&str> for RemoteHandle {
    fn from(accessor: &str) -> Self {
        Self::new(accessor)
    }
}

/// Checks whether `name` is a host identifier (`[A-Za-z_][A-Za-z0-9_]*`)
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub(crate) fn check_identifier(name: &str) -> Result<(), UnencodableValueError> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(UnencodableValueError::InvalidIdentifier(name.to_string()))
    }
}
