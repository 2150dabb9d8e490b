//! Bridge error types

use crate::config::IntegerRange;
use crate::kind::ValueKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// A value has no host literal form
///
/// Always raised before any text is sent to the host.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UnencodableValueError {
    /// Callbacks cannot cross the bridge by value
    #[error("function `{name}` cannot be encoded as a host literal")]
    Function { name: String },

    #[error("integer {value} is outside the {range} range")]
    IntegerOutOfRange { value: i64, range: IntegerRange },

    /// Array elements must share one kind (nulls excepted)
    #[error("array mixes {first} and {other} elements")]
    MixedArray {
        first: &'static str,
        other: &'static str,
    },

    #[error("matrix shape {rows}x{cols} does not match {len} items")]
    MatrixShape { rows: usize, cols: usize, len: usize },

    /// Field, method, or keyword name that is not a host identifier
    #[error("`{0}` is not a valid host identifier")]
    InvalidIdentifier(String),

    #[error("value nesting exceeds the limit of {0}")]
    TooDeep(usize),
}

/// Host text does not match the grammar of the expected kind
///
/// The request that produced the text has already run on the host.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("cannot decode {text:?} as {expected} at offset {offset}: {reason}")]
pub struct UndecodableTextError {
    /// The offending text, as received
    pub text: String,
    pub expected: ValueKind,
    /// Byte offset into `text` where decoding failed
    pub offset: usize,
    pub reason: String,
}

impl UndecodableTextError {
    pub fn new(
        text: impl Into<String>,
        expected: ValueKind,
        offset: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            expected,
            offset,
            reason: reason.into(),
        }
    }
}

/// The host reported an error while evaluating a request
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("remote fault ({kind}) evaluating {request:?}: {message}")]
pub struct RemoteFault {
    /// Host error class, empty if the host did not name one
    pub kind: String,
    pub message: String,
    /// The request text that faulted
    pub request: String,
}

impl RemoteFault {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            request: String::new(),
        }
    }

    /// Attaches the request text that produced this fault
    pub fn with_request(mut self, request: impl Into<String>) -> Self {
        self.request = request.into();
        self
    }
}

/// Errors surfaced to callers of the bridge
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BridgeError {
    #[error(transparent)]
    Unencodable(#[from] UnencodableValueError),

    #[error(transparent)]
    Undecodable(#[from] UndecodableTextError),

    #[error(transparent)]
    Remote(#[from] RemoteFault),

    /// The channel itself failed (closed pipe, framing, correlation)
    #[error("transport error: {0}")]
    Transport(String),
}

impl BridgeError {
    /// True when the host executed the request but its result could not be
    /// decoded
    pub fn is_partial(&self) -> bool {
        matches!(self, BridgeError::Undecodable(_))
    }

    /// True when nothing was sent to the host
    pub fn is_before_send(&self) -> bool {
        matches!(self, BridgeError::Unencodable(_))
    }
}
