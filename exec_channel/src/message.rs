//! Request and response envelopes for message transports

use bridge_types::RemoteFault;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Schema version of the execution envelopes (v1.0)
pub const EXEC_SCHEMA_VERSION: SchemaVersion = SchemaVersion::new(1, 0);

/// Unique identifier for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Creates a new random message ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Msg({})", self.0)
    }
}

/// Schema version for envelope payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version (breaking changes)
    pub major: u32,
    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl SchemaVersion {
    /// Creates a new schema version
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Same major version = compatible
    pub fn is_compatible_with(&self, other: &SchemaVersion) -> bool {
        self.major == other.major
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}", self.major, self.minor)
    }
}

/// One piece of source text to evaluate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub id: MessageId,
    pub version: SchemaVersion,
    pub source: String,
}

impl ExecutionRequest {
    /// Creates a request using the current schema version
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            version: EXEC_SCHEMA_VERSION,
            source: source.into(),
        }
    }

    /// Serializes the request (JSON for now)
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// What the host made of a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionOutcome {
    /// Literal text of the result
    Value(String),
    Fault(RemoteFault),
}

/// The host's answer, correlated to a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResponse {
    pub correlation_id: MessageId,
    pub version: SchemaVersion,
    pub outcome: ExecutionOutcome,
}

impl ExecutionResponse {
    /// Creates a successful response
    pub fn value(correlation_id: MessageId, text: impl Into<String>) -> Self {
        Self {
            correlation_id,
            version: EXEC_SCHEMA_VERSION,
            outcome: ExecutionOutcome::Value(text.into()),
        }
    }

    /// Creates a fault response
    pub fn fault(correlation_id: MessageId, fault: RemoteFault) -> Self {
        Self {
            correlation_id,
            version: EXEC_SCHEMA_VERSION,
            outcome: ExecutionOutcome::Fault(fault),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Converts the outcome into the channel's result shape
    pub fn into_result(self) -> Result<String, RemoteFault> {
        match self.outcome {
            ExecutionOutcome::Value(text) => Ok(text),
            ExecutionOutcome::Fault(fault) => Err(fault),
        }
    }
}
