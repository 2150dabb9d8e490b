//! Bridge configuration
//!
//! Settings are plain data with defaults baked in. A JSON file may override
//! any subset of them; unknown keys are rejected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Default nesting limit for encoding and parsing
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default prefix that marks a fault line on the wire
pub const DEFAULT_FAULT_MARKER: &str = "!";

/// Integer range accepted by the encoder and decoder
///
/// Values outside the range are rejected, never wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegerRange {
    /// Signed 32-bit, the width of the host API's integer fields
    #[default]
    Int32,
    /// Signed 64-bit
    Int64,
}

impl IntegerRange {
    pub const fn min(self) -> i64 {
        match self {
            IntegerRange::Int32 => i32::MIN as i64,
            IntegerRange::Int64 => i64::MIN,
        }
    }

    pub const fn max(self) -> i64 {
        match self {
            IntegerRange::Int32 => i32::MAX as i64,
            IntegerRange::Int64 => i64::MAX,
        }
    }

    pub fn contains(self, value: i64) -> bool {
        (self.min()..=self.max()).contains(&value)
    }

    /// Same check for a literal that may not fit in `i64`
    pub fn contains_wide(self, value: i128) -> bool {
        (self.min() as i128..=self.max() as i128).contains(&value)
    }
}

impl fmt::Display for IntegerRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegerRange::Int32 => write!(f, "int32"),
            IntegerRange::Int64 => write!(f, "int64"),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Checks that `marker` cannot be confused with the start of a result
///
/// Anything that can begin a literal, an identifier, or a parenthesised
/// expression would make fault detection ambiguous.
pub fn validate_fault_marker(marker: &str) -> Result<(), ConfigError> {
    let Some(first) = marker.chars().next() else {
        return Err(ConfigError::Invalid("fault_marker must not be empty".to_string()));
    };
    if first.is_alphanumeric()
        || first.is_whitespace()
        || matches!(first, '_' | '"' | '\'' | '[' | '(' | '{' | '-' | '+' | '.')
    {
        return Err(ConfigError::Invalid(format!(
            "fault_marker {:?} can begin a host expression",
            marker
        )));
    }
    Ok(())
}

/// Settings shared by the encoder, decoder, and channels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    pub integer_range: IntegerRange,
    /// Maximum container nesting when encoding or parsing
    pub max_depth: usize,
    /// Reserved prefix of fault lines; must not be able to start a literal or
    /// an accessor path
    pub fault_marker: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            integer_range: IntegerRange::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            fault_marker: DEFAULT_FAULT_MARKER.to_string(),
        }
    }
}

impl BridgeConfig {
    /// Sets the integer range
    pub fn with_integer_range(mut self, range: IntegerRange) -> Self {
        self.integer_range = range;
        self
    }

    /// Sets the nesting limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parses and validates a JSON config document
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: BridgeConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON config file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be at least 1".to_string()));
        }
        validate_fault_marker(&self.fault_marker)?;
        Ok(())
    }
}
