//! # Bridge Commands
//!
//! ## Command Set
//!
//! - `encode <json>` - Print the host literal for a JSON value
//! - `decode <kind> <text>` - Decode host text as `kind` and print JSON

use crate::json::{json_to_value, value_to_json};
use bridge_types::{
    BridgeConfig, ConfigError, IntegerRange, UndecodableTextError, UnencodableValueError,
    ValueKind,
};
use literal_codec::{decode, encode};
use std::path::Path;
use thiserror::Error;

/// Command error types
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Missing argument: {0}")]
    MissingArgument(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Unknown kind: {0}")]
    UnknownKind(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Unencodable(#[from] UnencodableValueError),

    #[error(transparent)]
    Undecodable(#[from] UndecodableTextError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum BridgeCommand {
    /// Encode a JSON value as a host literal
    Encode { json: serde_json::Value },

    /// Decode host text as the given kind
    Decode { kind: ValueKind, text: String },
}

impl BridgeCommand {
    /// Parses the positional arguments that follow the options
    pub fn parse(args: &[String]) -> Result<Self, CliError> {
        let Some(cmd) = args.first() else {
            return Err(CliError::MissingArgument("command (encode, decode)".to_string()));
        };

        match cmd.as_str() {
            "encode" => {
                let text = args
                    .get(1)
                    .ok_or_else(|| CliError::MissingArgument("JSON value".to_string()))?;
                let json = serde_json::from_str(text)
                    .map_err(|err| CliError::InvalidInput(err.to_string()))?;
                Ok(BridgeCommand::Encode { json })
            }
            "decode" => {
                let name = args
                    .get(1)
                    .ok_or_else(|| CliError::MissingArgument("kind".to_string()))?;
                let kind = ValueKind::from_name(name)
                    .ok_or_else(|| CliError::UnknownKind(name.clone()))?;
                let text = args
                    .get(2)
                    .ok_or_else(|| CliError::MissingArgument("host text".to_string()))?;
                Ok(BridgeCommand::Decode {
                    kind,
                    text: text.clone(),
                })
            }
            other => Err(CliError::UnknownCommand(other.to_string())),
        }
    }
}

/// Flag values that take precedence over the config file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub int64: bool,
    pub max_depth: Option<usize>,
}

/// Loads the config file (if any), applies overrides, and validates
pub fn resolve_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<BridgeConfig, CliError> {
    let mut config = match path {
        Some(path) => BridgeConfig::load_from(path)?,
        None => BridgeConfig::default(),
    };
    if overrides.int64 {
        config.integer_range = IntegerRange::Int64;
    }
    if let Some(depth) = overrides.max_depth {
        config.max_depth = depth;
    }
    config.validate()?;
    Ok(config)
}

/// Runs a command and returns the text to print
pub fn run_command(command: &BridgeCommand, config: &BridgeConfig) -> Result<String, CliError> {
    match command {
        BridgeCommand::Encode { json } => {
            let value = json_to_value(json)?;
            tracing::debug!(kind = value.kind_name(), "encoding");
            Ok(encode(&value, config)?)
        }
        BridgeCommand::Decode { kind, text } => {
            tracing::debug!(%kind, "decoding");
            let value = decode(text, kind, config)?;
            Ok(value_to_json(&value).to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_encode() {
        let cmd = BridgeCommand::parse(&args(&["encode", "[1, 2]"])).unwrap();
        assert_eq!(
            cmd,
            BridgeCommand::Encode {
                json: serde_json::json!([1, 2])
            }
        );
    }

    #[test]
    fn test_parse_decode() {
        let cmd = BridgeCommand::parse(&args(&["decode", "bool", "True"])).unwrap();
        assert_eq!(
            cmd,
            BridgeCommand::Decode {
                kind: ValueKind::Boolean,
                text: "True".to_string()
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            BridgeCommand::parse(&[]),
            Err(CliError::MissingArgument(_))
        ));
        assert!(matches!(
            BridgeCommand::parse(&args(&["frobnicate"])),
            Err(CliError::UnknownCommand(_))
        ));
        assert!(matches!(
            BridgeCommand::parse(&args(&["decode", "vector", "[]"])),
            Err(CliError::UnknownKind(_))
        ));
        assert!(matches!(
            BridgeCommand::parse(&args(&["decode", "int"])),
            Err(CliError::MissingArgument(_))
        ));
        assert!(matches!(
            BridgeCommand::parse(&args(&["encode", "{oops"])),
            Err(CliError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_run_encode() {
        let config = BridgeConfig::default();
        let cmd = BridgeCommand::parse(&args(&["encode", r#"{"name": "a\"b", "n": null}"#])).unwrap();
        assert_eq!(
            run_command(&cmd, &config).unwrap(),
            r#"{"n": None, "name": "a\"b"}"#
        );
    }

    #[test]
    fn test_run_decode() {
        let config = BridgeConfig::default();
        let cmd = BridgeCommand::parse(&args(&["decode", "list", "['x', 'y']"])).unwrap();
        assert_eq!(run_command(&cmd, &config).unwrap(), r#"["x","y"]"#);

        let cmd = BridgeCommand::parse(&args(&["decode", "bool", "Tru"])).unwrap();
        assert!(matches!(
            run_command(&cmd, &config),
            Err(CliError::Undecodable(_))
        ));
    }

    #[test]
    fn test_overrides_apply() {
        let overrides = ConfigOverrides {
            int64: true,
            max_depth: Some(8),
        };
        let config = resolve_config(None, &overrides).unwrap();
        assert_eq!(config.integer_range, IntegerRange::Int64);
        assert_eq!(config.max_depth, 8);

        let bad = ConfigOverrides {
            int64: false,
            max_depth: Some(0),
        };
        assert!(matches!(
            resolve_config(None, &bad),
            Err(CliError::Config(ConfigError::Invalid(_)))
        ));
    }
}
