//! # Bridge Control
//!
//! Command-line access to the literal codec, for inspecting what the bridge
//! sends to a host and how it reads the answer.
//!
//! ## Philosophy
//!
//! - **Offline**: No host is contacted; encode and decode are pure
//! - **JSON at the edge**: Inputs and outputs are JSON so the tool composes
//!   with other tooling
//! - **Same configuration as the library**: A config file plus flag overrides

pub mod commands;
pub mod json;

pub use commands::{resolve_config, run_command, BridgeCommand, CliError, ConfigOverrides};
pub use json::{json_to_value, value_to_json};
