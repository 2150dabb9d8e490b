//! # Simulated Host
//!
//! In-process stand-ins for a running host, so the bridge can be tested
//! without starting one.
//!
//! ## Purpose
//!
//! - Runs under `cargo test`
//! - Deterministic (no processes, no sockets)
//! - Inspectable (every request is recorded)
//!
//! [`EchoHost`] answers any literal with its canonical rendering, which makes
//! it a pure identity echo for round-trip tests. [`ScriptedChannel`] and
//! [`RecordingChannel`] cover tests that need fixed answers or need to count
//! round trips, and [`fault_injection`] wraps any channel with planned
//! failures.

pub mod fault_injection;
pub mod scripted;

pub use fault_injection::{ChannelFault, FaultPlan, FaultyChannel};
pub use scripted::{RecordingChannel, ScriptedChannel};

use bridge_types::{RemoteFault, DEFAULT_MAX_DEPTH};
use exec_channel::{ChannelError, ExecutionChannel};
use literal_codec::parse_literal;
use remote_exec::HostEvaluator;
use std::collections::HashMap;
use tracing::debug;

/// A host that echoes literals and remembers assignments
///
/// Request handling, in order:
/// 1. A request that matches a binding returns the bound text
/// 2. A request that is a literal returns the literal in canonical form
/// 3. `target = <literal>` binds `target` and returns `None`
/// 4. Anything else raises `NameError`
pub struct EchoHost {
    bindings: HashMap<String, String>,
    requests: Vec<String>,
    max_depth: usize,
}

impl EchoHost {
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
            requests: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Makes `source` answer with `response`
    pub fn with_binding(mut self, source: impl Into<String>, response: impl Into<String>) -> Self {
        self.bind(source, response);
        self
    }

    pub fn bind(&mut self, source: impl Into<String>, response: impl Into<String>) {
        self.bindings.insert(source.into(), response.into());
    }

    /// Returns the text currently bound to `source`
    pub fn binding(&self, source: &str) -> Option<&str> {
        self.bindings.get(source).map(String::as_str)
    }

    /// Every request received so far, in order
    pub fn requests(&self) -> &[String] {
        &self.requests
    }

    fn respond(&mut self, source: &str) -> Result<String, RemoteFault> {
        self.requests.push(source.to_string());

        if let Some(text) = self.bindings.get(source) {
            return Ok(text.clone());
        }
        if let Ok(literal) = parse_literal(source, self.max_depth) {
            return Ok(literal.to_source());
        }
        if let Some((target, value)) = split_assignment(source) {
            let literal = parse_literal(value, self.max_depth)
                .map_err(|err| RemoteFault::new("SyntaxError", err.to_string()))?;
            self.bindings.insert(target.to_string(), literal.to_source());
            return Ok("None".to_string());
        }
        Err(RemoteFault::new(
            "NameError",
            format!("name '{}' is not defined", source),
        ))
    }
}

impl Default for EchoHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionChannel for EchoHost {
    fn execute(&mut self, source: &str) -> Result<String, ChannelError> {
        debug!(source, "echo host request");
        self.respond(source)
            .map_err(|fault| ChannelError::Remote(fault.with_request(source)))
    }
}

impl HostEvaluator for EchoHost {
    fn evaluate(&mut self, source: &str) -> Result<String, RemoteFault> {
        self.respond(source)
    }
}

fn split_assignment(source: &str) -> Option<(&str, &str)> {
    let (target, value) = source.split_once(" = ")?;
    let target = target.trim();
    let starts_like_path = target
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_');
    if starts_like_path {
        Some((target, value.trim()))
    } else {
        None
    }
}
