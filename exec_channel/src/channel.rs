//! Channel abstraction for remote execution

use bridge_types::{BridgeError, RemoteFault};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a channel, used to tag log output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(Uuid);

impl ChannelId {
    /// Creates a new random channel ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ChannelId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Channel({})", self.0)
    }
}

/// Errors from a single round trip
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ChannelError {
    /// The host evaluated the request and reported an error
    #[error(transparent)]
    Remote(#[from] RemoteFault),

    /// The round trip itself failed; the request may or may not have run
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<std::io::Error> for ChannelError {
    fn from(error: std::io::Error) -> Self {
        ChannelError::Transport(error.to_string())
    }
}

impl From<ChannelError> for BridgeError {
    fn from(error: ChannelError) -> Self {
        match error {
            ChannelError::Remote(fault) => BridgeError::Remote(fault),
            ChannelError::Transport(message) => BridgeError::Transport(message),
        }
    }
}

/// A synchronous connection to an already-running host
///
/// `execute` blocks until the host answers. Taking `&mut self` keeps exactly
/// one request outstanding per channel; sharing a host between callers needs
/// a lock around the channel.
pub trait ExecutionChannel {
    /// Sends one expression or statement and returns the host's textual result
    fn execute(&mut self, source: &str) -> Result<String, ChannelError>;
}

impl<C: ExecutionChannel + ?Sized> ExecutionChannel for &mut C {
    fn execute(&mut self, source: &str) -> Result<String, ChannelError> {
        (**self).execute(source)
    }
}

impl<C: ExecutionChannel + ?Sized> ExecutionChannel for Box<C> {
    fn execute(&mut self, source: &str) -> Result<String, ChannelError> {
        (**self).execute(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl ExecutionChannel for Upper {
        fn execute(&mut self, source: &str) -> Result<String, ChannelError> {
            Ok(source.to_uppercase())
        }
    }

    #[test]
    fn test_channel_id_creation() {
        let id1 = ChannelId::new();
        let id2 = ChannelId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_channel_id_display() {
        let id = ChannelId::new();
        assert!(format!("{}", id).starts_with("Channel("));
    }

    fn run<C: ExecutionChannel>(mut channel: C, source: &str) -> String {
        channel.execute(source).unwrap()
    }

    #[test]
    fn test_channel_through_references() {
        let mut inner = Upper;
        assert_eq!(run(&mut inner, "a"), "A");

        let mut boxed: Box<dyn ExecutionChannel> = Box::new(Upper);
        assert_eq!(boxed.execute("b").unwrap(), "B");
    }

    #[test]
    fn test_channel_error_into_bridge_error() {
        let fault = RemoteFault::new("KeyError", "'x'");
        let err: BridgeError = ChannelError::Remote(fault.clone()).into();
        assert_eq!(err, BridgeError::Remote(fault));

        let err: BridgeError = ChannelError::Transport("closed".to_string()).into();
        assert_eq!(err, BridgeError::Transport("closed".to_string()));
    }
}
