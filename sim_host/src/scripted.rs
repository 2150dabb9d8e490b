//! Channels with canned answers and channels that record traffic

use bridge_types::RemoteFault;
use exec_channel::{ChannelError, ExecutionChannel};
use std::collections::VecDeque;

/// Answers requests from a queue, in order, regardless of their text
#[derive(Debug, Default)]
pub struct ScriptedChannel {
    responses: VecDeque<Result<String, RemoteFault>>,
    requests: Vec<String>,
}

impl ScriptedChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response
    pub fn with_value(mut self, text: impl Into<String>) -> Self {
        self.push_value(text);
        self
    }

    /// Queues a host fault
    pub fn with_fault(mut self, kind: impl Into<String>, message: impl Into<String>) -> Self {
        self.push_fault(kind, message);
        self
    }

    pub fn push_value(&mut self, text: impl Into<String>) {
        self.responses.push_back(Ok(text.into()));
    }

    pub fn push_fault(&mut self, kind: impl Into<String>, message: impl Into<String>) {
        self.responses.push_back(Err(RemoteFault::new(kind, message)));
    }

    pub fn requests(&self) -> &[String] {
        &self.requests
    }

    /// Number of queued responses not yet consumed
    pub fn remaining(&self) -> usize {
        self.responses.len()
    }
}

impl ExecutionChannel for ScriptedChannel {
    fn execute(&mut self, source: &str) -> Result<String, ChannelError> {
        self.requests.push(source.to_string());
        match self.responses.pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(fault)) => Err(ChannelError::Remote(fault.with_request(source))),
            None => Err(ChannelError::Transport(
                "no scripted response left".to_string(),
            )),
        }
    }
}

/// Passes requests through to another channel and records them
pub struct RecordingChannel<C> {
    inner: C,
    requests: Vec<String>,
}

impl<C: ExecutionChannel> RecordingChannel<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            requests: Vec::new(),
        }
    }

    pub fn requests(&self) -> &[String] {
        &self.requests
    }

    pub fn call_count(&self) -> usize {
        self.requests.len()
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: ExecutionChannel> ExecutionChannel for RecordingChannel<C> {
    fn execute(&mut self, source: &str) -> Result<String, ChannelError> {
        self.requests.push(source.to_string());
        self.inner.execute(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EchoHost;

    #[test]
    fn test_scripted_answers_in_order() {
        let mut channel = ScriptedChannel::new()
            .with_value("1")
            .with_fault("KeyError", "'k'");

        assert_eq!(channel.execute("a").unwrap(), "1");
        let err = channel.execute("b").unwrap_err();
        assert_eq!(
            err,
            ChannelError::Remote(RemoteFault::new("KeyError", "'k'").with_request("b"))
        );
        assert!(matches!(
            channel.execute("c"),
            Err(ChannelError::Transport(_))
        ));
        assert_eq!(channel.requests(), ["a", "b", "c"]);
        assert_eq!(channel.remaining(), 0);
    }

    #[test]
    fn test_recording_passes_through() {
        let mut channel = RecordingChannel::new(EchoHost::new());
        assert_eq!(channel.execute("True").unwrap(), "True");
        assert_eq!(channel.call_count(), 1);
        assert_eq!(channel.inner().requests(), ["True"]);
    }
}
