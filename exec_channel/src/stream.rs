//! Line-oriented channel over any reader/writer pair

use crate::channel::{ChannelError, ChannelId, ExecutionChannel};
use crate::framing::{frame_line, parse_response_line};
use bridge_types::{validate_fault_marker, BridgeConfig, ConfigError, DEFAULT_FAULT_MARKER};
use std::io::{BufRead, Write};
use tracing::debug;

/// Talks to a host over a pair of byte streams, one line per message
///
/// Works over a socket, a child process's stdio, or in-memory buffers in
/// tests.
pub struct StreamChannel<R, W> {
    id: ChannelId,
    reader: R,
    writer: W,
    fault_marker: String,
}

impl<R: BufRead, W: Write> StreamChannel<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            id: ChannelId::new(),
            reader,
            writer,
            fault_marker: DEFAULT_FAULT_MARKER.to_string(),
        }
    }

    /// Uses a different fault marker (must match the host side)
    ///
    /// Markers that could begin a normal result are rejected.
    pub fn with_fault_marker(mut self, marker: impl Into<String>) -> Result<Self, ConfigError> {
        let marker = marker.into();
        validate_fault_marker(&marker)?;
        self.fault_marker = marker;
        Ok(self)
    }

    /// Creates a channel using the fault marker from `config`
    pub fn from_config(reader: R, writer: W, config: &BridgeConfig) -> Result<Self, ConfigError> {
        Self::new(reader, writer).with_fault_marker(config.fault_marker.as_str())
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// Gives back the underlying streams
    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl<R: BufRead, W: Write> ExecutionChannel for StreamChannel<R, W> {
    fn execute(&mut self, source: &str) -> Result<String, ChannelError> {
        debug!(channel = %self.id, source, "sending request");
        writeln!(self.writer, "{}", frame_line(source))?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(ChannelError::Transport(
                "host closed the channel".to_string(),
            ));
        }
        let line = line.trim_end_matches(['\n', '\r']);

        let result = parse_response_line(line, &self.fault_marker)
            .map_err(|err| ChannelError::Transport(err.to_string()))?;
        match result {
            Ok(text) => {
                debug!(channel = %self.id, response = %text, "received result");
                Ok(text)
            }
            Err(fault) => {
                debug!(channel = %self.id, kind = %fault.kind, "received fault");
                Err(ChannelError::Remote(fault.with_request(source)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_types::RemoteFault;
    use std::io::Cursor;

    fn channel(host_output: &str) -> StreamChannel<Cursor<Vec<u8>>, Vec<u8>> {
        StreamChannel::new(Cursor::new(host_output.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_request_is_framed() {
        let mut ch = channel("None\n");
        assert_eq!(ch.execute("a = 1\nb = 2").unwrap(), "None");
        let (_, written) = ch.into_parts();
        assert_eq!(String::from_utf8(written).unwrap(), "a = 1\\nb = 2\n");
    }

    #[test]
    fn test_results_in_order() {
        let mut ch = channel("'a'\r\n[1, 2]\n");
        assert_eq!(ch.execute("x").unwrap(), "'a'");
        assert_eq!(ch.execute("y").unwrap(), "[1, 2]");
    }

    #[test]
    fn test_fault_carries_request() {
        let mut ch = channel("!NameError: name 'nope' is not defined\n");
        let err = ch.execute("nope").unwrap_err();
        let expected = RemoteFault::new("NameError", "name 'nope' is not defined")
            .with_request("nope");
        assert_eq!(err, ChannelError::Remote(expected));
    }

    #[test]
    fn test_custom_marker() {
        let mut ch = channel("#ValueError: bad\n!x\n")
            .with_fault_marker("#")
            .unwrap();
        assert!(matches!(ch.execute("a"), Err(ChannelError::Remote(_))));
        assert_eq!(ch.execute("b").unwrap(), "!x");
    }

    #[test]
    fn test_ambiguous_marker_rejected() {
        for marker in ["", "'", "[", "4", "None"] {
            assert!(
                channel("42\n").with_fault_marker(marker).is_err(),
                "marker {:?} should be rejected",
                marker
            );
        }
    }

    #[test]
    fn test_from_config() {
        let config = BridgeConfig::from_json_str(r#"{"fault_marker": "%%"}"#).unwrap();
        let mut ch = StreamChannel::from_config(
            Cursor::new(b"%%KeyError: 'k'\n42\n".to_vec()),
            Vec::new(),
            &config,
        )
        .unwrap();
        assert!(matches!(ch.execute("a"), Err(ChannelError::Remote(_))));
        assert_eq!(ch.execute("b").unwrap(), "42");

        let bad = BridgeConfig {
            fault_marker: "\"".to_string(),
            ..BridgeConfig::default()
        };
        assert!(StreamChannel::from_config(Cursor::new(Vec::new()), Vec::new(), &bad).is_err());
    }

    #[test]
    fn test_closed_stream_is_transport_error() {
        let mut ch = channel("");
        assert!(matches!(ch.execute("x"), Err(ChannelError::Transport(_))));
    }

    #[test]
    fn test_bad_framing_is_transport_error() {
        let mut ch = channel("oops\\q\n");
        assert!(matches!(ch.execute("x"), Err(ChannelError::Transport(_))));
    }
}
