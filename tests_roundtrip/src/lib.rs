//! # Round-Trip Integration Tests
//!
//! End-to-end tests that push values through encoder, channel, and decoder
//! against simulated hosts.
//!
//! ## Test Philosophy
//!
//! - **Identity echo**: A host that re-renders literals must give back
//!   exactly what was sent
//! - **Fail before send**: Unencodable values never reach the channel
//! - **Partial failure is visible**: A decode error after a successful
//!   round trip is reported as such
//! - **Real framing**: Stream and message transports are exercised with the
//!   host side simulated in-process
//!
//! The helpers below are shared by the files under `tests/`.

use bridge_types::{BridgeConfig, BridgeResult, ConfigError, Value, ValueKind};
use exec_channel::{frame_response, unframe_line, ExecutionChannel, StreamChannel};
use literal_codec::{decode, encode};
use remote_exec::{HostEvaluator, RemoteExecError, RemoteExecServer, RemoteTransport};
use sim_host::EchoHost;
use std::io::Cursor;

/// Encodes `value`, echoes it through a fresh [`EchoHost`], and decodes it
/// as `kind`
pub fn echo_round_trip(value: &Value, kind: &ValueKind, config: &BridgeConfig) -> BridgeResult<Value> {
    let mut host = EchoHost::new();
    let text = encode(value, config)?;
    let response = host.execute(&text)?;
    Ok(decode(&response, kind, config)?)
}

/// Plays the host side of a line-framed stream
///
/// Each line of `requests` is unframed and evaluated; the framed responses
/// are returned in order, ready to be read back by a [`StreamChannel`].
pub fn serve_lines<E: HostEvaluator>(host: &mut E, requests: &str, marker: &str) -> String {
    let mut out = String::new();
    for line in requests.lines() {
        let result = match unframe_line(line) {
            Ok(source) => host.evaluate(&source),
            Err(err) => Err(bridge_types::RemoteFault::new("SyntaxError", err.to_string())),
        };
        out.push_str(&frame_response(&result, marker));
        out.push('\n');
    }
    out
}

/// A stream channel whose host output was produced ahead of time
pub type ReplayChannel = StreamChannel<Cursor<Vec<u8>>, Vec<u8>>;

/// Serves `sources` with `host` and returns a channel that replays the
/// answers
pub fn replay_channel<E: HostEvaluator>(
    host: &mut E,
    sources: &[&str],
    marker: &str,
) -> Result<ReplayChannel, ConfigError> {
    let requests: String = sources
        .iter()
        .map(|source| format!("{}\n", exec_channel::frame_line(source)))
        .collect();
    let output = serve_lines(host, &requests, marker);
    StreamChannel::new(Cursor::new(output.into_bytes()), Vec::new()).with_fault_marker(marker)
}

/// Message transport that hands each frame straight to an in-process server
pub struct Loopback<E: HostEvaluator> {
    server: RemoteExecServer<E>,
    pending: Option<Vec<u8>>,
}

impl<E: HostEvaluator> Loopback<E> {
    pub fn new(evaluator: E) -> Self {
        Self {
            server: RemoteExecServer::new(evaluator),
            pending: None,
        }
    }

    pub fn evaluator(&self) -> &E {
        self.server.evaluator()
    }
}

impl<E: HostEvaluator> RemoteTransport for Loopback<E> {
    fn send(&mut self, frame: Vec<u8>) -> Result<(), RemoteExecError> {
        self.pending = Some(self.server.handle_frame(&frame)?);
        Ok(())
    }

    fn receive(&mut self) -> Result<Vec<u8>, RemoteExecError> {
        self.pending
            .take()
            .ok_or(RemoteExecError::Transport("no response pending".to_string()))
    }
}
