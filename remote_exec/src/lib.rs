//! Remote execution over a message transport.
//!
//! The client wraps each source text in an [`ExecutionRequest`] envelope and
//! expects an [`ExecutionResponse`] carrying the same id back. The server
//! side hands requests to a [`HostEvaluator`] and wraps its answer.

use bridge_types::RemoteFault;
use exec_channel::{
    ChannelError, ExecutionChannel, ExecutionOutcome, ExecutionRequest, ExecutionResponse,
    MessageId, SchemaVersion, EXEC_SCHEMA_VERSION,
};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum RemoteExecError {
    #[error("Codec error: {0}")]
    Codec(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Response {actual} does not answer request {expected}")]
    CorrelationMismatch {
        expected: MessageId,
        actual: MessageId,
    },

    #[error("Incompatible schema {actual} (expected {expected})")]
    SchemaMismatch {
        expected: SchemaVersion,
        actual: SchemaVersion,
    },
}

impl From<serde_json::Error> for RemoteExecError {
    fn from(err: serde_json::Error) -> Self {
        RemoteExecError::Codec(err.to_string())
    }
}

/// Moves opaque frames between client and host
pub trait RemoteTransport {
    fn send(&mut self, frame: Vec<u8>) -> Result<(), RemoteExecError>;
    fn receive(&mut self) -> Result<Vec<u8>, RemoteExecError>;
}

/// Evaluates source text inside the host
pub trait HostEvaluator {
    fn evaluate(&mut self, source: &str) -> Result<String, RemoteFault>;
}

pub struct RemoteExecClient<T: RemoteTransport> {
    transport: T,
}

impl<T: RemoteTransport> RemoteExecClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Sends one request and waits for its response
    pub fn call(&mut self, source: &str) -> Result<ExecutionOutcome, RemoteExecError> {
        let request = ExecutionRequest::new(source);
        debug!(id = %request.id, "sending execution request");
        self.transport.send(request.to_bytes()?)?;

        let response = ExecutionResponse::from_bytes(&self.transport.receive()?)?;
        check_version(&response.version)?;
        if response.correlation_id != request.id {
            return Err(RemoteExecError::CorrelationMismatch {
                expected: request.id,
                actual: response.correlation_id,
            });
        }
        Ok(response.outcome)
    }

    pub fn into_transport(self) -> T {
        self.transport
    }
}

impl<T: RemoteTransport> ExecutionChannel for RemoteExecClient<T> {
    fn execute(&mut self, source: &str) -> Result<String, ChannelError> {
        match self.call(source) {
            Ok(ExecutionOutcome::Value(text)) => Ok(text),
            Ok(ExecutionOutcome::Fault(fault)) => {
                Err(ChannelError::Remote(fault.with_request(source)))
            }
            Err(err) => {
                warn!(error = %err, "remote execution failed");
                Err(ChannelError::Transport(err.to_string()))
            }
        }
    }
}

pub struct RemoteExecServer<E: HostEvaluator> {
    evaluator: E,
}

impl<E: HostEvaluator> RemoteExecServer<E> {
    pub fn new(evaluator: E) -> Self {
        Self { evaluator }
    }

    /// Handles one request frame and produces the response frame
    pub fn handle_frame(&mut self, frame: &[u8]) -> Result<Vec<u8>, RemoteExecError> {
        let request = ExecutionRequest::from_bytes(frame)?;
        check_version(&request.version)?;

        let response = match self.evaluator.evaluate(&request.source) {
            Ok(text) => ExecutionResponse::value(request.id, text),
            Err(fault) => {
                debug!(id = %request.id, kind = %fault.kind, "host raised");
                ExecutionResponse::fault(request.id, fault)
            }
        };
        Ok(response.to_bytes()?)
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }
}

fn check_version(actual: &SchemaVersion) -> Result<(), RemoteExecError> {
    if EXEC_SCHEMA_VERSION.is_compatible_with(actual) {
        Ok(())
    } else {
        Err(RemoteExecError::SchemaMismatch {
            expected: EXEC_SCHEMA_VERSION,
            actual: *actual,
        })
    }
}
