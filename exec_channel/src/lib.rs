//! # Remote Execution Channel
//!
//! This crate defines the contract between the bridge and a running host
//! process: send one piece of source text, get back its textual result.
//!
//! ## Philosophy
//!
//! - **Dumb pipe**: The channel never interprets the text it carries
//! - **One request in flight**: `execute` takes `&mut self` and blocks, so
//!   responses come back in request order
//! - **Faults are framed, not guessed**: Host errors arrive behind a reserved
//!   marker that no literal or accessor can start with
//! - **No retries, no timeouts**: Callers that need them wrap the channel
//!
//! ## Architecture
//!
//! - [`ExecutionChannel`]: the one-method contract
//! - [`framing`]: line framing and fault lines for text transports
//! - [`StreamChannel`]: a line-framed channel over an open stream pair
//! - [`message`]: serializable request/response envelopes for message
//!   transports

pub mod channel;
pub mod framing;
pub mod message;
pub mod stream;

pub use channel::{ChannelError, ChannelId, ExecutionChannel};
pub use framing::{frame_line, frame_response, parse_response_line, unframe_line, FramingError};
pub use message::{
    ExecutionOutcome, ExecutionRequest, ExecutionResponse, MessageId, SchemaVersion,
    EXEC_SCHEMA_VERSION,
};
pub use stream::StreamChannel;
