//! # Bridge Types
//!
//! This crate defines the values, kinds, and errors shared by every layer of
//! the host bridge.
//!
//! ## Philosophy
//!
//! - **Kinds are explicit**: The decoder is told what it is reading; it never
//!   guesses from the shape of the text.
//! - **Handles are paths, not copies**: A remote object is named by the host
//!   expression that yields it.
//! - **Failures are typed**: Encode, decode, and remote faults are distinct.
//!
//! ## Key Types
//!
//! - [`Value`]: A value the bridge can encode or decode
//! - [`ValueKind`]: The expected kind tag handed to the decoder
//! - [`RemoteHandle`]: An accessor path naming an object in the host
//! - [`BridgeConfig`]: Integer range, nesting limit, fault marker
//! - [`BridgeError`]: Unencodable, undecodable, remote, or transport failure

pub mod config;
pub mod error;
pub mod handle;
pub mod kind;
pub mod value;

pub use config::{
    validate_fault_marker, BridgeConfig, ConfigError, IntegerRange, DEFAULT_FAULT_MARKER,
    DEFAULT_MAX_DEPTH,
};
pub use error::{
    BridgeError, BridgeResult, RemoteFault, UndecodableTextError, UnencodableValueError,
};
pub use handle::{is_identifier, RemoteHandle};
pub use kind::ValueKind;
pub use value::{FunctionRef, Matrix, Value};
