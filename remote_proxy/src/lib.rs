//! # Remote Object Proxy
//!
//! Reads, writes, and calls on objects that live only in the host process.
//!
//! ## Philosophy
//!
//! - **Paths, not copies**: A [`RemoteHandle`] is the accessor expression
//!   that yields the object; reading a field composes a longer expression
//! - **No caching**: Every read is a fresh round trip
//! - **Encode before send**: Arguments are encoded before the channel is
//!   touched, so an unencodable argument never reaches the host
//!
//! ## Layers
//!
//! - [`access`]: free functions taking `(channel, handle, ...)`
//! - [`Bridge`] and [`RemoteObject`]: the same operations with the channel
//!   and configuration bundled
//!
//! [`RemoteHandle`]: bridge_types::RemoteHandle

pub mod access;
pub mod object;

pub use access::{
    call_constructor, call_method, evaluate, get_field, key, read_value, set_field,
};
pub use object::{Bridge, RemoteObject};
