//! # Literal Codec
//!
//! Converts bridge values to host literal text and back.
//!
//! ## Philosophy
//!
//! - **Pure**: No I/O and no state; every function is a text transform
//! - **Grammar, not evaluation**: Host output is read by a small
//!   recursive-descent parser over the literal grammar only
//! - **Tag-directed**: The decoder is told the expected [`ValueKind`] and
//!   checks the parsed literal against it
//!
//! ## Host literal grammar
//!
//! `None`, `True`, `False`, integers, floats (plus `inf`, `nan`, and
//! `float('...')`), single- or double-quoted strings with backslash escapes,
//! lists, tuples, sets (`set()` when empty), and dicts.
//!
//! [`ValueKind`]: bridge_types::ValueKind

pub mod decoder;
pub mod encoder;
pub mod literal;
pub mod parser;

pub use decoder::{decode, decode_any, decode_handle};
pub use encoder::{
    encode, encode_bool, encode_call_args, encode_enum_set, encode_float, encode_integer,
    encode_null, encode_string,
};
pub use literal::Literal;
pub use parser::{parse_literal, ParseError};
