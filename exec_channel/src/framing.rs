//! Line framing for text transports
//!
//! One request or response is one line. Backslash, newline, and carriage
//! return inside the payload are escaped as `\\`, `\n`, and `\r`.
//!
//! A response line that begins with the fault marker (`!` by default) is a
//! fault: `!<kind>: <message>`. The marker cannot start a host literal or an
//! accessor path, so a normal result is never mistaken for a fault.

use bridge_types::RemoteFault;
use thiserror::Error;

/// Malformed framing on the wire
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("bad framing at byte {offset}: {reason}")]
pub struct FramingError {
    pub offset: usize,
    pub reason: String,
}

/// Escapes a payload so it fits on one line
pub fn frame_line(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

/// Reverses [`frame_line`]
pub fn unframe_line(line: &str) -> Result<String, FramingError> {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.char_indices();
    while let Some((offset, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some((_, '\\')) => out.push('\\'),
            Some((_, 'n')) => out.push('\n'),
            Some((_, 'r')) => out.push('\r'),
            Some((_, other)) => {
                return Err(FramingError {
                    offset,
                    reason: format!("unknown escape \\{}", other),
                })
            }
            None => {
                return Err(FramingError {
                    offset,
                    reason: "dangling backslash".to_string(),
                })
            }
        }
    }
    Ok(out)
}

/// Frames a host result, or a fault behind `marker`
pub fn frame_response(result: &Result<String, RemoteFault>, marker: &str) -> String {
    match result {
        Ok(text) => frame_line(text),
        Err(fault) if fault.kind.is_empty() => frame_line(&format!("{}{}", marker, fault.message)),
        Err(fault) => frame_line(&format!("{}{}: {}", marker, fault.kind, fault.message)),
    }
}

/// Reads one response line (without its terminator)
///
/// The outer `Result` reports framing problems; the inner one carries the
/// host's result or its fault.
pub fn parse_response_line(
    line: &str,
    marker: &str,
) -> Result<Result<String, RemoteFault>, FramingError> {
    let text = unframe_line(line)?;
    let Some(body) = text.strip_prefix(marker) else {
        return Ok(Ok(text));
    };
    Ok(Err(parse_fault(body)))
}

fn parse_fault(body: &str) -> RemoteFault {
    if let Some((kind, message)) = body.split_once(':') {
        let kind = kind.trim();
        let is_class_name = !kind.is_empty()
            && kind
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '.');
        if is_class_name {
            return RemoteFault::new(kind, message.trim_start());
        }
    }
    RemoteFault::new("", body)
}
