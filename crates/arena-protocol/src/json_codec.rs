// crates/arena-protocol/src/json_codec.rs

//! Line-oriented JSON codec.
//!
//! One event per line, UTF-8, discriminated by `"type"`.
//!
//! Inbound (lines → [`ClientEvent`]):
//!
//! - Identify:
//!   `{"type":"identify","address":"0xaaa","username":"alice"}`
//!
//! - Create:
//!   `{"type":"createGame","stake":0.01}`
//!
//! - Join:
//!   `{"type":"joinGame","matchId":"<uuid>"}`
//!
//! - Move (promotion optional, defaults to queen server-side):
//!   `{"type":"makeMove","matchId":"<uuid>","move":{"from":"e2","to":"e4"}}`
//!
//! - Resync:
//!   `{"type":"requestInitialGameState","matchId":"<uuid>"}`
//!
//! Outbound (`ServerEvent` → line): `gameCreated`, `gameState`,
//! `initialGameState`, `gameOver`, `error`: same tagging scheme, with
//! snapshots flattened into the event object.
//!
//! Anything that does not decode is surfaced as a [`DecodeError`] and
//! answered with an `invalidPayload` rejection; malformed frames never
//! reach game state.

use arena_core::{ClientEvent, ServerEvent};
use thiserror::Error;

/// Why an inbound line could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Blank frame (callers normally skip these before decoding).
    #[error("empty frame")]
    Empty,

    /// Not valid JSON, or a shape no event variant accepts.
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Parse a single line into a [`ClientEvent`].
pub fn parse_client_line(line: &str) -> Result<ClientEvent, DecodeError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(DecodeError::Empty);
    }

    Ok(serde_json::from_str(trimmed)?)
}

/// Parse a single line into a [`ServerEvent`] (client side of the wire).
pub fn parse_server_line(line: &str) -> Result<ServerEvent, DecodeError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(DecodeError::Empty);
    }

    Ok(serde_json::from_str(trimmed)?)
}

/// Format a [`ServerEvent`] as a single-line frame, no trailing newline.
pub fn format_server_event(event: &ServerEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(event)
}

/// Format a [`ClientEvent`] as a single-line frame, no trailing newline.
pub fn format_client_event(event: &ClientEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(event)
}
