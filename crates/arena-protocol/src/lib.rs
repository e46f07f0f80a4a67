//! arena-protocol
//!
//! Wire protocol for the arena match server: newline-delimited JSON frames
//! of the logical events defined in `arena-core`. Transport-agnostic: the
//! server feeds it lines, a client feeds it lines, nobody here does I/O.

pub mod json_codec;

pub use json_codec::{
    format_client_event, format_server_event, parse_client_line, parse_server_line, DecodeError,
};
