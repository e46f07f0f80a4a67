//! Logical client/server events exchanged over a connection.
//!
//! These are **transport-agnostic**: the JSON framing lives in the
//! `arena-protocol` crate; this module is purely logical. Every event is a
//! tagged variant so the dispatcher can match exhaustively; unknown or
//! malformed shapes fail at the decode boundary as `invalidPayload` instead
//! of reaching game state.

use serde::{Deserialize, Serialize};

use crate::error::RejectReason;
use crate::rules::MoveRequest;
use crate::session::{Snapshot, Winner};

/// Event sent by a client over its connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Identity handshake. Must be the first event on a connection; a
    /// connection lacking it is refused before anything else is processed.
    Identify { address: String, username: String },

    /// Open a new match with the given stake; the sender takes white.
    CreateGame { stake: f64 },

    /// Take the black seat of an existing match.
    #[serde(rename_all = "camelCase")]
    JoinGame { match_id: String },

    /// Submit a move for the sender's side.
    #[serde(rename_all = "camelCase")]
    MakeMove {
        match_id: String,
        #[serde(rename = "move")]
        mv: MoveRequest,
    },

    /// Ask for the current snapshot (reconnection resynchronization).
    #[serde(rename_all = "camelCase")]
    RequestInitialGameState { match_id: String },
}

/// Event sent by the server to a client.
///
/// Acknowledgments and rejections are unicast to the originating
/// connection; `gameState` and `gameOver` are broadcast to every connection
/// on the match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Creation acknowledgment, unicast to the creator only.
    #[serde(rename_all = "camelCase")]
    GameCreated { match_id: String },

    /// Full state after a successful state-changing operation.
    GameState(Snapshot),

    /// Full state on explicit request (reconnection recovery).
    InitialGameState(Snapshot),

    /// The match reached a terminal position.
    GameOver { winner: Winner },

    /// Rejection, unicast to the offending connection.
    Error { reason: RejectReason },
}

impl ServerEvent {
    pub fn game_created(match_id: impl Into<String>) -> Self {
        ServerEvent::GameCreated {
            match_id: match_id.into(),
        }
    }

    pub fn game_state(snapshot: Snapshot) -> Self {
        ServerEvent::GameState(snapshot)
    }

    pub fn initial_game_state(snapshot: Snapshot) -> Self {
        ServerEvent::InitialGameState(snapshot)
    }

    pub fn game_over(winner: Winner) -> Self {
        ServerEvent::GameOver { winner }
    }

    pub fn error(reason: RejectReason) -> Self {
        ServerEvent::Error { reason }
    }
}
