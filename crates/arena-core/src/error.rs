//! Rejection taxonomy for match operations.
//!
//! Every way a client event can be refused maps to exactly one of these
//! codes. Rejections are values, never panics: they travel back to the
//! offending connection as an `error { reason }` event and nothing else.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-readable reason a client event was refused.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RejectReason {
    /// No live match with that id.
    #[error("game not found")]
    GameNotFound,

    /// Both seats are already bound (or the match already started).
    #[error("game is full")]
    GameFull,

    /// The match is not accepting moves (still waiting, or completed).
    #[error("game is not active")]
    GameNotActive,

    /// The requester is not the side to move.
    #[error("not your turn")]
    NotYourTurn,

    /// The rules oracle refused the move.
    #[error("illegal move")]
    IllegalMove,

    /// The connection has no bound identity.
    #[error("unauthenticated")]
    Unauthenticated,

    /// The event shape could not be understood.
    #[error("invalid payload")]
    InvalidPayload,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_codes_use_camel_case_on_the_wire() {
        let json = serde_json::to_string(&RejectReason::NotYourTurn).unwrap();
        assert_eq!(json, "\"notYourTurn\"");

        let parsed: RejectReason = serde_json::from_str("\"gameNotFound\"").unwrap();
        assert_eq!(parsed, RejectReason::GameNotFound);
    }
}
