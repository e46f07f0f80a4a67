//! One match session: two seats, a stake, an authoritative position.
//!
//! The session is the state machine core. Its lifecycle only ever runs
//! forward (`Waiting` → `Active` → `Completed`); rejected operations leave
//! it byte-for-byte untouched.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::RejectReason;
use crate::player::Player;
use crate::rules::{MoveRequest, Position};

/// Lifecycle of a match.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// White seated, waiting for an opponent.
    Waiting,
    /// Both seats bound, game in progress.
    Active,
    /// Terminal. No further moves, ever.
    Completed,
}

/// Terminal outcome of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    /// The winning player's address.
    Address(String),
    Draw,
}

/// Both seats of a match as exposed in snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seats {
    pub white: Player,
    pub black: Option<Player>,
}

/// Serializable view of a session, broadcast to clients.
///
/// `position` is a FEN string; the internal engine handle never reaches
/// the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub match_id: String,
    pub players: Seats,
    pub stake: f64,
    pub status: GameStatus,
    pub winner: Option<Winner>,
    pub move_log: Vec<String>,
    pub position: String,
    pub checked_side: Option<Color>,
}

/// The authoritative record of one game.
#[derive(Debug, Clone)]
pub struct GameSession {
    match_id: String,
    white: Player,
    black: Option<Player>,
    stake: f64,
    status: GameStatus,
    position: Position,
    move_log: Vec<String>,
    winner: Option<Winner>,
    checked_side: Option<Color>,
}

impl GameSession {
    /// New waiting session with `creator` seated as white.
    pub fn new(match_id: impl Into<String>, stake: f64, creator: Player) -> Self {
        GameSession {
            match_id: match_id.into(),
            white: creator,
            black: None,
            stake,
            status: GameStatus::Waiting,
            position: Position::default(),
            move_log: Vec::new(),
            winner: None,
            checked_side: None,
        }
    }

    pub fn match_id(&self) -> &str {
        &self.match_id
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn stake(&self) -> f64 {
        self.stake
    }

    pub fn white(&self) -> &Player {
        &self.white
    }

    pub fn black(&self) -> Option<&Player> {
        self.black.as_ref()
    }

    pub fn winner(&self) -> Option<&Winner> {
        self.winner.as_ref()
    }

    pub fn move_log(&self) -> &[String] {
        &self.move_log
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn checked_side(&self) -> Option<Color> {
        self.checked_side
    }

    /// Address bound to the given side, if that seat is taken.
    pub fn address_of(&self, side: Color) -> Option<&str> {
        match side {
            Color::White => Some(self.white.address.as_str()),
            Color::Black => self.black.as_ref().map(|p| p.address.as_str()),
        }
    }

    /// Whether `address` is seated in this match.
    pub fn is_participant(&self, address: &str) -> bool {
        self.white.address == address
            || self.black.as_ref().map(|p| p.address.as_str()) == Some(address)
    }

    /// Bind the black seat and activate the match.
    ///
    /// Fails with `GameFull` when the seat is already bound, when the match
    /// has left `Waiting`, or when the joiner already holds the white seat
    /// (the two seats are mutually exclusive). Failure never mutates.
    pub(crate) fn seat_black(&mut self, joiner: Player) -> Result<(), RejectReason> {
        if self.status != GameStatus::Waiting || self.black.is_some() {
            return Err(RejectReason::GameFull);
        }
        if joiner.address == self.white.address {
            return Err(RejectReason::GameFull);
        }

        self.black = Some(joiner);
        self.status = GameStatus::Active;
        Ok(())
    }

    /// Apply a move on behalf of `requester`.
    ///
    /// The turn check is the authorization boundary: the session, not the
    /// client, decides whose move may be submitted. Any rejection leaves
    /// position, log, and status untouched.
    pub(crate) fn apply_move(
        &mut self,
        requester: &str,
        request: &MoveRequest,
    ) -> Result<(), RejectReason> {
        if self.status != GameStatus::Active {
            return Err(RejectReason::GameNotActive);
        }

        let to_move = self.position.turn();
        let mover = self
            .address_of(to_move)
            .ok_or(RejectReason::NotYourTurn)?
            .to_string();
        if requester != mover {
            return Err(RejectReason::NotYourTurn);
        }

        let applied = self
            .position
            .apply(request)
            .ok_or(RejectReason::IllegalMove)?;

        self.position = applied.position;
        self.move_log.push(applied.uci);
        // The only side that can be in check after a move is the mover's
        // opponent.
        self.checked_side = applied.is_check.then(|| to_move.opponent());

        if applied.is_checkmate {
            self.status = GameStatus::Completed;
            self.winner = Some(Winner::Address(mover));
        } else if applied.is_draw {
            self.status = GameStatus::Completed;
            self.winner = Some(Winner::Draw);
        }

        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            match_id: self.match_id.clone(),
            players: Seats {
                white: self.white.clone(),
                black: self.black.clone(),
            },
            stake: self.stake,
            status: self.status,
            winner: self.winner.clone(),
            move_log: self.move_log.clone(),
            position: self.position.to_string(),
            checked_side: self.checked_side,
        }
    }
}
