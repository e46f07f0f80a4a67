//! Rules-oracle boundary around the third-party chess engine.
//!
//! Everything above this module treats positions as opaque: submit a
//! candidate move, get back an explicit verdict plus terminal flags.
//! Illegal input is a value (`None`), never a panic, so the dispatcher's
//! error handling stays uniform across all rejection kinds. The engine
//! handle itself never crosses the wire; snapshots carry FEN strings.

use std::fmt;
use std::str::FromStr;

use chess::{Board, BoardStatus, ChessMove, MoveGen, Piece, Square};
use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Candidate move as submitted by a client.
///
/// Squares are algebraic names (`e2`, `h8`). The promotion piece may be
/// omitted; it defaults to queen when the move actually promotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PieceKind>,
}

impl MoveRequest {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        MoveRequest {
            from: from.into(),
            to: to.into(),
            promotion: None,
        }
    }

    /// Parse a UCI-style move string (`e2e4`, `e7e8q`).
    pub fn from_uci(s: &str) -> Option<Self> {
        let s = s.trim();
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return None;
        }

        let (from, rest) = s.split_at(2);
        let (to, promo) = rest.split_at(2);

        let promotion = match promo.chars().next() {
            None => None,
            Some(c) => Some(PieceKind::from_char(c)?),
        };

        Some(MoveRequest {
            from: from.to_string(),
            to: to.to_string(),
            promotion,
        })
    }
}

/// Promotion piece choice, in the single-letter wire form clients send.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PieceKind {
    #[serde(rename = "q")]
    Queen,
    #[serde(rename = "r")]
    Rook,
    #[serde(rename = "b")]
    Bishop,
    #[serde(rename = "n")]
    Knight,
}

impl PieceKind {
    pub fn as_char(self) -> char {
        match self {
            PieceKind::Queen => 'q',
            PieceKind::Rook => 'r',
            PieceKind::Bishop => 'b',
            PieceKind::Knight => 'n',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'q' => Some(PieceKind::Queen),
            'r' => Some(PieceKind::Rook),
            'b' => Some(PieceKind::Bishop),
            'n' => Some(PieceKind::Knight),
            _ => None,
        }
    }

    fn as_piece(self) -> Piece {
        match self {
            PieceKind::Queen => Piece::Queen,
            PieceKind::Rook => Piece::Rook,
            PieceKind::Bishop => Piece::Bishop,
            PieceKind::Knight => Piece::Knight,
        }
    }
}

/// Result of applying a legal move.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedMove {
    /// Position after the move.
    pub position: Position,

    /// The move as actually applied, UCI-style, including any promotion
    /// letter (`e7e8q`).
    pub uci: String,

    /// Side-to-move of the new position is in check.
    pub is_check: bool,

    pub is_checkmate: bool,

    /// Stalemate, as reported by the engine.
    pub is_draw: bool,
}

/// Authoritative board position.
///
/// `Default` is the initial chess position; `Display` / `FromStr`
/// round-trip FEN.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    board: Board,
}

impl Default for Position {
    fn default() -> Self {
        Position {
            board: Board::default(),
        }
    }
}

impl Position {
    /// Side to move.
    pub fn turn(&self) -> Color {
        match self.board.side_to_move() {
            chess::Color::White => Color::White,
            chess::Color::Black => Color::Black,
        }
    }

    /// Apply a candidate move.
    ///
    /// Returns `None` when the move is illegal in this position (including
    /// unparseable square names); there is no other failure mode. The
    /// receiver is left untouched; the resulting position is returned in
    /// the [`AppliedMove`].
    pub fn apply(&self, req: &MoveRequest) -> Option<AppliedMove> {
        let from = Square::from_str(&req.from).ok()?;
        let to = Square::from_str(&req.to).ok()?;

        let promotion = self.promotion_for(from, to, req.promotion);
        let mv = ChessMove::new(from, to, promotion.map(PieceKind::as_piece));
        if !self.board.legal(mv) {
            return None;
        }

        let next = self.board.make_move_new(mv);
        let status = next.status();

        let mut uci = format!("{}{}", from, to);
        if let Some(kind) = promotion {
            uci.push(kind.as_char());
        }

        Some(AppliedMove {
            position: Position { board: next },
            uci,
            is_check: next.checkers().popcnt() > 0,
            is_checkmate: status == BoardStatus::Checkmate,
            is_draw: status == BoardStatus::Stalemate,
        })
    }

    /// Destination squares currently reachable from `square`, as algebraic
    /// names. Unknown or empty squares yield an empty list.
    pub fn legal_targets(&self, square: &str) -> Vec<String> {
        let from = match Square::from_str(square) {
            Ok(sq) => sq,
            Err(_) => return Vec::new(),
        };

        let mut targets: Vec<String> = MoveGen::new_legal(&self.board)
            .filter(|m| m.get_source() == from)
            .map(|m| m.get_dest().to_string())
            .collect();

        // The four promotion moves share a destination.
        targets.sort();
        targets.dedup();
        targets
    }

    /// The promotion piece to submit to the engine: only set when a pawn
    /// reaches the last rank, defaulting to queen when the client omitted
    /// an explicit choice.
    fn promotion_for(
        &self,
        from: Square,
        to: Square,
        explicit: Option<PieceKind>,
    ) -> Option<PieceKind> {
        let promoting = self.board.piece_on(from) == Some(Piece::Pawn)
            && matches!(to.get_rank(), chess::Rank::First | chess::Rank::Eighth);

        if !promoting {
            return None;
        }

        Some(explicit.unwrap_or(PieceKind::Queen))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // FEN.
        fmt::Display::fmt(&self.board, f)
    }
}

impl FromStr for Position {
    type Err = chess::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Position {
            board: Board::from_str(s)?,
        })
    }
}
