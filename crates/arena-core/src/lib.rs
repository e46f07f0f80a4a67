//! arena-core
//!
//! Pure match-session logic:
//! - player identity and seat binding
//! - per-match session state machine
//! - in-memory match registry
//! - rules-oracle boundary around the chess engine
//! - logical client/server events and the rejection taxonomy
//! - stake-escrow verification boundary

pub mod color;
pub mod player;
pub mod error;
pub mod rules;
pub mod session;
pub mod registry;
pub mod messages;
pub mod escrow;

pub use color::Color;
pub use player::Player;
pub use error::RejectReason;

pub use rules::{AppliedMove, MoveRequest, PieceKind, Position};

pub use session::{GameSession, GameStatus, Seats, Snapshot, Winner};
pub use registry::MatchRegistry;

pub use messages::{ClientEvent, ServerEvent};
pub use escrow::{EscrowVerifier, InMemoryEscrow, PermissiveEscrow};
