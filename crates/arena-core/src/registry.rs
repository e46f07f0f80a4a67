//! In-memory registry of live match sessions.
//!
//! The registry is an explicitly owned object, constructed empty and handed
//! to the dispatcher; there is no module-level state. All mutating entry
//! points either succeed or return a [`RejectReason`] without touching the
//! session.

use std::collections::HashMap;

use uuid::Uuid;

use crate::error::RejectReason;
use crate::player::Player;
use crate::rules::MoveRequest;
use crate::session::GameSession;

/// Mapping from match id to session. Keys are unique; insertion order is
/// irrelevant.
#[derive(Debug, Default)]
pub struct MatchRegistry {
    sessions: HashMap<String, GameSession>,
}

impl MatchRegistry {
    pub fn new() -> Self {
        MatchRegistry::default()
    }

    /// Create a new waiting session with `creator` seated as white and
    /// return its id.
    ///
    /// Ids are v4 UUIDs; collision within a process lifetime is not a
    /// practical concern.
    pub fn create(&mut self, stake: f64, creator: Player) -> String {
        let match_id = Uuid::new_v4().to_string();
        let session = GameSession::new(match_id.clone(), stake, creator);
        self.sessions.insert(match_id.clone(), session);
        match_id
    }

    /// Pure lookup; absence is a first-class outcome.
    pub fn get(&self, match_id: &str) -> Option<&GameSession> {
        self.sessions.get(match_id)
    }

    /// Bind `joiner` to the black seat of `match_id` and activate it.
    pub fn join(&mut self, match_id: &str, joiner: Player) -> Result<&GameSession, RejectReason> {
        let session = self
            .sessions
            .get_mut(match_id)
            .ok_or(RejectReason::GameNotFound)?;

        session.seat_black(joiner)?;
        Ok(&*session)
    }

    /// Apply a move on behalf of `requester` and return the updated
    /// session for snapshotting.
    pub fn apply_move(
        &mut self,
        match_id: &str,
        requester: &str,
        request: &MoveRequest,
    ) -> Result<&GameSession, RejectReason> {
        let session = self
            .sessions
            .get_mut(match_id)
            .ok_or(RejectReason::GameNotFound)?;

        session.apply_move(requester, request)?;
        Ok(&*session)
    }

    /// Delete the entry. Removing an absent id is a no-op, not an error.
    pub fn remove(&mut self, match_id: &str) {
        self.sessions.remove(match_id);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
