//! Stake-escrow verification boundary.
//!
//! Settlement lives on-chain and is out of scope; the server only ever asks
//! whether a match id is backed and for how much. The verifier is injected
//! into the dispatcher at construction, so the socket server runs unchanged
//! with or without on-chain backing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Read-only view of the escrow contract.
pub trait EscrowVerifier {
    /// Whether the contract knows this match.
    fn match_exists(&self, match_id: &str) -> bool;

    /// Staked amount for this match, if known.
    fn stake_of(&self, match_id: &str) -> Option<f64>;
}

/// Accepts every match id. Used when no on-chain backing is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct PermissiveEscrow;

impl EscrowVerifier for PermissiveEscrow {
    fn match_exists(&self, _match_id: &str) -> bool {
        true
    }

    fn stake_of(&self, _match_id: &str) -> Option<f64> {
        None
    }
}

/// In-memory ledger of funded matches, for tests and local play.
///
/// Clones share the ledger, so a test can fund a match after the verifier
/// has been handed to the dispatcher.
#[derive(Debug, Default, Clone)]
pub struct InMemoryEscrow {
    funded: Arc<Mutex<HashMap<String, f64>>>,
}

impl InMemoryEscrow {
    pub fn new() -> Self {
        InMemoryEscrow::default()
    }

    /// Record `match_id` as funded with `stake`.
    pub fn fund(&self, match_id: impl Into<String>, stake: f64) {
        if let Ok(mut guard) = self.funded.lock() {
            guard.insert(match_id.into(), stake);
        }
    }
}

impl EscrowVerifier for InMemoryEscrow {
    fn match_exists(&self, match_id: &str) -> bool {
        self.funded
            .lock()
            .map(|guard| guard.contains_key(match_id))
            .unwrap_or(false)
    }

    fn stake_of(&self, match_id: &str) -> Option<f64> {
        self.funded
            .lock()
            .ok()
            .and_then(|guard| guard.get(match_id).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permissive_escrow_accepts_everything() {
        assert!(PermissiveEscrow.match_exists("anything"));
        assert_eq!(PermissiveEscrow.stake_of("anything"), None);
    }

    #[test]
    fn in_memory_escrow_shares_the_ledger_across_clones() {
        let escrow = InMemoryEscrow::new();
        let clone = escrow.clone();

        assert!(!clone.match_exists("m-1"));
        escrow.fund("m-1", 0.25);
        assert!(clone.match_exists("m-1"));
        assert_eq!(clone.stake_of("m-1"), Some(0.25));
    }
}
