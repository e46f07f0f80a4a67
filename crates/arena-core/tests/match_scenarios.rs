// crates/arena-core/tests/match_scenarios.rs
//
// End-to-end scenarios against the registry/session core, driven the way
// the dispatcher drives it: create, join, then a scripted sequence of
// moves, asserting on the snapshots a client would receive.

use arena_core::rules::{MoveRequest, Position};
use arena_core::{Color, GameStatus, MatchRegistry, Player, RejectReason, Winner};

fn alice() -> Player {
    Player::new("0xAAA", "alice")
}

fn bob() -> Player {
    Player::new("0xBBB", "bob")
}

/// Create + join, returning the active match id.
fn active_match(registry: &mut MatchRegistry, stake: f64) -> String {
    let match_id = registry.create(stake, alice());
    registry.join(&match_id, bob()).unwrap();
    match_id
}

fn play(registry: &mut MatchRegistry, match_id: &str, moves: &[(&str, &str)]) {
    for (requester, uci) in moves {
        let request = MoveRequest::from_uci(uci).unwrap();
        registry
            .apply_move(match_id, requester, &request)
            .unwrap_or_else(|e| panic!("move {uci} by {requester} rejected: {e}"));
    }
}

#[test]
fn fools_mate_completes_with_the_mover_as_winner() {
    let mut registry = MatchRegistry::new();
    let match_id = active_match(&mut registry, 0.01);

    play(
        &mut registry,
        &match_id,
        &[
            ("0xaaa", "f2f3"),
            ("0xbbb", "e7e5"),
            ("0xaaa", "g2g4"),
            ("0xbbb", "d8h4"),
        ],
    );

    let snapshot = registry.get(&match_id).unwrap().snapshot();
    assert_eq!(snapshot.status, GameStatus::Completed);
    // The side that delivered mate wins, not the side left in checkmate.
    assert_eq!(snapshot.winner, Some(Winner::Address("0xbbb".to_string())));
    // The mated king is the one reported in check.
    assert_eq!(snapshot.checked_side, Some(Color::White));
    assert_eq!(snapshot.move_log, ["f2f3", "e7e5", "g2g4", "d8h4"]);
}

#[test]
fn completed_match_accepts_no_further_moves_from_anyone() {
    let mut registry = MatchRegistry::new();
    let match_id = active_match(&mut registry, 0.01);

    play(
        &mut registry,
        &match_id,
        &[
            ("0xaaa", "f2f3"),
            ("0xbbb", "e7e5"),
            ("0xaaa", "g2g4"),
            ("0xbbb", "d8h4"),
        ],
    );

    let frozen = registry.get(&match_id).unwrap().snapshot();

    for requester in ["0xaaa", "0xbbb", "0xccc"] {
        let err = registry
            .apply_move(&match_id, requester, &MoveRequest::new("a2", "a3"))
            .unwrap_err();
        assert_eq!(err, RejectReason::GameNotActive);
    }

    assert_eq!(registry.get(&match_id).unwrap().snapshot(), frozen);
}

#[test]
fn replaying_the_move_log_reproduces_the_position() {
    let mut registry = MatchRegistry::new();
    let match_id = active_match(&mut registry, 0.01);

    play(
        &mut registry,
        &match_id,
        &[
            ("0xaaa", "e2e4"),
            ("0xbbb", "c7c5"),
            ("0xaaa", "g1f3"),
            ("0xbbb", "d7d6"),
            ("0xaaa", "d2d4"),
            ("0xbbb", "c5d4"),
        ],
    );

    let snapshot = registry.get(&match_id).unwrap().snapshot();
    assert_eq!(snapshot.move_log.len(), 6);

    let mut replayed = Position::default();
    for uci in &snapshot.move_log {
        let request = MoveRequest::from_uci(uci).unwrap();
        replayed = replayed.apply(&request).unwrap().position;
    }

    assert_eq!(replayed.to_string(), snapshot.position);
}

#[test]
fn scripted_flow_matches_the_broadcast_contract() {
    let mut registry = MatchRegistry::new();
    let match_id = registry.create(0.01, alice());

    let waiting = registry.get(&match_id).unwrap().snapshot();
    assert_eq!(waiting.status, GameStatus::Waiting);
    assert_eq!(waiting.stake, 0.01);
    assert_eq!(waiting.players.white.address, "0xaaa");
    assert!(waiting.players.black.is_none());

    registry.join(&match_id, bob()).unwrap();
    assert_eq!(
        registry.get(&match_id).unwrap().status(),
        GameStatus::Active
    );

    play(&mut registry, &match_id, &[("0xaaa", "e2e4")]);
    let after_open = registry.get(&match_id).unwrap().snapshot();
    assert_eq!(after_open.checked_side, None);
    assert_ne!(after_open.position, waiting.position);

    play(
        &mut registry,
        &match_id,
        &[("0xbbb", "f7f6"), ("0xaaa", "d1h5")],
    );
    let after_check = registry.get(&match_id).unwrap().snapshot();
    assert_eq!(after_check.checked_side, Some(Color::Black));
    assert_eq!(after_check.status, GameStatus::Active);
}

#[test]
fn off_turn_and_illegal_moves_never_mutate() {
    let mut registry = MatchRegistry::new();
    let match_id = active_match(&mut registry, 0.01);
    let before = registry.get(&match_id).unwrap().snapshot();

    // Black tries to move first.
    let err = registry
        .apply_move(&match_id, "0xbbb", &MoveRequest::new("e7", "e5"))
        .unwrap_err();
    assert_eq!(err, RejectReason::NotYourTurn);

    // White tries something the oracle refuses.
    let err = registry
        .apply_move(&match_id, "0xaaa", &MoveRequest::new("e2", "e6"))
        .unwrap_err();
    assert_eq!(err, RejectReason::IllegalMove);

    // A stranger tries to move on white's behalf.
    let err = registry
        .apply_move(&match_id, "0xccc", &MoveRequest::new("e2", "e4"))
        .unwrap_err();
    assert_eq!(err, RejectReason::NotYourTurn);

    assert_eq!(registry.get(&match_id).unwrap().snapshot(), before);
}

#[test]
fn join_against_a_full_match_changes_nothing() {
    let mut registry = MatchRegistry::new();
    let match_id = active_match(&mut registry, 0.01);

    let err = registry
        .join(&match_id, Player::new("0xCCC", "carol"))
        .unwrap_err();
    assert_eq!(err, RejectReason::GameFull);

    let session = registry.get(&match_id).unwrap();
    assert_eq!(session.status(), GameStatus::Active);
    assert_eq!(session.black().map(|p| p.address.as_str()), Some("0xbbb"));
}

#[test]
fn rapid_creates_never_collide() {
    let mut registry = MatchRegistry::new();
    let mut ids: Vec<String> = (0..64).map(|_| registry.create(0.01, alice())).collect();

    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 64);
}

#[test]
fn snapshot_serializes_the_wire_shape() {
    let mut registry = MatchRegistry::new();
    let match_id = active_match(&mut registry, 0.01);
    play(&mut registry, &match_id, &[("0xaaa", "e2e4")]);

    let snapshot = registry.get(&match_id).unwrap().snapshot();
    let json = serde_json::to_value(&snapshot).unwrap();

    assert_eq!(json["matchId"], match_id.as_str());
    assert_eq!(json["status"], "active");
    assert_eq!(json["players"]["white"]["address"], "0xaaa");
    assert_eq!(json["players"]["black"]["username"], "bob");
    assert_eq!(json["moveLog"][0], "e2e4");
    assert_eq!(json["checkedSide"], serde_json::Value::Null);
    // FEN after 1.e4, black to move.
    assert!(json["position"].as_str().unwrap().contains(" b "));
}
