//! Central dispatcher task.
//!
//! This task owns the `MatchRegistry` and every connection session, and
//! processes all requests coming from connection tasks. Because every
//! mutation happens inline on this single task (turn check, oracle call,
//! state update, with no intervening await), two move submissions against
//! the same match can never both observe the same side-to-move.
//!
//! Routing policy:
//! - `gameCreated`, `initialGameState`, `error`: sent **only** to the
//!   originating connection.
//! - `gameState`, `gameOver`: broadcast to every connection currently
//!   bound to the match.
//!
//! Disconnects are non-destructive: closing a connection drops its session
//! binding but leaves the match intact, so a network blip never forfeits a
//! staked game. The reconnecting side resynchronizes via
//! `requestInitialGameState`.

use std::collections::HashMap;

use arena_core::{
    ClientEvent, EscrowVerifier, GameStatus, MatchRegistry, MoveRequest, Player, RejectReason,
    ServerEvent,
};
use tracing::{debug, info};

use crate::broadcast;
use crate::types::{ClientRegistry, ConnectionId, DispatcherRequest, DispatcherRx};

/// Dispatcher-side state for one identified connection.
#[derive(Debug, Clone)]
struct ConnectionSession {
    player: Player,
    current_match: Option<String>,
}

/// Where an outbound event should go.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Route {
    /// Unicast to one connection.
    Conn(ConnectionId),
    /// Broadcast to every connection bound to the match.
    Match(String),
}

pub(crate) type Outbound = (Route, ServerEvent);

/// The single serialization point: owns all match and connection state.
pub(crate) struct Dispatcher<E> {
    registry: MatchRegistry,
    escrow: E,
    conns: HashMap<ConnectionId, ConnectionSession>,
}

impl<E: EscrowVerifier> Dispatcher<E> {
    pub(crate) fn new(registry: MatchRegistry, escrow: E) -> Self {
        Dispatcher {
            registry,
            escrow,
            conns: HashMap::new(),
        }
    }

    /// Process one request, returning the events to deliver.
    pub(crate) fn handle(&mut self, req: DispatcherRequest) -> Vec<Outbound> {
        match req {
            DispatcherRequest::Open { conn, player } => {
                info!(conn = conn.0, address = %player.address, "connection identified");
                self.conns.insert(
                    conn,
                    ConnectionSession {
                        player,
                        current_match: None,
                    },
                );
                Vec::new()
            }

            DispatcherRequest::Close { conn } => {
                // Non-destructive: the match session stays in the registry.
                if let Some(session) = self.conns.remove(&conn) {
                    debug!(
                        conn = conn.0,
                        address = %session.player.address,
                        "connection closed"
                    );
                }
                Vec::new()
            }

            DispatcherRequest::Event { conn, event } => self.handle_event(conn, event),
        }
    }

    fn handle_event(&mut self, conn: ConnectionId, event: ClientEvent) -> Vec<Outbound> {
        // Every game-affecting event requires a bound identity.
        let player = match self.conns.get(&conn) {
            Some(session) => session.player.clone(),
            None => return unicast_error(conn, RejectReason::Unauthenticated),
        };

        match event {
            // The handshake already happened in the connection task; a
            // second identify mid-stream is a protocol violation.
            ClientEvent::Identify { .. } => unicast_error(conn, RejectReason::InvalidPayload),

            ClientEvent::CreateGame { stake } => self.create_game(conn, player, stake),

            ClientEvent::JoinGame { match_id } => self.join_game(conn, player, match_id),

            ClientEvent::MakeMove { match_id, mv } => self.make_move(conn, player, match_id, mv),

            ClientEvent::RequestInitialGameState { match_id } => {
                self.initial_state(conn, player, match_id)
            }
        }
    }

    fn create_game(&mut self, conn: ConnectionId, player: Player, stake: f64) -> Vec<Outbound> {
        let address = player.address.clone();
        let match_id = self.registry.create(stake, player);
        self.bind(conn, &match_id);

        info!(%match_id, %address, stake, "match created");
        vec![(Route::Conn(conn), ServerEvent::game_created(match_id))]
    }

    fn join_game(&mut self, conn: ConnectionId, player: Player, match_id: String) -> Vec<Outbound> {
        // Escrow gate: refuse matches the contract does not know about.
        // The permissive verifier accepts everything.
        if !self.escrow.match_exists(&match_id) {
            return unicast_error(conn, RejectReason::GameNotFound);
        }

        match self.registry.join(&match_id, player) {
            Ok(session) => {
                let snapshot = session.snapshot();
                self.bind(conn, &match_id);
                info!(%match_id, "match active");
                vec![(Route::Match(match_id), ServerEvent::game_state(snapshot))]
            }
            Err(reason) => unicast_error(conn, reason),
        }
    }

    fn make_move(
        &mut self,
        conn: ConnectionId,
        player: Player,
        match_id: String,
        mv: MoveRequest,
    ) -> Vec<Outbound> {
        match self.registry.apply_move(&match_id, &player.address, &mv) {
            Ok(session) => {
                let snapshot = session.snapshot();
                let winner = session.winner().cloned();

                let mut out = vec![(
                    Route::Match(match_id.clone()),
                    ServerEvent::game_state(snapshot),
                )];

                if session.status() == GameStatus::Completed {
                    if let Some(winner) = winner {
                        info!(%match_id, ?winner, "match completed");
                        out.push((Route::Match(match_id), ServerEvent::game_over(winner)));
                    }
                }

                out
            }
            Err(reason) => {
                debug!(%match_id, address = %player.address, %reason, "move rejected");
                unicast_error(conn, reason)
            }
        }
    }

    fn initial_state(
        &mut self,
        conn: ConnectionId,
        player: Player,
        match_id: String,
    ) -> Vec<Outbound> {
        match self.registry.get(&match_id) {
            Some(session) => {
                let snapshot = session.snapshot();
                let participant = session.is_participant(&player.address);

                // A participant reconnecting on a fresh connection is bound
                // again so subsequent broadcasts reach it.
                if participant {
                    self.bind(conn, &match_id);
                }

                vec![(
                    Route::Conn(conn),
                    ServerEvent::initial_game_state(snapshot),
                )]
            }
            None => unicast_error(conn, RejectReason::GameNotFound),
        }
    }

    fn bind(&mut self, conn: ConnectionId, match_id: &str) {
        if let Some(session) = self.conns.get_mut(&conn) {
            session.current_match = Some(match_id.to_string());
        }
    }

    /// Connections currently bound to `match_id`, for fan-out.
    pub(crate) fn conns_on_match(&self, match_id: &str) -> Vec<ConnectionId> {
        self.conns
            .iter()
            .filter(|(_, session)| session.current_match.as_deref() == Some(match_id))
            .map(|(conn, _)| *conn)
            .collect()
    }
}

/// Run the central dispatcher loop.
///
/// - `rx`: receives requests from all connection tasks.
/// - `clients`: registry of live connections and their outbound channels.
pub(crate) async fn run_dispatcher<E: EscrowVerifier>(
    mut rx: DispatcherRx,
    clients: ClientRegistry,
    registry: MatchRegistry,
    escrow: E,
) {
    let mut dispatcher = Dispatcher::new(registry, escrow);

    while let Some(req) = rx.recv().await {
        let outputs = dispatcher.handle(req);
        if outputs.is_empty() {
            continue;
        }

        // Snapshot of current connections to minimize lock hold time; a
        // connection that vanished in between is skipped by delivery.
        let current = {
            let guard = clients.read().await;
            guard.clone()
        };

        for (route, event) in outputs {
            match route {
                Route::Conn(conn) => broadcast::unicast(&current, conn, event),
                Route::Match(match_id) => {
                    let recipients = dispatcher.conns_on_match(&match_id);
                    broadcast::fan_out(&current, &recipients, event);
                }
            }
        }
    }

    debug!("dispatcher shutting down (request channel closed)");
}

fn unicast_error(conn: ConnectionId, reason: RejectReason) -> Vec<Outbound> {
    vec![(Route::Conn(conn), ServerEvent::error(reason))]
}
