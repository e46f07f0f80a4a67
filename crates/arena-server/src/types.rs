//! Shared types for the arena TCP server.
//!
//! This module defines:
//! - `ConnectionId`: a lightweight handle for live connections
//! - channel aliases between connection tasks and the dispatcher
//! - `DispatcherRequest`: messages flowing from connections to the dispatcher

use std::collections::HashMap;
use std::sync::Arc;

use arena_core::{ClientEvent, Player, ServerEvent};
use tokio::sync::mpsc;
use tokio::sync::RwLock;

/// Identifier for a live connection.
///
/// This is intentionally opaque; we just guarantee uniqueness over the
/// lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub u64);

/// Outbound events from the dispatcher to a given connection.
pub type OutboundTx = mpsc::UnboundedSender<ServerEvent>;
pub type OutboundRx = mpsc::UnboundedReceiver<ServerEvent>;

/// Registry of live connections and their outbound channels.
///
/// - Key: `ConnectionId`
/// - Value: `OutboundTx` to send `ServerEvent`s to that connection.
pub type ClientRegistry = Arc<RwLock<HashMap<ConnectionId, OutboundTx>>>;

/// Message flowing from a connection task into the central dispatcher task.
#[derive(Debug)]
pub enum DispatcherRequest {
    /// The connection finished its identity handshake.
    Open { conn: ConnectionId, player: Player },

    /// A decoded event from an identified connection.
    Event {
        conn: ConnectionId,
        event: ClientEvent,
    },

    /// The connection went away (EOF, error, or client-initiated close).
    Close { conn: ConnectionId },
}

/// Channel from connection tasks → dispatcher task.
pub type DispatcherTx = mpsc::UnboundedSender<DispatcherRequest>;
pub type DispatcherRx = mpsc::UnboundedReceiver<DispatcherRequest>;
