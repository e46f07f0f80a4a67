//! TCP listener and top-level server wiring.
//!
//! This module:
//! - Listens on the configured address/port.
//! - Accepts new TCP connections.
//! - Assigns each connection a `ConnectionId`.
//! - Spawns:
//!   - a per-connection task to handle I/O (handshake, reader, writer),
//!   - a single central dispatcher task that owns the `MatchRegistry`.
//!
//! The per-connection logic and the dispatcher loop live in the `client`
//! and `dispatcher` modules respectively.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Context;
use arena_core::{EscrowVerifier, MatchRegistry, PermissiveEscrow};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::client;
use crate::config::Config;
use crate::dispatcher;
use crate::types::{ClientRegistry, ConnectionId, DispatcherRx, DispatcherTx};

/// Counter for assigning unique `ConnectionId`s over the process lifetime.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

fn next_connection_id() -> ConnectionId {
    let id = NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed);
    ConnectionId(id)
}

/// Run the TCP server with the given configuration.
///
/// The match registry is constructed empty here and handed to the
/// dispatcher; no escrow backing is assumed.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let addr = config.socket_addr_string();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "listening");

    serve(
        listener,
        config.max_clients,
        MatchRegistry::new(),
        PermissiveEscrow,
    )
    .await
}

/// Accept loop, parameterized over the registry and escrow verifier so
/// tests can run against an ephemeral listener.
pub async fn serve<E>(
    listener: TcpListener,
    max_clients: usize,
    registry: MatchRegistry,
    escrow: E,
) -> anyhow::Result<()>
where
    E: EscrowVerifier + Send + 'static,
{
    // Shared registry of connections → outbound channels.
    let clients: ClientRegistry = Arc::new(tokio::sync::RwLock::new(Default::default()));

    // Channel from connection tasks → dispatcher task.
    let (dispatcher_tx, dispatcher_rx): (DispatcherTx, DispatcherRx) = mpsc::unbounded_channel();

    // Spawn the central dispatcher task.
    {
        let clients_clone = clients.clone();
        tokio::spawn(async move {
            dispatcher::run_dispatcher(dispatcher_rx, clients_clone, registry, escrow).await;
        });
    }

    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let current_clients = {
            let guard = clients.read().await;
            guard.len()
        };

        if current_clients >= max_clients {
            warn!(%peer_addr, max_clients, "rejecting connection: at capacity");
            // Just drop the stream; the client sees the connection close.
            continue;
        }

        let conn = next_connection_id();
        info!(conn = conn.0, %peer_addr, "accepted connection");

        // Create the outbound channel for this connection.
        let (out_tx, out_rx) = mpsc::unbounded_channel();

        // Register the connection.
        {
            let mut guard = clients.write().await;
            guard.insert(conn, out_tx.clone());
        }

        // Clone handles to move into the connection task.
        let clients_clone = clients.clone();
        let dispatcher_tx_clone = dispatcher_tx.clone();

        tokio::spawn(async move {
            if let Err(err) = client::run_client(
                conn,
                stream,
                dispatcher_tx_clone,
                out_tx,
                out_rx,
                clients_clone,
            )
            .await
            {
                warn!(conn = conn.0, error = %err, "connection task failed");
            } else {
                info!(conn = conn.0, "connection closed");
            }
        });
    }
}
