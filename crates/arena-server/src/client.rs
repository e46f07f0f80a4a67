//! Per-connection I/O: identity handshake, reader loop, writer task.
//!
//! The reader never touches game state. It decodes lines into logical
//! events and forwards them to the dispatcher; the writer task drains the
//! connection's outbound channel into newline-delimited JSON. Malformed
//! lines are answered with `invalidPayload` directly, without involving
//! the dispatcher.

use anyhow::Result;
use arena_core::{ClientEvent, Player, RejectReason, ServerEvent};
use arena_protocol::{format_server_event, parse_client_line};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::{debug, warn};

use crate::types::{
    ClientRegistry, ConnectionId, DispatcherRequest, DispatcherTx, OutboundRx, OutboundTx,
};

/// How the identity handshake ended.
enum Handshake {
    Identified(Player),
    Refused(RejectReason),
    Closed,
}

/// Run the I/O loops for a single connection until it goes away.
pub(crate) async fn run_client(
    conn: ConnectionId,
    stream: TcpStream,
    dispatcher_tx: DispatcherTx,
    out_tx: OutboundTx,
    out_rx: OutboundRx,
    clients: ClientRegistry,
) -> Result<()> {
    let (read_half, write_half) = stream.into_split();

    // Writer task: consume outbound events and write response lines. It
    // ends on its own once every sender for this connection is dropped.
    tokio::spawn(write_loop(conn, write_half, out_rx));

    let result = read_loop(conn, read_half, &dispatcher_tx, &out_tx).await;

    // Deregister and notify the dispatcher regardless of how the
    // connection ended; dropping our `out_tx` lets the writer drain and
    // finish.
    {
        let mut guard = clients.write().await;
        guard.remove(&conn);
    }
    let _ = dispatcher_tx.send(DispatcherRequest::Close { conn });

    result
}

async fn read_loop(
    conn: ConnectionId,
    read_half: OwnedReadHalf,
    dispatcher_tx: &DispatcherTx,
    out_tx: &OutboundTx,
) -> Result<()> {
    let mut lines = BufReader::new(read_half).lines();

    // Identity handshake: the first line must be `identify`, and it must
    // carry both an address and a username. Anything else is refused
    // before any event reaches the dispatcher.
    let player = match handshake(&mut lines).await? {
        Handshake::Identified(player) => player,
        Handshake::Refused(reason) => {
            warn!(conn = conn.0, %reason, "handshake refused");
            let _ = out_tx.send(ServerEvent::error(reason));
            return Ok(());
        }
        Handshake::Closed => return Ok(()),
    };

    if dispatcher_tx
        .send(DispatcherRequest::Open {
            conn,
            player: player.clone(),
        })
        .is_err()
    {
        // Dispatcher gone; nothing useful left to do.
        return Ok(());
    }

    debug!(conn = conn.0, address = %player.address, "handshake complete");

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        match parse_client_line(&line) {
            Ok(event) => {
                if dispatcher_tx
                    .send(DispatcherRequest::Event { conn, event })
                    .is_err()
                {
                    break;
                }
            }
            Err(err) => {
                warn!(conn = conn.0, error = %err, "undecodable frame");
                let _ = out_tx.send(ServerEvent::error(RejectReason::InvalidPayload));
            }
        }
    }

    Ok(())
}

async fn handshake(lines: &mut Lines<BufReader<OwnedReadHalf>>) -> Result<Handshake> {
    loop {
        let line = match lines.next_line().await? {
            Some(line) => line,
            None => return Ok(Handshake::Closed),
        };

        if line.trim().is_empty() {
            continue;
        }

        let outcome = match parse_client_line(&line) {
            Ok(ClientEvent::Identify { address, username }) => {
                if address.trim().is_empty() || username.trim().is_empty() {
                    Handshake::Refused(RejectReason::Unauthenticated)
                } else {
                    Handshake::Identified(Player::new(address, username))
                }
            }
            Ok(_) => Handshake::Refused(RejectReason::Unauthenticated),
            Err(_) => Handshake::Refused(RejectReason::InvalidPayload),
        };

        return Ok(outcome);
    }
}

async fn write_loop(conn: ConnectionId, mut write_half: OwnedWriteHalf, mut out_rx: OutboundRx) {
    while let Some(event) = out_rx.recv().await {
        let mut line = match format_server_event(&event) {
            Ok(line) => line,
            Err(err) => {
                warn!(conn = conn.0, error = %err, "dropping unencodable event");
                continue;
            }
        };
        line.push('\n');

        if let Err(err) = write_half.write_all(line.as_bytes()).await {
            debug!(conn = conn.0, error = %err, "write failed, stopping writer");
            break;
        }
    }
}
