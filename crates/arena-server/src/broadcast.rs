//! Best-effort delivery of server events to live connections.
//!
//! Senders are unbounded channels, so delivery never blocks the
//! dispatcher; the per-connection writer tasks do the actual network I/O.
//! A connection that vanished between enumeration and send is skipped
//! silently: no retry, and no error surfaced to other recipients.

use std::collections::HashMap;

use arena_core::ServerEvent;

use crate::types::{ConnectionId, OutboundTx};

/// Deliver `event` to exactly one connection, if it is still live.
pub(crate) fn unicast(
    clients: &HashMap<ConnectionId, OutboundTx>,
    conn: ConnectionId,
    event: ServerEvent,
) {
    if let Some(tx) = clients.get(&conn) {
        let _ = tx.send(event);
    }
}

/// Fan `event` out to the given connections.
pub(crate) fn fan_out(
    clients: &HashMap<ConnectionId, OutboundTx>,
    recipients: &[ConnectionId],
    event: ServerEvent,
) {
    for conn in recipients {
        if let Some(tx) = clients.get(conn) {
            let _ = tx.send(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::RejectReason;
    use tokio::sync::mpsc;

    #[test]
    fn fan_out_skips_vanished_connections() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut clients = HashMap::new();
        clients.insert(ConnectionId(1), tx);

        let recipients = [ConnectionId(1), ConnectionId(2)];
        fan_out(
            &clients,
            &recipients,
            ServerEvent::error(RejectReason::GameNotFound),
        );

        // The live connection got it; the vanished one was skipped without
        // disturbing anything.
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn unicast_to_a_closed_channel_is_silent() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        let mut clients = HashMap::new();
        clients.insert(ConnectionId(1), tx);

        unicast(
            &clients,
            ConnectionId(1),
            ServerEvent::error(RejectReason::GameNotFound),
        );
    }
}
