//! Player identity bound to a connection.

use serde::{Deserialize, Serialize};

/// Identity claimed at the connection handshake and bound to a seat when the
/// player creates or joins a match. Immutable for the connection's lifetime.
///
/// `rating` and `earnings` are carried for the client's benefit and are
/// currently always zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Opaque wallet identifier, stored lowercase.
    pub address: String,

    /// Display name.
    pub username: String,

    pub rating: i32,
    pub earnings: f64,
}

impl Player {
    /// Build a player from handshake input, normalizing the address to
    /// lowercase and trimming the username.
    pub fn new(address: impl AsRef<str>, username: impl AsRef<str>) -> Self {
        Player {
            address: address.as_ref().trim().to_lowercase(),
            username: username.as_ref().trim().to_string(),
            rating: 0,
            earnings: 0.0,
        }
    }
}
