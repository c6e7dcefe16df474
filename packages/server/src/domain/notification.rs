//! Events the relay pushes to a connection's outbox.

use super::{
    entity::Member,
    value_object::{Code, ConnectionId, Username},
};

/// Server-to-client event, independent of its wire encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Handshake completed; tells the client its own connection id
    Connected { connection_id: ConnectionId },
    /// Someone joined a room the recipient is in (or the recipient itself)
    Joined {
        members: Vec<Member>,
        username: Username,
        connection_id: ConnectionId,
    },
    /// Document text from a peer
    CodeChanged { code: Code },
    /// A peer left a room the recipient is in
    Disconnected {
        connection_id: ConnectionId,
        username: Option<Username>,
    },
    /// The recipient's last event was rejected
    Error { message: String },
}

/// Per-connection delivery channel
pub type Outbox = tokio::sync::mpsc::UnboundedSender<Notification>;
