//! UI layer error definitions.

use thiserror::Error;

use crate::usecase::{JoinError, RelayError};

/// Fatal errors while starting or running the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid frontend URL for CORS: '{0}'")]
    InvalidOrigin(String),

    #[error("Invalid heartbeat setting: {0}")]
    InvalidHeartbeat(&'static str),

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Failure handling one inbound event, reported back as an `error` event
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Malformed event: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Binary frames are not supported")]
    UnsupportedFrame,

    #[error(transparent)]
    Join(#[from] JoinError),

    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error("Internal server error")]
    Panicked,
}
