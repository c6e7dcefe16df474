//! Client error definitions.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Connection failed: {0}")]
    Connect(#[from] tungstenite::Error),

    #[error("Connection attempt timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Invalid server event: {0}")]
    Protocol(#[from] serde_json::Error),

    #[error("Terminal error: {0}")]
    Terminal(#[from] rustyline::error::ReadlineError),
}
