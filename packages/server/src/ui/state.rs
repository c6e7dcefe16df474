//! Server state shared by every handler.

use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;

use crate::{domain::SessionRepository, infrastructure::repository::InMemorySessionRepository};

/// WebSocket liveness settings
#[derive(Debug, Clone, Copy)]
pub struct Heartbeat {
    /// How often the server pings each connection
    pub interval: Duration,
    /// How long a silent connection is tolerated
    pub timeout: Duration,
}

/// Shared application state
pub struct AppState {
    /// Repository（データアクセス層の抽象化）
    pub repository: Arc<dyn SessionRepository>,
    /// Serializes inbound events: each one is handled to completion before the next
    pub dispatch_gate: Mutex<()>,
    pub heartbeat: Heartbeat,
}

impl AppState {
    /// Create state backed by a fresh in-memory registry
    pub fn new(heartbeat: Heartbeat) -> Self {
        Self::with_repository(Arc::new(InMemorySessionRepository::new()), heartbeat)
    }

    pub fn with_repository(repository: Arc<dyn SessionRepository>, heartbeat: Heartbeat) -> Self {
        Self {
            repository,
            dispatch_gate: Mutex::new(()),
            heartbeat,
        }
    }
}
