//! Client configuration.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// WebSocket endpoint of the relay
    pub url: String,
    pub room_id: String,
    pub username: String,
    /// Upper bound for a single connection attempt
    pub connect_timeout: Duration,
    /// Pause between failed attempts
    pub retry_delay: Duration,
}
