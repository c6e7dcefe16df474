//! Server configuration.

use std::{path::PathBuf, time::Duration};

use super::{error::ServerError, state::Heartbeat};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
pub const DEFAULT_PING_INTERVAL: Duration = Duration::from_millis(25_000);
pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_millis(60_000);

/// Operational settings of the relay server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origin allowed to call the server cross-origin
    pub frontend_url: String,
    pub ping_interval: Duration,
    pub ping_timeout: Duration,
    /// Pre-built single-page application bundle; unset in development
    pub static_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// `host:port` to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reject settings the connection tasks cannot run with
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.ping_interval.is_zero() {
            return Err(ServerError::InvalidHeartbeat(
                "ping interval must be greater than zero",
            ));
        }
        if self.ping_timeout.is_zero() {
            return Err(ServerError::InvalidHeartbeat(
                "ping timeout must be greater than zero",
            ));
        }
        Ok(())
    }

    pub fn heartbeat(&self) -> Heartbeat {
        Heartbeat {
            interval: self.ping_interval,
            timeout: self.ping_timeout,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            ping_interval: DEFAULT_PING_INTERVAL,
            ping_timeout: DEFAULT_PING_TIMEOUT,
            static_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        // テスト項目: デフォルト設定は検証を通る
        // then (期待する結果):
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_ping_interval_is_rejected() {
        // テスト項目: ping 間隔 0 は起動前にエラーになる
        // given (前提条件):
        let config = ServerConfig {
            ping_interval: Duration::ZERO,
            ..ServerConfig::default()
        };

        // when (操作):
        let result = config.validate();

        // then (期待する結果):
        assert!(matches!(result, Err(ServerError::InvalidHeartbeat(_))));
    }

    #[test]
    fn test_zero_ping_timeout_is_rejected() {
        // テスト項目: ping タイムアウト 0 は起動前にエラーになる
        // given (前提条件):
        let config = ServerConfig {
            ping_timeout: Duration::ZERO,
            ..ServerConfig::default()
        };

        // when (操作):
        let result = config.validate();

        // then (期待する結果):
        assert!(matches!(result, Err(ServerError::InvalidHeartbeat(_))));
    }
}
