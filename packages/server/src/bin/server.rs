//! Real-time collaborative code editing relay server.
//!
//! Clients join a room over WebSocket; edits and presence changes are
//! broadcast to the other members of the room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin coderoom-server -- --port 4000
//! ```

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use coderoom_server::ServerConfig;
use coderoom_shared::logger::setup_logger;

/// Command line arguments. Every option can also be set through the environment.
#[derive(Debug, Parser)]
#[command(name = "coderoom-server", version, about)]
struct Args {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 4000)]
    port: u16,

    /// Origin allowed to call the server cross-origin
    #[arg(long, env = "FRONTEND_URL", default_value = "http://localhost:5173")]
    frontend_url: String,

    /// Interval between liveness pings (milliseconds)
    #[arg(
        long,
        env = "PING_INTERVAL_MS",
        default_value_t = 25_000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    ping_interval_ms: u64,

    /// Silence tolerated before a connection is considered dead (milliseconds)
    #[arg(
        long,
        env = "PING_TIMEOUT_MS",
        default_value_t = 60_000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    ping_timeout_ms: u64,

    /// Directory of a pre-built single-page application to serve
    #[arg(long, env = "STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "debug")]
    log_level: String,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            frontend_url: args.frontend_url,
            ping_interval: Duration::from_millis(args.ping_interval_ms),
            ping_timeout: Duration::from_millis(args.ping_timeout_ms),
            static_dir: args.static_dir,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Run the server
    if let Err(e) = coderoom_server::run(args.into()).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
