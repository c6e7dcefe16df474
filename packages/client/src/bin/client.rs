//! Terminal collaborator for a CodeRoom room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin coderoom-client -- --room r1 --username alice
//! ```

use std::time::Duration;

use clap::Parser;
use coderoom_client::ClientConfig;
use coderoom_shared::logger::setup_logger;

#[derive(Debug, Parser)]
#[command(name = "coderoom-client", version, about)]
struct Args {
    /// WebSocket endpoint of the relay
    #[arg(short, long, env = "CODEROOM_URL", default_value = "ws://127.0.0.1:4000/ws")]
    url: String,

    /// Room to join
    #[arg(short, long)]
    room: String,

    /// Display name shown to other members
    #[arg(short = 'n', long)]
    username: String,

    /// Upper bound for a single connection attempt (milliseconds)
    #[arg(long, default_value_t = 10_000)]
    connect_timeout_ms: u64,

    /// Pause between reconnection attempts (milliseconds)
    #[arg(long, default_value_t = 1_000)]
    retry_delay_ms: u64,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl From<Args> for ClientConfig {
    fn from(args: Args) -> Self {
        Self {
            url: args.url,
            room_id: args.room,
            username: args.username,
            connect_timeout: Duration::from_millis(args.connect_timeout_ms),
            retry_delay: Duration::from_millis(args.retry_delay_ms),
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    if let Err(e) = coderoom_client::run_client(args.into()).await {
        tracing::error!("Client error: {}", e);
        eprintln!("Client error: {e}");
        std::process::exit(1);
    }
}
