//! Logger setup shared by the server and client binaries.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `default_level` is applied to the
/// binary's own crates and `info` to everything else.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let crate_name = bin_name.replace('-', "_");
    let default_directive = format!(
        "info,{crate_name}={default_level},coderoom_server={default_level},coderoom_client={default_level},tower_http={default_level}"
    );

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    // try_init: tests and embedders may have installed a subscriber already
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();

    tracing::debug!("Logger initialized for {}", bin_name);
}
