//! WebSocket relay server implementation.

mod config;
mod error;
mod handler;
mod runner;
mod signal;
pub mod state;

pub use config::ServerConfig;
pub use error::{EventError, ServerError};
pub use runner::{build_router, run};
