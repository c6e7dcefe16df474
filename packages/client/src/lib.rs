//! Terminal collaborator client for the CodeRoom relay.
//!
//! Joins a room, keeps a local copy of the shared document and reconnects
//! forever when the connection drops.

mod config;
mod domain;
mod error;
mod formatter;
mod runner;
mod session;

pub use config::ClientConfig;
pub use error::ClientError;
pub use runner::run_client;
