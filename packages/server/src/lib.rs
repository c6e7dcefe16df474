//! Real-time collaborative code editing relay.
//!
//! Clients join a named room over WebSocket and receive live broadcasts of
//! peer edits and presence changes. The server keeps only who is connected
//! and which rooms they joined; documents are never stored.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use ui::{ServerConfig, run};
