//! Shared utilities for the CodeRoom server and client.

pub mod logger;
pub mod time;
