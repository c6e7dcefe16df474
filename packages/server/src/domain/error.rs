//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// ConnectionId validation error
    #[error("ConnectionId cannot be empty")]
    ConnectionIdEmpty,

    /// ConnectionId too long error
    #[error("ConnectionId cannot exceed {max} characters (got {actual})")]
    ConnectionIdTooLong { max: usize, actual: usize },

    /// RoomId validation error
    #[error("Room ID is required")]
    RoomIdEmpty,

    /// RoomId too long error
    #[error("Room ID cannot exceed {max} characters (got {actual})")]
    RoomIdTooLong { max: usize, actual: usize },

    /// Username validation error
    #[error("Username is required")]
    UsernameEmpty,

    /// Username too long error
    #[error("Username cannot exceed {max} characters (got {actual})")]
    UsernameTooLong { max: usize, actual: usize },

    /// Code too long error
    #[error("Code cannot exceed {max} bytes (got {actual})")]
    CodeTooLong { max: usize, actual: usize },
}

/// Errors raised by the session registry
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The connection id is already registered
    #[error("Connection '{0}' is already registered")]
    DuplicateConnection(String),

    /// The connection id is not registered
    #[error("Connection '{0}' is not registered")]
    ConnectionNotFound(String),
}

/// Errors raised by repository implementations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Registry rejected the operation
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Outbox for a connection is missing
    #[error("Outbox for connection '{0}' not found")]
    OutboxNotFound(String),

    /// Receiving side of the outbox has been dropped
    #[error("Outbox for connection '{0}' is closed")]
    OutboxClosed(String),
}
