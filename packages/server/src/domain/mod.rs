//! Domain layer for the collaborative editing relay.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod notification;
pub mod repository;
pub mod value_object;

pub use entity::{Member, Session, SessionRegistry};
pub use error::{RegistryError, RepositoryError, ValueObjectError};
pub use factory::ConnectionIdFactory;
pub use notification::{Notification, Outbox};
pub use repository::SessionRepository;
pub use value_object::{Code, ConnectionId, RoomId, Timestamp, Username};

#[cfg(test)]
pub use repository::MockSessionRepository;
