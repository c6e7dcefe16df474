//! Repository trait for the session registry.
//!
//! The domain layer defines the interface; the infrastructure layer provides
//! the implementation (dependency inversion).

use async_trait::async_trait;

use super::{
    entity::{Member, Session},
    error::RepositoryError,
    notification::{Notification, Outbox},
    value_object::{ConnectionId, RoomId, Timestamp, Username},
};

/// Storage for connected sessions, room membership and outboxes.
///
/// Each method is atomic on its own. Sequences of calls that must not
/// interleave are serialized by the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Register a new connection together with its outbox
    async fn open_connection(
        &self,
        connection_id: ConnectionId,
        outbox: Outbox,
        connected_at: Timestamp,
    ) -> Result<(), RepositoryError>;

    /// Name the connection, add it to the room and return the member list
    async fn join_room(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
        username: Username,
    ) -> Result<Vec<Member>, RepositoryError>;

    /// Remove the connection, its memberships and its outbox
    async fn remove_connection(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Session, RepositoryError>;

    async fn get_session(&self, connection_id: &ConnectionId) -> Option<Session>;

    async fn list_members(&self, room_id: &RoomId) -> Vec<Member>;

    async fn is_member(&self, connection_id: &ConnectionId, room_id: &RoomId) -> bool;

    /// Snapshot of every populated room with its members, sorted by room id
    async fn list_rooms(&self) -> Vec<(RoomId, Vec<Member>)>;

    async fn count_connections(&self) -> usize;

    /// Push a notification into a connection's outbox
    async fn deliver(
        &self,
        connection_id: &ConnectionId,
        notification: Notification,
    ) -> Result<(), RepositoryError>;
}
