//! Core domain models for the collaborative editing relay.

use std::collections::{BTreeSet, HashMap};

use super::{
    error::RegistryError,
    value_object::{ConnectionId, RoomId, Timestamp, Username},
};

/// One live connection and what the relay knows about it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Connection identifier assigned at handshake
    pub id: ConnectionId,
    /// Display name, set by the first join
    pub username: Option<Username>,
    /// Rooms this connection has joined
    pub rooms: BTreeSet<RoomId>,
    /// Timestamp when the connection was opened
    pub connected_at: Timestamp,
}

impl Session {
    /// Create a session that has not joined any room yet
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            username: None,
            rooms: BTreeSet::new(),
            connected_at,
        }
    }
}

/// Entry of a room member list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub connection_id: ConnectionId,
    pub username: Username,
    pub connected_at: Timestamp,
}

/// Process-wide session state: who is connected, under which name, in which rooms.
///
/// Rooms are not stored on their own. A room is the ordered list of
/// connections that joined the same label and disappears with its last member.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<ConnectionId, Session>,
    /// room id -> members in join order
    rooms: HashMap<RoomId, Vec<ConnectionId>>,
}

impl SessionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly opened connection.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateConnection` if the id is already registered
    pub fn open(
        &mut self,
        id: ConnectionId,
        connected_at: Timestamp,
    ) -> Result<(), RegistryError> {
        if self.sessions.contains_key(&id) {
            return Err(RegistryError::DuplicateConnection(id.into_string()));
        }
        self.sessions
            .insert(id.clone(), Session::new(id, connected_at));
        Ok(())
    }

    /// Set the display name of a connection. A later call overwrites the name.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::ConnectionNotFound` if the connection is not registered
    pub fn put(&mut self, id: &ConnectionId, username: Username) -> Result<(), RegistryError> {
        let session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| RegistryError::ConnectionNotFound(id.to_string()))?;
        session.username = Some(username);
        Ok(())
    }

    /// Name the connection and add it to `room_id`, returning the member list
    /// as it stands after the join. Joining a room twice keeps one membership.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::ConnectionNotFound` if the connection is not registered
    pub fn join(
        &mut self,
        id: &ConnectionId,
        room_id: RoomId,
        username: Username,
    ) -> Result<Vec<Member>, RegistryError> {
        self.put(id, username)?;

        let members = self.rooms.entry(room_id.clone()).or_default();
        if !members.contains(id) {
            members.push(id.clone());
        }
        if let Some(session) = self.sessions.get_mut(id) {
            session.rooms.insert(room_id.clone());
        }

        Ok(self.list_members(&room_id))
    }

    /// Remove a connection from the registry and from every room it joined.
    /// Rooms left without members are dropped.
    pub fn remove(&mut self, id: &ConnectionId) -> Option<Session> {
        let session = self.sessions.remove(id)?;
        for room_id in &session.rooms {
            if let Some(members) = self.rooms.get_mut(room_id) {
                members.retain(|member| member != id);
                if members.is_empty() {
                    self.rooms.remove(room_id);
                }
            }
        }
        Some(session)
    }

    /// Current members of a room in join order. Unknown rooms are empty.
    pub fn list_members(&self, room_id: &RoomId) -> Vec<Member> {
        let Some(members) = self.rooms.get(room_id) else {
            return Vec::new();
        };
        members
            .iter()
            .filter_map(|id| self.sessions.get(id))
            .filter_map(|session| {
                session.username.as_ref().map(|username| Member {
                    connection_id: session.id.clone(),
                    username: username.clone(),
                    connected_at: session.connected_at,
                })
            })
            .collect()
    }

    /// Rooms the connection currently belongs to
    pub fn rooms_of(&self, id: &ConnectionId) -> Vec<RoomId> {
        self.sessions
            .get(id)
            .map(|session| session.rooms.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Ids of every populated room, sorted
    pub fn room_ids(&self) -> Vec<RoomId> {
        let mut ids: Vec<RoomId> = self.rooms.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Every populated room with its members, sorted by room id
    pub fn rooms(&self) -> Vec<(RoomId, Vec<Member>)> {
        self.room_ids()
            .into_iter()
            .filter_map(|room_id| {
                let members = self.list_members(&room_id);
                (!members.is_empty()).then_some((room_id, members))
            })
            .collect()
    }

    /// Whether the connection is a member of the room
    pub fn is_member(&self, id: &ConnectionId, room_id: &RoomId) -> bool {
        self.rooms
            .get(room_id)
            .is_some_and(|members| members.contains(id))
    }

    /// Get a session by connection id
    pub fn get(&self, id: &ConnectionId) -> Option<&Session> {
        self.sessions.get(id)
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.sessions.contains_key(id)
    }

    /// Number of registered connections
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
