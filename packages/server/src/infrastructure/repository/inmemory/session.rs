//! InMemory Session Repository 実装
//!
//! ドメイン層が定義する SessionRepository trait の具体的な実装。
//! ドメインモデル `SessionRegistry` をそのままインメモリストレージとして使い、
//! 接続ごとの Outbox（送信チャンネル）を別の HashMap で保持します。
//!
//! ロックは常に registry → outboxes の順で取得します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, Member, Notification, Outbox, RegistryError, RepositoryError, RoomId, Session,
    SessionRegistry, SessionRepository, Timestamp, Username,
};

/// インメモリ Session Repository 実装
///
/// サーバープロセスが所有し、プロセス終了とともに破棄されます。
#[derive(Default)]
pub struct InMemorySessionRepository {
    /// 接続・表示名・ルーム所属
    registry: Mutex<SessionRegistry>,
    /// 接続ごとの送信チャンネル
    outboxes: Mutex<HashMap<ConnectionId, Outbox>>,
}

impl InMemorySessionRepository {
    /// 新しい InMemorySessionRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn open_connection(
        &self,
        connection_id: ConnectionId,
        outbox: Outbox,
        connected_at: Timestamp,
    ) -> Result<(), RepositoryError> {
        let mut registry = self.registry.lock().await;
        registry.open(connection_id.clone(), connected_at)?;

        let mut outboxes = self.outboxes.lock().await;
        outboxes.insert(connection_id, outbox);
        Ok(())
    }

    async fn join_room(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
        username: Username,
    ) -> Result<Vec<Member>, RepositoryError> {
        let mut registry = self.registry.lock().await;
        Ok(registry.join(connection_id, room_id, username)?)
    }

    async fn remove_connection(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Session, RepositoryError> {
        let mut registry = self.registry.lock().await;
        let session = registry
            .remove(connection_id)
            .ok_or_else(|| RegistryError::ConnectionNotFound(connection_id.to_string()))?;

        let mut outboxes = self.outboxes.lock().await;
        outboxes.remove(connection_id);
        Ok(session)
    }

    async fn get_session(&self, connection_id: &ConnectionId) -> Option<Session> {
        let registry = self.registry.lock().await;
        registry.get(connection_id).cloned()
    }

    async fn list_members(&self, room_id: &RoomId) -> Vec<Member> {
        let registry = self.registry.lock().await;
        registry.list_members(room_id)
    }

    async fn is_member(&self, connection_id: &ConnectionId, room_id: &RoomId) -> bool {
        let registry = self.registry.lock().await;
        registry.is_member(connection_id, room_id)
    }

    async fn list_rooms(&self) -> Vec<(RoomId, Vec<Member>)> {
        let registry = self.registry.lock().await;
        registry.rooms()
    }

    async fn count_connections(&self) -> usize {
        let registry = self.registry.lock().await;
        registry.len()
    }

    async fn deliver(
        &self,
        connection_id: &ConnectionId,
        notification: Notification,
    ) -> Result<(), RepositoryError> {
        let outboxes = self.outboxes.lock().await;
        let outbox = outboxes
            .get(connection_id)
            .ok_or_else(|| RepositoryError::OutboxNotFound(connection_id.to_string()))?;
        outbox
            .send(notification)
            .map_err(|_| RepositoryError::OutboxClosed(connection_id.to_string()))
    }
}
