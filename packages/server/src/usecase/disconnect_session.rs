//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectSessionUseCase::execute() メソッド
//! - 所属ルームごとの `Disconnected` 通知と、登録簿からの削除
//!
//! ### なぜこのテストが必要か
//! - 切断後のメンバー一覧に幽霊参加者が残らないことを保証
//! - 残ったメンバーに1回だけ通知されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：2人のルームから1人が切断
//! - エッジケース：ルーム未参加の接続、複数ルームに所属する接続
//! - 異常系：登録されていない接続

use std::sync::Arc;

use crate::domain::{ConnectionId, Notification, SessionRepository};

use super::error::DisconnectError;

/// 切断処理のユースケース
pub struct DisconnectSessionUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
}

impl DisconnectSessionUseCase {
    /// 新しい DisconnectSessionUseCase を作成
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// 切断処理を実行
    ///
    /// 通知は登録簿から削除する前に行います。
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ConnectionId>)` - 通知した接続（ルームごとに1件）
    /// * `Err(DisconnectError)` - 登録されていない接続
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Vec<ConnectionId>, DisconnectError> {
        let session = self
            .repository
            .get_session(connection_id)
            .await
            .ok_or_else(|| DisconnectError::UnknownConnection(connection_id.to_string()))?;

        let mut notified = Vec::new();
        for room_id in &session.rooms {
            let targets = self
                .repository
                .list_members(room_id)
                .await
                .into_iter()
                .map(|member| member.connection_id)
                .filter(|id| id != connection_id);

            for target in targets {
                let notification = Notification::Disconnected {
                    connection_id: connection_id.clone(),
                    username: session.username.clone(),
                };
                match self.repository.deliver(&target, notification).await {
                    Ok(()) => notified.push(target),
                    Err(e) => {
                        tracing::warn!("Failed to send disconnected to '{}': {}", target, e)
                    }
                }
            }
        }

        self.repository
            .remove_connection(connection_id)
            .await
            .map_err(|_| DisconnectError::UnknownConnection(connection_id.to_string()))?;
        tracing::info!(
            "Connection '{}' removed from registry ({} room(s))",
            connection_id,
            session.rooms.len()
        );

        Ok(notified)
    }

    /// 残りの接続数を取得
    pub async fn count_remaining_connections(&self) -> usize {
        self.repository.count_connections().await
    }
}
