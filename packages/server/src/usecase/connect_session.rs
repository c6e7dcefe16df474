//! UseCase: 接続登録処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectSessionUseCase::execute() メソッド
//! - ハンドシェイク直後の接続登録と、接続 ID の通知
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規接続の登録と `Connected` 通知
//! - 異常系：重複した接続 ID、Repository のその他のエラー

use std::sync::Arc;

use coderoom_shared::time::get_jst_timestamp;

use crate::domain::{
    ConnectionId, Notification, Outbox, RegistryError, RepositoryError, SessionRepository,
    Timestamp,
};

use super::error::ConnectError;

/// 接続登録のユースケース
pub struct ConnectSessionUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
}

impl ConnectSessionUseCase {
    /// 新しい ConnectSessionUseCase を作成
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// 接続登録を実行
    ///
    /// 登録後、本人の Outbox に `Connected` を送ります。
    ///
    /// # Arguments
    ///
    /// * `connection_id` - サーバーが払い出した接続 ID
    /// * `outbox` - この接続への送信チャンネル
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        outbox: Outbox,
    ) -> Result<(), ConnectError> {
        let connected_at = Timestamp::new(get_jst_timestamp());

        self.repository
            .open_connection(connection_id.clone(), outbox, connected_at)
            .await
            .map_err(|e| match e {
                RepositoryError::Registry(RegistryError::DuplicateConnection(id)) => {
                    ConnectError::DuplicateConnection(id)
                }
                other => ConnectError::Repository(other),
            })?;

        if let Err(e) = self
            .repository
            .deliver(
                &connection_id,
                Notification::Connected {
                    connection_id: connection_id.clone(),
                },
            )
            .await
        {
            tracing::warn!(
                "Failed to notify '{}' of its connection id: {}",
                connection_id,
                e
            );
        }

        Ok(())
    }
}
