//! UseCase: コード変更の中継処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayCodeChangeUseCase::execute() メソッド
//! - 送信者以外のルームメンバーへのブロードキャスト
//!
//! ### どのような状況を想定しているか
//! - 正常系：3人のルームで1人が編集
//! - エッジケース：送信者しかいないルーム（配信先なし）
//! - 異常系：参加していないルームへの送信

use std::sync::Arc;

use crate::domain::{Code, ConnectionId, Notification, RoomId, SessionRepository};

use super::error::RelayError;

/// コード変更中継のユースケース
pub struct RelayCodeChangeUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
}

impl RelayCodeChangeUseCase {
    /// 新しい RelayCodeChangeUseCase を作成
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// コード変更の中継を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ConnectionId>)` - 配信先（送信者は含まない）
    /// * `Err(RelayError)` - 検証失敗、または送信者がルームに参加していない
    pub async fn execute(
        &self,
        sender: &ConnectionId,
        room_id: String,
        code: String,
    ) -> Result<Vec<ConnectionId>, RelayError> {
        let room_id = RoomId::new(room_id)?;
        let code = Code::new(code)?;

        if !self.repository.is_member(sender, &room_id).await {
            return Err(RelayError::NotAMember(room_id.into_string()));
        }

        let targets = self.get_broadcast_targets(&room_id, sender).await;
        for target in &targets {
            let notification = Notification::CodeChanged { code: code.clone() };
            if let Err(e) = self.repository.deliver(target, notification).await {
                tracing::warn!("Failed to relay code-change to '{}': {}", target, e);
            }
        }
        tracing::debug!(
            "Relayed code-change from '{}' in room '{}' to {} peer(s)",
            sender,
            room_id,
            targets.len()
        );

        Ok(targets)
    }

    /// ブロードキャスト対象の接続 ID リストを取得
    ///
    /// 送信者以外のルームメンバー全員を返す
    async fn get_broadcast_targets(
        &self,
        room_id: &RoomId,
        exclude: &ConnectionId,
    ) -> Vec<ConnectionId> {
        self.repository
            .list_members(room_id)
            .await
            .into_iter()
            .map(|member| member.connection_id)
            .filter(|id| id != exclude)
            .collect()
    }
}
