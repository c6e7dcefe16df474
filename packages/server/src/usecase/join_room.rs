//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 入力検証、登録簿への登録、`Joined` 通知のファンアウト
//!
//! ### なぜこのテストが必要か
//! - 新規参加者を含む全メンバーに、最新のメンバー一覧が届くことを保証
//! - 不正な入力では登録簿もルーム所属も変化しないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：1人目・2人目の参加
//! - 異常系：空の room_id / username、未登録の接続

use std::sync::Arc;

use crate::domain::{ConnectionId, Member, Notification, RoomId, SessionRepository, Username};

use super::error::JoinError;

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// ルーム参加を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 参加する接続
    /// * `room_id` - クライアントが送ってきたルーム ID（未検証）
    /// * `username` - クライアントが送ってきた表示名（未検証）
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Member>)` - 参加後のメンバー一覧（`Joined` の送信先）
    /// * `Err(JoinError)` - 検証または登録の失敗。状態は変化しない
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_id: String,
        username: String,
    ) -> Result<Vec<Member>, JoinError> {
        if room_id.is_empty() || username.is_empty() {
            return Err(JoinError::MissingFields);
        }
        let room_id = RoomId::new(room_id)?;
        let username = Username::new(username)?;

        let members = self
            .repository
            .join_room(connection_id, room_id.clone(), username.clone())
            .await?;
        tracing::info!(
            "'{}' ({}) joined room '{}' ({} member(s))",
            username,
            connection_id,
            room_id,
            members.len()
        );

        // 新規参加者本人を含む全員に通知
        for member in &members {
            let notification = Notification::Joined {
                members: members.clone(),
                username: username.clone(),
                connection_id: connection_id.clone(),
            };
            if let Err(e) = self
                .repository
                .deliver(&member.connection_id, notification)
                .await
            {
                tracing::warn!(
                    "Failed to send joined to '{}': {}",
                    member.connection_id,
                    e
                );
            }
        }

        Ok(members)
    }
}
