//! UseCase: 途中参加者へのコード同期
//!
//! 既存メンバーが、新しく参加した1人にだけ現在のドキュメントを送ります。
//! 受信側では code-change と同じイベントとして届きます。

use std::sync::Arc;

use crate::domain::{Code, ConnectionId, Notification, SessionRepository};

use super::error::RelayError;

/// コード同期のユースケース
pub struct SyncCodeUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
}

impl SyncCodeUseCase {
    /// 新しい SyncCodeUseCase を作成
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// コード同期を実行
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - 対象に配信した
    /// * `Ok(false)` - 対象が既に切断済みなど、配信できなかった（fire-and-forget）
    /// * `Err(RelayError)` - 検証失敗
    pub async fn execute(&self, target: String, code: String) -> Result<bool, RelayError> {
        let target = ConnectionId::new(target)?;
        let code = Code::new(code)?;

        match self
            .repository
            .deliver(&target, Notification::CodeChanged { code })
            .await
        {
            Ok(()) => Ok(true),
            Err(e) => {
                tracing::debug!("Dropped sync-code for '{}': {}", target, e);
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{RoomId, Timestamp, Username},
        infrastructure::repository::InMemorySessionRepository,
    };
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    async fn join(
        repository: &InMemorySessionRepository,
        id: &str,
    ) -> UnboundedReceiver<Notification> {
        let (tx, rx) = mpsc::unbounded_channel();
        repository
            .open_connection(conn(id), tx, Timestamp::new(1000))
            .await
            .unwrap();
        repository
            .join_room(
                &conn(id),
                RoomId::new("r1".to_string()).unwrap(),
                Username::new(id.to_string()).unwrap(),
            )
            .await
            .unwrap();
        rx
    }

    #[tokio::test]
    async fn test_sync_code_reaches_only_target() {
        // テスト項目: sync-code は指定した接続にだけ code-change として届く
        // given (前提条件):
        let repository = Arc::new(InMemorySessionRepository::new());
        let usecase = SyncCodeUseCase::new(repository.clone());
        let mut rx_a = join(&repository, "A").await;
        let mut rx_b = join(&repository, "B").await;
        let mut rx_c = join(&repository, "C").await;

        // when (操作): A が B に現在のドキュメントを送る
        let delivered = usecase
            .execute("B".to_string(), "let x = 1;".to_string())
            .await
            .unwrap();

        // then (期待する結果):
        assert!(delivered);
        assert_eq!(
            rx_b.recv().await,
            Some(Notification::CodeChanged {
                code: Code::new("let x = 1;".to_string()).unwrap()
            })
        );
        assert!(rx_a.try_recv().is_err());
        assert!(rx_c.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_sync_code_to_unknown_target_is_dropped() {
        // テスト項目: 存在しない接続への sync-code は黙って破棄される
        // given (前提条件):
        let repository = Arc::new(InMemorySessionRepository::new());
        let usecase = SyncCodeUseCase::new(repository.clone());

        // when (操作):
        let result = usecase.execute("ghost".to_string(), "x".to_string()).await;

        // then (期待する結果):
        assert_eq!(result, Ok(false));
    }

    #[tokio::test]
    async fn test_sync_code_with_empty_target_is_rejected() {
        // テスト項目: 空の接続 ID は検証エラーになる
        // given (前提条件):
        let repository = Arc::new(InMemorySessionRepository::new());
        let usecase = SyncCodeUseCase::new(repository.clone());

        // when (操作):
        let result = usecase.execute(String::new(), "x".to_string()).await;

        // then (期待する結果):
        assert!(matches!(result, Err(RelayError::InvalidField(_))));
    }
}
