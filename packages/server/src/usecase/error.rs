//! UseCase 層のエラー定義
//!
//! `Display` の文字列はそのまま `error` イベントとしてクライアントに返されます。

use thiserror::Error;

use crate::domain::{RepositoryError, ValueObjectError};

/// 接続登録のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    #[error("Connection '{0}' is already registered")]
    DuplicateConnection(String),

    #[error("Failed to register connection: {0}")]
    Repository(RepositoryError),
}

/// ルーム参加のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JoinError {
    /// room_id か username が空
    #[error("Room ID and username are required")]
    MissingFields,

    #[error(transparent)]
    InvalidField(#[from] ValueObjectError),

    #[error("Failed to join room: {0}")]
    Repository(#[from] RepositoryError),
}

/// code-change / sync-code 中継のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error(transparent)]
    InvalidField(#[from] ValueObjectError),

    #[error("Not a member of room '{0}'")]
    NotAMember(String),
}

/// 切断処理のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DisconnectError {
    #[error("Connection '{0}' is not registered")]
    UnknownConnection(String),
}
