//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{ChannelId, UserId, ValueObjectError};

/// 接続時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("User {0} is not registered")]
    UnknownUser(UserId),
}

/// チャンネル参加時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinChannelError {
    #[error("Connection is already closed")]
    ConnectionClosed,
}

/// メッセージ送信時のエラー
///
/// Display の文言はそのまま `message-error` として送信者に返される。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error("Join channel {0} before sending messages to it")]
    NotJoined(ChannelId),

    #[error("{0}")]
    InvalidContent(#[from] ValueObjectError),

    #[error("Failed to save message")]
    PersistFailed(String),
}
