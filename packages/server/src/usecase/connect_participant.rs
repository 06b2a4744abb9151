//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::authenticate() / execute()
//!
//! ### なぜこのテストが必要か
//! - 接続のアイデンティティはイベントのペイロードではなく Store から解決する
//! - 登録されていないユーザーの接続を受け付けてはならない
//!
//! ### どのような状況を想定しているか
//! - 正常系：登録済みユーザーの接続（未参加状態のセッションが作られる）
//! - 異常系：未登録ユーザーの接続試行

use std::sync::Arc;

use super::error::ConnectError;
use crate::domain::{
    ChatRepository, ConnectionId, ConnectionSession, MessagePusher, PusherChannel, User, UserId,
};

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    /// Store（ユーザー情報の参照元）
    chat_repository: Arc<dyn ChatRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(
        chat_repository: Arc<dyn ChatRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            chat_repository,
            message_pusher,
        }
    }

    /// 接続しようとしているユーザーを Store から解決する
    pub async fn authenticate(&self, user_id: UserId) -> Result<User, ConnectError> {
        self.chat_repository
            .find_user(user_id)
            .await
            .ok_or(ConnectError::UnknownUser(user_id))
    }

    /// 接続を登録し、未参加状態のセッションを返す
    ///
    /// # Arguments
    ///
    /// * `user` - `authenticate` で解決したユーザー
    /// * `sender` - クライアントへのフレーム送信用チャンネル
    pub async fn execute(&self, user: &User, sender: PusherChannel) -> ConnectionSession {
        let session = ConnectionSession::new(ConnectionId::generate(), user);
        self.message_pusher
            .register_client(session.id(), sender)
            .await;
        session
    }
}
