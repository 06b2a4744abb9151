//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - メッセージの検証・永続化・ルームへのファンアウト
//!
//! ### なぜこのテストが必要か
//! - 送信者を含むルームの全メンバーにだけ `new-message` が届くこと
//! - 永続化に失敗したメッセージは配信されないこと
//! - 参加していないチャンネルへの送信を拒否すること
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ送信とブロードキャスト
//! - 異常系：未参加チャンネルへの送信、空メッセージ、永続化失敗
//! - エッジケース：同じチャンネルへの連続送信の順序

use std::sync::Arc;

use tokio::sync::Mutex;
use tsudoi_shared::time::Clock;

use super::{error::SendMessageError, fanout::ChannelFanout};
use crate::domain::{
    ChannelId, ChatEvent, ChatRepository, ConnectionSession, Message, MessageContent, NewMessage,
    Timestamp,
};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Store（メッセージ履歴の永続化）
    chat_repository: Arc<dyn ChatRepository>,
    /// ルームへのファンアウト
    fanout: Arc<ChannelFanout>,
    clock: Arc<dyn Clock>,
    /// Held across persist and fan-out: acceptance order is delivery order.
    sequencer: Mutex<()>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        chat_repository: Arc<dyn ChatRepository>,
        fanout: Arc<ChannelFanout>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            chat_repository,
            fanout,
            clock,
            sequencer: Mutex::new(()),
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `session` - 送信者の接続セッション（送信者のアイデンティティはここから取る）
    /// * `channel_id` - 送信先チャンネル
    /// * `content` - クライアントから届いた本文（未検証）
    ///
    /// # Returns
    ///
    /// * `Ok(Message)` - 永続化され配信されたメッセージ
    /// * `Err(SendMessageError)` - 送信失敗（何も配信されていない）
    pub async fn execute(
        &self,
        session: &ConnectionSession,
        channel_id: ChannelId,
        content: String,
    ) -> Result<Message, SendMessageError> {
        // 1. 参加チェック
        if !session.is_joined_to(channel_id) {
            return Err(SendMessageError::NotJoined(channel_id));
        }

        // 2. 本文の検証
        let content = MessageContent::new(content)?;

        let _sequence = self.sequencer.lock().await;

        // 3. Store に追記
        let new_message = NewMessage {
            channel_id,
            user_id: session.user_id(),
            username: session.username().clone(),
            content,
            timestamp: Timestamp::new(self.clock.now_millis()),
        };
        let message = self
            .chat_repository
            .append_message(new_message)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Error saving message from '{}' in channel {}: {}",
                    session.username(),
                    channel_id,
                    e
                );
                SendMessageError::PersistFailed(e.to_string())
            })?;

        // 4. ルームの全メンバーへ配信（送信者を含む）
        match self
            .fanout
            .broadcast_all(channel_id, &ChatEvent::NewMessage(message.clone()))
            .await
        {
            Ok(targets) => tracing::info!(
                "Message from {} in channel {}: {} ({} recipients)",
                session.username(),
                channel_id,
                message.content.as_str(),
                targets.len()
            ),
            Err(e) => tracing::warn!(
                "Failed to fan out message {} in channel {}: {}",
                message.id,
                channel_id,
                e
            ),
        }

        Ok(message)
    }
}
