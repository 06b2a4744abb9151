//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 切断時のルーム離脱、登録解除、切断通知
//!
//! ### なぜこのテストが必要か
//! - 切断は正常なライフサイクルであり、どの状態からでも起こりうる
//! - どのチャンネルにも参加していなかった接続の切断は通知しない
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加中の接続の切断（残りのメンバーに通知）
//! - エッジケース：未参加の接続の切断（通知なし）

use std::sync::Arc;

use super::presence::PresenceNotifier;
use crate::domain::{ChannelId, ConnectionSession, LeaveReason, MessagePusher, RoomRepository};

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    room_repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    presence: Arc<PresenceNotifier>,
}

impl DisconnectParticipantUseCase {
    pub fn new(
        room_repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        presence: Arc<PresenceNotifier>,
    ) -> Self {
        Self {
            room_repository,
            message_pusher,
            presence,
        }
    }

    /// 参加者切断を実行
    ///
    /// # Returns
    ///
    /// 切断時に参加していたチャンネル（あれば）
    pub async fn execute(&self, session: &mut ConnectionSession) -> Option<ChannelId> {
        self.message_pusher.unregister_client(&session.id()).await;

        let channel_id = session.disconnect()?;
        self.room_repository.leave(&session.id(), channel_id).await;
        self.presence
            .announce_left(
                channel_id,
                &session.id(),
                session.username(),
                LeaveReason::Disconnected,
            )
            .await;

        Some(channel_id)
    }
}
