//! UseCase: チャンネル離脱処理

use std::sync::Arc;

use super::presence::PresenceNotifier;
use crate::domain::{ChannelId, ConnectionSession, LeaveReason, RoomRepository};

/// チャンネル離脱のユースケース
pub struct LeaveChannelUseCase {
    room_repository: Arc<dyn RoomRepository>,
    presence: Arc<PresenceNotifier>,
}

impl LeaveChannelUseCase {
    pub fn new(room_repository: Arc<dyn RoomRepository>, presence: Arc<PresenceNotifier>) -> Self {
        Self {
            room_repository,
            presence,
        }
    }

    /// チャンネル離脱を実行
    ///
    /// 参加していないチャンネルの指定は何もしない（通知もしない）。
    /// 離脱した場合は `true` を返す。
    pub async fn execute(&self, session: &mut ConnectionSession, channel_id: ChannelId) -> bool {
        if !session.leave(channel_id) {
            tracing::debug!(
                "'{}' asked to leave channel {} without being in it",
                session.username(),
                channel_id
            );
            return false;
        }

        self.room_repository.leave(&session.id(), channel_id).await;
        tracing::info!("{} left channel {}", session.username(), channel_id);

        self.presence
            .announce_left(
                channel_id,
                &session.id(),
                session.username(),
                LeaveReason::Left,
            )
            .await;

        true
    }
}
