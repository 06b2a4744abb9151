//! UseCase: チャンネル参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinChannelUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 参加時に他のメンバーへ `user-joined` が届くこと
//! - 同じチャンネルへの再参加でメンバーが重複しないこと
//! - 1接続1チャンネル：別チャンネルへの参加で元のチャンネルを離脱すること
//!
//! ### どのような状況を想定しているか
//! - 正常系：未参加状態からの参加
//! - エッジケース：同じチャンネルへの再参加、チャンネルの切り替え
//! - 異常系：切断済みセッションからの参加

use std::sync::Arc;

use super::{error::JoinChannelError, presence::PresenceNotifier};
use crate::domain::{ChannelId, ConnectionSession, JoinOutcome, LeaveReason, RoomRepository};

/// チャンネル参加のユースケース
pub struct JoinChannelUseCase {
    room_repository: Arc<dyn RoomRepository>,
    presence: Arc<PresenceNotifier>,
}

impl JoinChannelUseCase {
    pub fn new(room_repository: Arc<dyn RoomRepository>, presence: Arc<PresenceNotifier>) -> Self {
        Self {
            room_repository,
            presence,
        }
    }

    /// チャンネル参加を実行
    ///
    /// 既に別のチャンネルに参加している場合は、そのチャンネルを先に離脱し
    /// `user-left` を通知してから参加する。
    pub async fn execute(
        &self,
        session: &mut ConnectionSession,
        channel_id: ChannelId,
    ) -> Result<JoinOutcome, JoinChannelError> {
        let outcome = session.join(channel_id);

        match outcome {
            JoinOutcome::Closed => return Err(JoinChannelError::ConnectionClosed),
            JoinOutcome::AlreadyJoined => {
                tracing::debug!(
                    "'{}' is already in channel {}",
                    session.username(),
                    channel_id
                );
            }
            JoinOutcome::Joined { left } => {
                if let Some(previous) = left {
                    self.room_repository.leave(&session.id(), previous).await;
                    self.presence
                        .announce_left(
                            previous,
                            &session.id(),
                            session.username(),
                            LeaveReason::Left,
                        )
                        .await;
                }

                self.room_repository
                    .join(session.id(), session.username().clone(), channel_id)
                    .await;
                tracing::info!("{} joined channel {}", session.username(), channel_id);

                self.presence
                    .announce_joined(channel_id, &session.id(), session.username())
                    .await;
            }
        }

        Ok(outcome)
    }
}
