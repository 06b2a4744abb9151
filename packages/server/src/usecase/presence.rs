//! 参加・離脱の通知
//!
//! `user-joined` / `user-left` をルームの他のメンバーへ知らせる。
//! 通知は観測用で、他の処理の成否には影響しない。

use std::sync::Arc;

use super::fanout::ChannelFanout;
use crate::domain::{ChannelId, ChatEvent, ConnectionId, LeaveReason, Username};

pub struct PresenceNotifier {
    fanout: Arc<ChannelFanout>,
}

impl PresenceNotifier {
    pub fn new(fanout: Arc<ChannelFanout>) -> Self {
        Self { fanout }
    }

    pub async fn announce_joined(
        &self,
        channel_id: ChannelId,
        connection: &ConnectionId,
        username: &Username,
    ) {
        let event = ChatEvent::UserJoined {
            username: username.clone(),
        };
        self.announce(channel_id, connection, &event).await;
    }

    pub async fn announce_left(
        &self,
        channel_id: ChannelId,
        connection: &ConnectionId,
        username: &Username,
        reason: LeaveReason,
    ) {
        let event = ChatEvent::UserLeft {
            username: username.clone(),
            reason,
        };
        self.announce(channel_id, connection, &event).await;
    }

    async fn announce(&self, channel_id: ChannelId, connection: &ConnectionId, event: &ChatEvent) {
        match self
            .fanout
            .broadcast_except(channel_id, event, connection)
            .await
        {
            Ok(targets) => tracing::info!(
                "Channel {}: {} (notified {} members)",
                channel_id,
                event.presence_message().unwrap_or_default(),
                targets.len()
            ),
            Err(e) => tracing::warn!(
                "Failed to announce presence in channel {}: {}",
                channel_id,
                e
            ),
        }
    }
}
