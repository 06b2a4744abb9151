//! チャンネル単位のファンアウト
//!
//! ルームのメンバーを RoomRepository から求め、MessagePusher で配信します。

use std::sync::Arc;

use crate::domain::{
    ChannelId, ChatEvent, ConnectionId, MessagePushError, MessagePusher, RoomRepository,
};

pub struct ChannelFanout {
    room_repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl ChannelFanout {
    pub fn new(
        room_repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            room_repository,
            message_pusher,
        }
    }

    /// Deliver `event` to every member of the room, sender included.
    ///
    /// Returns the connections the event was addressed to.
    pub async fn broadcast_all(
        &self,
        channel_id: ChannelId,
        event: &ChatEvent,
    ) -> Result<Vec<ConnectionId>, MessagePushError> {
        let targets = self.room_repository.get_members(channel_id).await;
        self.message_pusher
            .broadcast(targets.clone(), event)
            .await?;
        Ok(targets)
    }

    /// Deliver `event` to every member of the room except `exclude`.
    pub async fn broadcast_except(
        &self,
        channel_id: ChannelId,
        event: &ChatEvent,
        exclude: &ConnectionId,
    ) -> Result<Vec<ConnectionId>, MessagePushError> {
        let targets: Vec<ConnectionId> = self
            .room_repository
            .get_members(channel_id)
            .await
            .into_iter()
            .filter(|id| id != exclude)
            .collect();
        self.message_pusher
            .broadcast(targets.clone(), event)
            .await?;
        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MockMessagePusher, Username},
        infrastructure::repository::InMemoryRoomRepository,
    };

    fn joined() -> ChatEvent {
        ChatEvent::UserJoined {
            username: Username::new("alice".to_string()).unwrap(),
        }
    }

    async fn room_with(
        channel: ChannelId,
        members: &[ConnectionId],
    ) -> Arc<InMemoryRoomRepository> {
        let rooms = Arc::new(InMemoryRoomRepository::default());
        for (i, member) in members.iter().enumerate() {
            let name = Username::new(format!("user{}", i)).unwrap();
            rooms.join(*member, name, channel).await;
        }
        rooms
    }

    #[tokio::test]
    async fn test_broadcast_all_includes_sender() {
        // テスト項目: broadcast_all は送信者を含む全メンバーが対象
        // given (前提条件):
        let channel = ChannelId::new(5);
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        let rooms = room_with(channel, &[alice, bob]).await;

        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .withf(move |targets, _| targets.len() == 2 && targets.contains(&alice))
            .times(1)
            .returning(|_, _| Ok(()));
        let fanout = ChannelFanout::new(rooms, Arc::new(pusher));

        // when (操作):
        let targets = fanout.broadcast_all(channel, &joined()).await.unwrap();

        // then (期待する結果):
        assert_eq!(targets.len(), 2);
    }

    #[tokio::test]
    async fn test_broadcast_except_skips_excluded() {
        // テスト項目: broadcast_except は指定した接続を除外する
        // given (前提条件):
        let channel = ChannelId::new(5);
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        let rooms = room_with(channel, &[alice, bob]).await;

        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .withf(move |targets, _| targets == &vec![bob])
            .times(1)
            .returning(|_, _| Ok(()));
        let fanout = ChannelFanout::new(rooms, Arc::new(pusher));

        // when (操作):
        let targets = fanout
            .broadcast_except(channel, &joined(), &alice)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(targets, vec![bob]);
    }

    #[tokio::test]
    async fn test_broadcast_to_empty_room() {
        // テスト項目: 誰もいないルームへの配信は空の対象で成功する
        let rooms = Arc::new(InMemoryRoomRepository::default());
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .withf(|targets, _| targets.is_empty())
            .returning(|_, _| Ok(()));
        let fanout = ChannelFanout::new(rooms, Arc::new(pusher));

        let targets = fanout
            .broadcast_all(ChannelId::new(1), &joined())
            .await
            .unwrap();

        assert!(targets.is_empty());
    }
}
