//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! チャンネルごとの参加者集合（`ChannelRooms`）をメモリ上に保持します。
//! ルームの参加状態は接続の寿命に紐づくため永続化しません。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChannelId, ChannelRooms, ConnectionId, RoomRepository, Username};

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    /// チャンネルごとのルーム参加状態
    rooms: Arc<Mutex<ChannelRooms>>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new(rooms: Arc<Mutex<ChannelRooms>>) -> Self {
        Self { rooms }
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(ChannelRooms::new())))
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn join(
        &self,
        connection: ConnectionId,
        username: Username,
        channel_id: ChannelId,
    ) -> bool {
        let mut rooms = self.rooms.lock().await;
        rooms.join(connection, username, channel_id)
    }

    async fn leave(&self, connection: &ConnectionId, channel_id: ChannelId) -> bool {
        let mut rooms = self.rooms.lock().await;
        rooms.leave(connection, channel_id)
    }

    async fn get_members(&self, channel_id: ChannelId) -> Vec<ConnectionId> {
        let rooms = self.rooms.lock().await;
        rooms.members(channel_id)
    }

    async fn get_member_names(&self, channel_id: ChannelId) -> Vec<Username> {
        let rooms = self.rooms.lock().await;
        rooms.member_names(channel_id)
    }

    async fn count_members(&self, channel_id: ChannelId) -> usize {
        let rooms = self.rooms.lock().await;
        rooms.count_members(channel_id)
    }
}
