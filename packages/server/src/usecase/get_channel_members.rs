//! UseCase: チャンネルメンバー取得処理

use std::sync::Arc;

use crate::domain::{ChannelId, RoomRepository, Username};

/// チャンネルのルームに今いるユーザー名を取得するユースケース
pub struct GetChannelMembersUseCase {
    room_repository: Arc<dyn RoomRepository>,
}

impl GetChannelMembersUseCase {
    pub fn new(room_repository: Arc<dyn RoomRepository>) -> Self {
        Self { room_repository }
    }

    pub async fn execute(&self, channel_id: ChannelId) -> Vec<Username> {
        self.room_repository.get_member_names(channel_id).await
    }
}
