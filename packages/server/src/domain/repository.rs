//! Repository trait definitions.
//!
//! The domain declares the data access it needs; the infrastructure layer
//! supplies the implementations.

use async_trait::async_trait;

use super::{
    ChannelId, ConnectionId, Message, NewMessage, RepositoryError, User, UserId, Username,
};

/// The persistent chat store.
///
/// Every mutation is serialized over the whole document: two appends never
/// interleave their read-modify-write of the backing file.
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Assign an id to `message`, append it and rewrite the document.
    ///
    /// On failure nothing is kept in memory either.
    async fn append_message(&self, message: NewMessage) -> Result<Message, RepositoryError>;

    /// Messages of one channel in send order.
    async fn get_channel_messages(&self, channel_id: ChannelId) -> Vec<Message>;

    async fn find_user(&self, user_id: UserId) -> Option<User>;
}

/// Live room membership per channel.
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Returns `false` if the connection was already in the room.
    async fn join(
        &self,
        connection: ConnectionId,
        username: Username,
        channel_id: ChannelId,
    ) -> bool;

    /// Returns `false` if the connection was not in the room.
    async fn leave(&self, connection: &ConnectionId, channel_id: ChannelId) -> bool;

    async fn get_members(&self, channel_id: ChannelId) -> Vec<ConnectionId>;

    async fn get_member_names(&self, channel_id: ChannelId) -> Vec<Username>;

    async fn count_members(&self, channel_id: ChannelId) -> usize;
}
