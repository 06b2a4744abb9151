//! Domain entities.

use super::value_object::{ChannelId, MessageContent, Timestamp, UserId, Username};

/// A registered user, as far as the chat core needs to know it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub roles: Vec<String>,
}

/// A message accepted by the broadcaster but not yet persisted.
///
/// The store assigns the id on append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub channel_id: ChannelId,
    pub user_id: UserId,
    pub username: Username,
    pub content: MessageContent,
    pub timestamp: Timestamp,
}

/// A persisted chat message. Never mutated after creation.
///
/// `user_id` is always set for messages sent through this server; history
/// written by older servers may lack it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: i64,
    pub channel_id: ChannelId,
    pub user_id: Option<UserId>,
    pub username: Username,
    pub content: MessageContent,
    pub timestamp: Timestamp,
}

impl Message {
    /// Attach an id to a pending message.
    pub fn from_new(id: i64, new: NewMessage) -> Self {
        Self {
            id,
            channel_id: new.channel_id,
            user_id: Some(new.user_id),
            username: new.username,
            content: new.content,
            timestamp: new.timestamp,
        }
    }
}

/// Pick the id for the next message.
///
/// Ids derive from the creation time but stay strictly increasing when several
/// messages are created within the same millisecond.
pub fn next_message_id(last_id: Option<i64>, timestamp: Timestamp) -> i64 {
    match last_id {
        Some(last) if last >= timestamp.value() => last + 1,
        _ => timestamp.value(),
    }
}
