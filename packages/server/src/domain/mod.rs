//! Domain layer: value objects, entities and the interfaces the use cases rely on.

pub mod entity;
pub mod error;
pub mod event;
pub mod pusher;
pub mod repository;
pub mod room;
pub mod session;
pub mod value_object;

pub use entity::{Message, NewMessage, User, next_message_id};
pub use error::{MessagePushError, RepositoryError, ValueObjectError};
pub use event::{ChatEvent, LeaveReason};
pub use pusher::{MessagePusher, PusherChannel};
pub use repository::{ChatRepository, RoomRepository};
pub use room::ChannelRooms;
pub use session::{ConnectionSession, ConnectionState, JoinOutcome};
pub use value_object::{
    ChannelId, ConnectionId, MAX_MESSAGE_LENGTH, MessageContent, Timestamp, UserId, Username,
};

#[cfg(test)]
pub use pusher::MockMessagePusher;
