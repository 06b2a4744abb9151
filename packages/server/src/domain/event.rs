//! Events delivered to room members.

use super::{entity::Message, value_object::Username};

/// Why a participant left a room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveReason {
    Left,
    Disconnected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    NewMessage(Message),
    UserJoined {
        username: Username,
    },
    UserLeft {
        username: Username,
        reason: LeaveReason,
    },
    MessageError {
        error: String,
    },
}

impl ChatEvent {
    /// Human-readable announcement for presence events.
    pub fn presence_message(&self) -> Option<String> {
        match self {
            ChatEvent::UserJoined { username } => Some(format!("{} joined the channel", username)),
            ChatEvent::UserLeft {
                username,
                reason: LeaveReason::Left,
            } => Some(format!("{} left the channel", username)),
            ChatEvent::UserLeft {
                username,
                reason: LeaveReason::Disconnected,
            } => Some(format!("{} disconnected", username)),
            ChatEvent::NewMessage(_) | ChatEvent::MessageError { .. } => None,
        }
    }
}
