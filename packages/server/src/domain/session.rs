//! Per-connection session state machine.
//!
//! ```text
//! Unjoined ──join(c)──▶ Joined(c) ──leave(c)──▶ Unjoined
//!    │                    │  └──join(d)──▶ Joined(d)   (implicitly leaves c)
//!    └──disconnect──▶ Disconnected ◀──disconnect──┘
//! ```
//!
//! The identity is resolved from the store when the connection is accepted
//! and never taken from event payloads.

use super::{
    entity::User,
    value_object::{ChannelId, ConnectionId, UserId, Username},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Unjoined,
    Joined(ChannelId),
    Disconnected,
}

/// Result of a join transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// Entered the channel; `left` is the channel implicitly left, if any.
    Joined { left: Option<ChannelId> },
    /// Already in this channel; nothing changed.
    AlreadyJoined,
    /// The connection is gone.
    Closed,
}

#[derive(Debug, Clone)]
pub struct ConnectionSession {
    id: ConnectionId,
    user_id: UserId,
    username: Username,
    state: ConnectionState,
}

impl ConnectionSession {
    pub fn new(id: ConnectionId, user: &User) -> Self {
        Self {
            id,
            user_id: user.id,
            username: user.username.clone(),
            state: ConnectionState::Unjoined,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn current_channel(&self) -> Option<ChannelId> {
        match self.state {
            ConnectionState::Joined(channel_id) => Some(channel_id),
            _ => None,
        }
    }

    pub fn is_joined_to(&self, channel_id: ChannelId) -> bool {
        self.current_channel() == Some(channel_id)
    }

    pub fn join(&mut self, channel_id: ChannelId) -> JoinOutcome {
        match self.state {
            ConnectionState::Disconnected => JoinOutcome::Closed,
            ConnectionState::Joined(current) if current == channel_id => {
                JoinOutcome::AlreadyJoined
            }
            ConnectionState::Joined(current) => {
                self.state = ConnectionState::Joined(channel_id);
                JoinOutcome::Joined {
                    left: Some(current),
                }
            }
            ConnectionState::Unjoined => {
                self.state = ConnectionState::Joined(channel_id);
                JoinOutcome::Joined { left: None }
            }
        }
    }

    /// Leave `channel_id`. Returns `false` when not currently in it.
    pub fn leave(&mut self, channel_id: ChannelId) -> bool {
        if self.is_joined_to(channel_id) {
            self.state = ConnectionState::Unjoined;
            true
        } else {
            false
        }
    }

    /// Move to the terminal state, returning the channel that was current.
    pub fn disconnect(&mut self) -> Option<ChannelId> {
        let previous = self.current_channel();
        self.state = ConnectionState::Disconnected;
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice_session() -> ConnectionSession {
        let user = User {
            id: UserId::new(1),
            username: Username::new("alice".to_string()).unwrap(),
            roles: vec!["User".to_string()],
        };
        ConnectionSession::new(ConnectionId::generate(), &user)
    }

    #[test]
    fn test_new_session_is_unjoined() {
        let session = alice_session();
        assert_eq!(session.state(), ConnectionState::Unjoined);
        assert_eq!(session.current_channel(), None);
        assert_eq!(session.username().as_str(), "alice");
    }

    #[test]
    fn test_join_switches_channel_and_reports_previous() {
        // テスト項目: 別チャンネルへの join は直前のチャンネルを暗黙的に離脱する
        // given (前提条件):
        let mut session = alice_session();
        session.join(ChannelId::new(1));

        // when (操作):
        let outcome = session.join(ChannelId::new(2));

        // then (期待する結果):
        assert_eq!(
            outcome,
            JoinOutcome::Joined {
                left: Some(ChannelId::new(1))
            }
        );
        assert!(session.is_joined_to(ChannelId::new(2)));
    }

    #[test]
    fn test_join_same_channel_twice() {
        // テスト項目: 同じチャンネルへの再 join は状態を変えない
        let mut session = alice_session();
        assert_eq!(
            session.join(ChannelId::new(5)),
            JoinOutcome::Joined { left: None }
        );
        assert_eq!(session.join(ChannelId::new(5)), JoinOutcome::AlreadyJoined);
        assert_eq!(session.state(), ConnectionState::Joined(ChannelId::new(5)));
    }

    #[test]
    fn test_leave_other_channel_is_noop() {
        // テスト項目: 参加していないチャンネルの leave は無視される
        let mut session = alice_session();
        session.join(ChannelId::new(5));
        assert!(!session.leave(ChannelId::new(6)));
        assert!(session.leave(ChannelId::new(5)));
        assert_eq!(session.state(), ConnectionState::Unjoined);
    }

    #[test]
    fn test_disconnect_is_terminal() {
        // テスト項目: 切断後は join できない
        // given (前提条件):
        let mut session = alice_session();
        session.join(ChannelId::new(5));

        // when (操作):
        let previous = session.disconnect();

        // then (期待する結果):
        assert_eq!(previous, Some(ChannelId::new(5)));
        assert_eq!(session.join(ChannelId::new(5)), JoinOutcome::Closed);
        assert_eq!(session.disconnect(), None);
    }
}
