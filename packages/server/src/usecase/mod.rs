//! UseCase 層
//!
//! 接続のライフサイクル（接続・参加・送信・離脱・切断）と、
//! HTTP から参照する読み取り専用のユースケースをまとめる。

pub mod connect_participant;
pub mod disconnect_participant;
pub mod error;
pub mod fanout;
pub mod get_channel_members;
pub mod get_channel_messages;
pub mod join_channel;
pub mod leave_channel;
pub mod presence;
pub mod send_message;

pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{ConnectError, JoinChannelError, SendMessageError};
pub use fanout::ChannelFanout;
pub use get_channel_members::GetChannelMembersUseCase;
pub use get_channel_messages::GetChannelMessagesUseCase;
pub use join_channel::JoinChannelUseCase;
pub use leave_channel::LeaveChannelUseCase;
pub use presence::PresenceNotifier;
pub use send_message::SendMessageUseCase;
