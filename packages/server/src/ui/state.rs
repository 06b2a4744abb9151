//! Server state and use case wiring.

use std::sync::Arc;

use tsudoi_shared::time::Clock;

use crate::{
    domain::{ChatRepository, MessagePusher, RoomRepository},
    usecase::{
        ChannelFanout, ConnectParticipantUseCase, DisconnectParticipantUseCase,
        GetChannelMembersUseCase, GetChannelMessagesUseCase, JoinChannelUseCase,
        LeaveChannelUseCase, PresenceNotifier, SendMessageUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// ConnectParticipantUseCase（参加者接続のユースケース）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（参加者切断のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// JoinChannelUseCase（チャンネル参加のユースケース）
    pub join_channel_usecase: Arc<JoinChannelUseCase>,
    /// LeaveChannelUseCase（チャンネル離脱のユースケース）
    pub leave_channel_usecase: Arc<LeaveChannelUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// GetChannelMessagesUseCase（履歴取得のユースケース）
    pub get_channel_messages_usecase: Arc<GetChannelMessagesUseCase>,
    /// GetChannelMembersUseCase（メンバー取得のユースケース）
    pub get_channel_members_usecase: Arc<GetChannelMembersUseCase>,
    /// MessagePusher（送信者本人への `message-error` 返信に使う）
    pub message_pusher: Arc<dyn MessagePusher>,
}

impl AppState {
    /// Wire every use case on top of the given store, room registry and pusher.
    pub fn new(
        chat_repository: Arc<dyn ChatRepository>,
        room_repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let fanout = Arc::new(ChannelFanout::new(
            room_repository.clone(),
            message_pusher.clone(),
        ));
        let presence = Arc::new(PresenceNotifier::new(fanout.clone()));

        Self {
            connect_participant_usecase: Arc::new(ConnectParticipantUseCase::new(
                chat_repository.clone(),
                message_pusher.clone(),
            )),
            disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
                room_repository.clone(),
                message_pusher.clone(),
                presence.clone(),
            )),
            join_channel_usecase: Arc::new(JoinChannelUseCase::new(
                room_repository.clone(),
                presence.clone(),
            )),
            leave_channel_usecase: Arc::new(LeaveChannelUseCase::new(
                room_repository.clone(),
                presence,
            )),
            send_message_usecase: Arc::new(SendMessageUseCase::new(
                chat_repository.clone(),
                fanout,
                clock,
            )),
            get_channel_messages_usecase: Arc::new(GetChannelMessagesUseCase::new(
                chat_repository,
            )),
            get_channel_members_usecase: Arc::new(GetChannelMembersUseCase::new(room_repository)),
            message_pusher,
        }
    }
}
