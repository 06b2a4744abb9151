//! Conversion logic between DTOs and domain entities.

use tsudoi_shared::time::timestamp_to_rfc3339;

use crate::domain::{ChatEvent, Message};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&Message> for dto::MessageDto {
    fn from(model: &Message) -> Self {
        Self {
            id: model.id,
            channel_id: model.channel_id.value(),
            user_id: model.user_id.map(|id| id.value()),
            username: model.username.as_str().to_string(),
            content: model.content.as_str().to_string(),
            timestamp: timestamp_to_rfc3339(model.timestamp.value()),
        }
    }
}

impl From<&ChatEvent> for dto::ServerEvent {
    fn from(event: &ChatEvent) -> Self {
        match event {
            ChatEvent::NewMessage(message) => dto::ServerEvent::NewMessage(message.into()),
            ChatEvent::UserJoined { username } => dto::ServerEvent::UserJoined(dto::PresenceDto {
                username: username.as_str().to_string(),
                message: event.presence_message().unwrap_or_default(),
            }),
            ChatEvent::UserLeft { username, .. } => dto::ServerEvent::UserLeft(dto::PresenceDto {
                username: username.as_str().to_string(),
                message: event.presence_message().unwrap_or_default(),
            }),
            ChatEvent::MessageError { error } => dto::ServerEvent::MessageError(dto::ErrorDto {
                error: error.clone(),
            }),
        }
    }
}
