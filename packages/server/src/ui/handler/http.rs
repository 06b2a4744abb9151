//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    domain::ChannelId,
    infrastructure::dto::{http::ChannelMembersDto, websocket::MessageDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Message history of a channel in send order
pub async fn get_channel_messages(
    State(state): State<Arc<AppState>>,
    Path(channel_id): Path<i64>,
) -> Json<Vec<MessageDto>> {
    let messages = state
        .get_channel_messages_usecase
        .execute(ChannelId::new(channel_id))
        .await;

    // Domain Model から DTO への変換
    Json(messages.iter().map(MessageDto::from).collect())
}

/// Usernames currently in a channel room
pub async fn get_channel_members(
    State(state): State<Arc<AppState>>,
    Path(channel_id): Path<i64>,
) -> Json<ChannelMembersDto> {
    let members = state
        .get_channel_members_usecase
        .execute(ChannelId::new(channel_id))
        .await;

    Json(ChannelMembersDto {
        channel_id,
        members: members.into_iter().map(|name| name.into_string()).collect(),
    })
}
