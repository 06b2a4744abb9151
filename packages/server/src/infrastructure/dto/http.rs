//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Live membership of one channel room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelMembersDto {
    pub channel_id: i64,
    pub members: Vec<String>,
}
