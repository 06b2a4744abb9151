//! WebSocket frame DTOs.
//!
//! Every frame is a JSON object `{"event": "<name>", "data": {...}}`.

use serde::{Deserialize, Deserializer, Serialize};

/// Events sent by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    JoinChannel(JoinChannelPayload),
    SendMessage(SendMessagePayload),
    LeaveChannel(LeaveChannelPayload),
}

/// `userId` / `username` are accepted for compatibility only; the server uses
/// the identity bound to the connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinChannelPayload {
    #[serde(deserialize_with = "numeric_id")]
    pub channel_id: i64,
    #[serde(
        default,
        deserialize_with = "optional_numeric_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    #[serde(deserialize_with = "numeric_id")]
    pub channel_id: i64,
    #[serde(
        default,
        deserialize_with = "optional_numeric_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveChannelPayload {
    #[serde(deserialize_with = "numeric_id")]
    pub channel_id: i64,
}

/// Events sent by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    NewMessage(MessageDto),
    UserJoined(PresenceDto),
    UserLeft(PresenceDto),
    MessageError(ErrorDto),
}

/// A persisted message as seen by clients (also used by the HTTP history endpoint)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: i64,
    pub channel_id: i64,
    /// `null` only for history records that never carried a sender id
    pub user_id: Option<i64>,
    pub username: String,
    pub content: String,
    /// RFC 3339, millisecond precision, UTC
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceDto {
    pub username: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDto {
    pub error: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(i64),
    Text(String),
}

impl NumberOrString {
    fn into_i64<E: serde::de::Error>(self) -> Result<i64, E> {
        match self {
            NumberOrString::Number(value) => Ok(value),
            NumberOrString::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid numeric id '{}'", text))),
        }
    }
}

/// Accept an id given either as a JSON number or a numeric string.
fn numeric_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    NumberOrString::deserialize(deserializer)?.into_i64()
}

fn optional_numeric_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        Some(value) => value.into_i64().map(Some),
        None => Ok(None),
    }
}
