//! On-disk shape of the chat data file.
//!
//! Records stay close to the raw JSON: unknown fields are carried in `extra`
//! so a rewrite never drops data another tool put there. Conversion to domain
//! entities happens on read.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tsudoi_shared::time::{rfc3339_to_timestamp, timestamp_to_rfc3339};

use crate::domain::{
    ChannelId, Message, MessageContent, Timestamp, User, UserId, Username, ValueObjectError,
};

/// The whole chat document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatDocument {
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub groups: Vec<GroupRecord>,
    #[serde(default)]
    pub channels: Vec<ChannelRecord>,
    #[serde(default)]
    pub messages: Vec<MessageRecord>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatDocument {
    /// Document written when no usable data file exists: one administrator,
    /// nothing else.
    pub fn initial() -> Self {
        Self {
            users: vec![UserRecord {
                id: 1,
                username: "super".to_string(),
                email: "super@admin.com".to_string(),
                password: "123".to_string(),
                roles: vec!["Super Admin".to_string()],
                groups: Vec::new(),
                extra: Map::new(),
            }],
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub groups: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRecord {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_by: Value,
    #[serde(default)]
    pub members: Vec<Value>,
    #[serde(default)]
    pub admins: Vec<Value>,
    #[serde(default)]
    pub channels: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelRecord {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub group_id: Value,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub members: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A stored message.
///
/// Earlier servers stored whatever the client sent: `channelId` and `userId`
/// may be `null`, and `username` or `content` may be missing or not a string.
/// Such records load as they are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub channel_id: Option<i64>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub username: Value,
    #[serde(default)]
    pub content: Value,
    #[serde(default)]
    pub timestamp: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MessageRecord {
    /// Rebuild the message as stored, without the checks applied to new
    /// messages. `None` when the record names no channel.
    pub fn to_message(&self) -> Option<Message> {
        let channel_id = ChannelId::new(self.channel_id?);
        // Records without a usable timestamp fall back to the id, which is
        // itself derived from the creation time.
        let timestamp = self
            .timestamp
            .as_str()
            .and_then(rfc3339_to_timestamp)
            .unwrap_or(self.id);

        Some(Message {
            id: self.id,
            channel_id,
            user_id: self.user_id.map(UserId::new),
            username: Username::from_stored(stored_text(&self.username)),
            content: MessageContent::from_stored(stored_text(&self.content)),
            timestamp: Timestamp::new(timestamp),
        })
    }
}

/// `null` reads as empty text; other non-string values as their JSON text.
fn stored_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl From<&Message> for MessageRecord {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id,
            channel_id: Some(message.channel_id.value()),
            user_id: message.user_id.map(|id| id.value()),
            username: Value::String(message.username.as_str().to_string()),
            content: Value::String(message.content.as_str().to_string()),
            timestamp: Value::String(timestamp_to_rfc3339(message.timestamp.value())),
            extra: Map::new(),
        }
    }
}

impl TryFrom<&UserRecord> for User {
    type Error = ValueObjectError;

    fn try_from(record: &UserRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::new(record.id),
            username: Username::new(record.username.clone())?,
            roles: record.roles.clone(),
        })
    }
}
