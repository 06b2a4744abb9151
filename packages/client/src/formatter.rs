//! Message formatting utilities for client display.

use chrono::{DateTime, Local};
use tsudoi_server::infrastructure::dto::websocket::{MessageDto, ServerEvent};

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format any server event for the terminal
    ///
    /// # Arguments
    ///
    /// * `event` - The decoded server frame
    /// * `own_user_id` - The user this client is connected as (to mark as "me")
    pub fn format_server_event(event: &ServerEvent, own_user_id: i64) -> String {
        match event {
            ServerEvent::NewMessage(message) => Self::format_chat_message(message, own_user_id),
            ServerEvent::UserJoined(presence) | ServerEvent::UserLeft(presence) => {
                format!("\n* {}\n", presence.message)
            }
            ServerEvent::MessageError(error) => format!("\n! {}\n", error.error),
        }
    }

    /// Format a chat message as `[HH:MM:SS] alice: hi`
    pub fn format_chat_message(message: &MessageDto, own_user_id: i64) -> String {
        let me_suffix = if message.user_id == Some(own_user_id) {
            " (me)"
        } else {
            ""
        };
        format!(
            "\n[{}] {}{}: {}\n",
            Self::format_time(&message.timestamp),
            message.username,
            me_suffix,
            message.content
        )
    }

    /// Local wall-clock time of an RFC 3339 timestamp, or the input if unparsable
    pub fn format_time(timestamp: &str) -> String {
        match DateTime::parse_from_rfc3339(timestamp) {
            Ok(parsed) => parsed.with_timezone(&Local).format("%H:%M:%S").to_string(),
            Err(_) => timestamp.to_string(),
        }
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }

    /// Format a local notice that was not sent to the server
    pub fn format_notice(text: &str) -> String {
        format!("* {}\n", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsudoi_server::infrastructure::dto::websocket::{ErrorDto, PresenceDto};

    fn sample_message(user_id: i64) -> MessageDto {
        MessageDto {
            id: 1672531200123,
            channel_id: 5,
            user_id: Some(user_id),
            username: "alice".to_string(),
            content: "Hello, world!".to_string(),
            timestamp: "2023-01-01T00:00:00.123Z".to_string(),
        }
    }

    #[test]
    fn test_format_chat_message() {
        // テスト項目: チャットメッセージが [時刻] 送信者: 本文 の形でフォーマットされる
        // given (前提条件):
        let message = sample_message(2);

        // when (操作):
        let result = MessageFormatter::format_chat_message(&message, 3);

        // then (期待する結果):
        assert!(result.contains("] alice: Hello, world!"));
        assert!(result.trim_start().starts_with('['));
        assert!(!result.contains("(me)"));
    }

    #[test]
    fn test_format_own_chat_message() {
        // テスト項目: 自分のメッセージには (me) が付く
        let result = MessageFormatter::format_chat_message(&sample_message(2), 2);
        assert!(result.contains("alice (me): Hello, world!"));
    }

    #[test]
    fn test_format_presence_events() {
        // テスト項目: 参加・離脱通知はサーバーの文言をそのまま表示する
        // given (前提条件):
        let joined = ServerEvent::UserJoined(PresenceDto {
            username: "bob".to_string(),
            message: "bob joined the channel".to_string(),
        });
        let left = ServerEvent::UserLeft(PresenceDto {
            username: "bob".to_string(),
            message: "bob disconnected".to_string(),
        });

        // when (操作):
        let joined = MessageFormatter::format_server_event(&joined, 1);
        let left = MessageFormatter::format_server_event(&left, 1);

        // then (期待する結果):
        assert!(joined.contains("* bob joined the channel"));
        assert!(left.contains("* bob disconnected"));
    }

    #[test]
    fn test_format_message_error() {
        // テスト項目: エラー通知が表示される
        let event = ServerEvent::MessageError(ErrorDto {
            error: "Failed to save message".to_string(),
        });
        let result = MessageFormatter::format_server_event(&event, 1);
        assert!(result.contains("! Failed to save message"));
    }

    #[test]
    fn test_format_time() {
        // テスト項目: 時刻は HH:MM:SS、解釈できないタイムスタンプはそのまま表示される
        assert_eq!(MessageFormatter::format_time("yesterday"), "yesterday");
        assert_eq!(
            MessageFormatter::format_time("2023-01-01T00:00:00.123Z").len(),
            8
        );
    }

    #[test]
    fn test_format_raw_message() {
        // テスト項目: 生メッセージが正しくフォーマットされる
        let result = MessageFormatter::format_raw_message("unknown message format");
        assert!(result.contains("unknown message format"));
        assert!(result.contains("Received:"));
    }
}
