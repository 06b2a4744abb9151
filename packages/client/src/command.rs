//! Parsing of input lines into chat commands and outgoing events.

use tsudoi_server::infrastructure::dto::websocket::{
    ClientEvent, JoinChannelPayload, LeaveChannelPayload, SendMessagePayload,
};

/// A line typed by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    /// `/join <channel id>`
    Join(i64),
    /// `/leave`
    Leave,
    /// `/quit`
    Quit,
    /// Anything not starting with `/`
    Say(String),
}

/// Parse one input line. The error is a message to show to the user.
pub fn parse_input(line: &str) -> Result<InputCommand, String> {
    let line = line.trim();
    let Some(command) = line.strip_prefix('/') else {
        return Ok(InputCommand::Say(line.to_string()));
    };

    let mut parts = command.split_whitespace();
    match parts.next() {
        Some("join") => parts
            .next()
            .and_then(|id| id.parse().ok())
            .map(InputCommand::Join)
            .ok_or_else(|| "Usage: /join <channel id>".to_string()),
        Some("leave") => Ok(InputCommand::Leave),
        Some("quit") | Some("exit") => Ok(InputCommand::Quit),
        _ => Err(format!(
            "Unknown command '{}' (try /join <id>, /leave, /quit)",
            line
        )),
    }
}

pub fn join_event(channel_id: i64, user_id: i64) -> ClientEvent {
    ClientEvent::JoinChannel(JoinChannelPayload {
        channel_id,
        user_id: Some(user_id),
        username: None,
    })
}

pub fn leave_event(channel_id: i64) -> ClientEvent {
    ClientEvent::LeaveChannel(LeaveChannelPayload { channel_id })
}

pub fn send_event(channel_id: i64, user_id: i64, content: String) -> ClientEvent {
    ClientEvent::SendMessage(SendMessagePayload {
        channel_id,
        user_id: Some(user_id),
        username: None,
        content,
    })
}
