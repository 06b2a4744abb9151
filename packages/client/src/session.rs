//! WebSocket client session management.

use futures_util::{Sink, SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, protocol::Message},
};
use tsudoi_server::infrastructure::dto::websocket::{ClientEvent, ServerEvent};

use super::{
    command::{InputCommand, join_event, leave_event, parse_input, send_event},
    error::ClientError,
    formatter::MessageFormatter,
    ui::redisplay_prompt,
};

/// What a session needs to know about the user across reconnects
pub struct SessionContext<'a> {
    pub url: &'a str,
    pub user_id: i64,
    pub prompt: &'a str,
    /// Channel to rejoin on (re)connect; updated by `/join` and `/leave`
    pub channel: Option<i64>,
}

/// Run one WebSocket connection until the user quits or the connection drops.
///
/// Returns `Ok(())` when the user ends the session.
pub async fn run_client_session(
    ctx: &mut SessionContext<'_>,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let url = format!("{}?user_id={}", ctx.url, ctx.user_id);

    let (ws_stream, _response) = match connect_async(&url).await {
        Ok(result) => result,
        Err(WsError::Http(response)) if response.status().as_u16() == 401 => {
            return Err(ClientError::Unauthorized(ctx.user_id));
        }
        Err(e) => return Err(ClientError::ConnectionError(e.to_string())),
    };

    tracing::info!("Connected to chat server!");
    println!(
        "\nConnected as user {}. Commands: /join <channel id>, /leave, /quit. Press Ctrl+C to exit.\n",
        ctx.user_id
    );

    let (mut write, mut read) = ws_stream.split();

    if let Some(channel_id) = ctx.channel {
        send_client_event(&mut write, &join_event(channel_id, ctx.user_id)).await?;
        print!("{}", MessageFormatter::format_notice(&format!("Joined channel {}", channel_id)));
        redisplay_prompt(ctx.prompt);
    }

    loop {
        tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    let formatted = match serde_json::from_str::<ServerEvent>(text.as_str()) {
                        Ok(event) => MessageFormatter::format_server_event(&event, ctx.user_id),
                        Err(_) => MessageFormatter::format_raw_message(text.as_str()),
                    };
                    print!("{}", formatted);
                    redisplay_prompt(ctx.prompt);
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Server closed the connection");
                    return Err(ClientError::ConnectionError("Connection lost".to_string()));
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    return Err(ClientError::ConnectionError(e.to_string()));
                }
            },
            line = input_rx.recv() => {
                // Input closed (Ctrl+C / Ctrl+D) ends the client
                let Some(line) = line else {
                    write.send(Message::Close(None)).await.ok();
                    return Ok(());
                };
                let event = match parse_input(&line) {
                    Ok(InputCommand::Quit) => {
                        write.send(Message::Close(None)).await.ok();
                        return Ok(());
                    }
                    Ok(command) => match outgoing_event(ctx, command) {
                        Ok(event) => event,
                        Err(notice) => {
                            print!("{}", MessageFormatter::format_notice(&notice));
                            redisplay_prompt(ctx.prompt);
                            continue;
                        }
                    },
                    Err(usage) => {
                        print!("{}", MessageFormatter::format_notice(&usage));
                        redisplay_prompt(ctx.prompt);
                        continue;
                    }
                };
                send_client_event(&mut write, &event).await?;
            }
        }
    }
}

/// Turn a command into the event to send, tracking the current channel.
fn outgoing_event(ctx: &mut SessionContext<'_>, command: InputCommand) -> Result<ClientEvent, String> {
    match command {
        InputCommand::Join(channel_id) => {
            ctx.channel = Some(channel_id);
            Ok(join_event(channel_id, ctx.user_id))
        }
        InputCommand::Leave => match ctx.channel.take() {
            Some(channel_id) => Ok(leave_event(channel_id)),
            None => Err("You are not in a channel".to_string()),
        },
        InputCommand::Say(content) => match ctx.channel {
            Some(channel_id) => Ok(send_event(channel_id, ctx.user_id, content)),
            None => Err("Join a channel first: /join <channel id>".to_string()),
        },
        InputCommand::Quit => Err("Already quitting".to_string()),
    }
}

async fn send_client_event<S>(write: &mut S, event: &ClientEvent) -> Result<(), ClientError>
where
    S: Sink<Message, Error = WsError> + Unpin,
{
    let json = serde_json::to_string(event)
        .map_err(|e| ClientError::ConnectionError(format!("Failed to serialize event: {}", e)))?;
    write
        .send(Message::Text(json.into()))
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> SessionContext<'static> {
        SessionContext {
            url: "ws://127.0.0.1:3000/ws",
            user_id: 2,
            prompt: "> ",
            channel: None,
        }
    }

    #[test]
    fn test_say_requires_channel() {
        // テスト項目: チャンネル未参加での発言は送信されない
        let mut ctx = context();
        let result = outgoing_event(&mut ctx, InputCommand::Say("hi".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_join_then_say_targets_channel() {
        // テスト項目: /join 後の発言は参加したチャンネルに送られる
        // given (前提条件):
        let mut ctx = context();

        // when (操作):
        let join = outgoing_event(&mut ctx, InputCommand::Join(5)).unwrap();
        let say = outgoing_event(&mut ctx, InputCommand::Say("hi".to_string())).unwrap();

        // then (期待する結果):
        assert_eq!(join, join_event(5, 2));
        assert_eq!(say, send_event(5, 2, "hi".to_string()));
        assert_eq!(ctx.channel, Some(5));
    }

    #[test]
    fn test_leave_clears_channel() {
        // テスト項目: /leave で現在のチャンネルを離脱し、再接続時に再参加しなくなる
        let mut ctx = context();
        ctx.channel = Some(7);
        let leave = outgoing_event(&mut ctx, InputCommand::Leave).unwrap();
        assert_eq!(leave, leave_event(7));
        assert_eq!(ctx.channel, None);
        assert!(outgoing_event(&mut ctx, InputCommand::Leave).is_err());
    }
}
