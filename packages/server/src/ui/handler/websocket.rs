//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{ChannelId, ChatEvent, ConnectionSession, User, UserId},
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
};

/// Reply sent for frames that are not a known event
const INVALID_PAYLOAD: &str = "Invalid event payload";

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub user_id: String,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let user_id = match query.user_id.trim().parse::<i64>() {
        Ok(id) => UserId::new(id),
        Err(_) => {
            tracing::warn!("Invalid user_id format: '{}'", query.user_id);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    let user = match state.connect_participant_usecase.authenticate(user_id).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!("Rejecting connection: {}", e);
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user)))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound message flow: frames addressed to this connection
/// (via rx channel) are written to its WebSocket.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, user: User) {
    let (sender, mut receiver) = socket.split();

    let (tx, rx) = mpsc::unbounded_channel();
    let mut session = state.connect_participant_usecase.execute(&user, tx).await;
    tracing::info!(
        "'{}' (user {}) connected as {}",
        session.username(),
        session.user_id(),
        session.id()
    );

    let mut send_task = pusher_loop(rx, sender);

    loop {
        tokio::select! {
            frame = receiver.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    tracing::debug!("Received text from {}: {}", session.id(), text.as_str());
                    handle_text(&state, &mut session, text.as_str()).await;
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("'{}' closed the connection", session.username());
                    break;
                }
                Some(Ok(_)) => {
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Some(Err(e)) => {
                    tracing::warn!("WebSocket error on {}: {}", session.id(), e);
                    break;
                }
            },
            _ = &mut send_task => break,
        }
    }
    send_task.abort();

    let former = state
        .disconnect_participant_usecase
        .execute(&mut session)
        .await;
    match former {
        Some(channel_id) => tracing::info!(
            "'{}' disconnected from channel {}",
            session.username(),
            channel_id
        ),
        None => tracing::info!("'{}' disconnected", session.username()),
    }
}

async fn handle_text(state: &AppState, session: &mut ConnectionSession, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Unparsable frame from {}: {}", session.id(), e);
            reply_error(state, session, INVALID_PAYLOAD.to_string()).await;
            return;
        }
    };

    match event {
        ClientEvent::JoinChannel(payload) => {
            warn_on_claimed_identity(session, payload.user_id, payload.username.as_deref());
            if let Err(e) = state
                .join_channel_usecase
                .execute(session, ChannelId::new(payload.channel_id))
                .await
            {
                tracing::warn!("Join from {} ignored: {}", session.id(), e);
            }
        }
        ClientEvent::SendMessage(payload) => {
            warn_on_claimed_identity(session, payload.user_id, payload.username.as_deref());
            if let Err(e) = state
                .send_message_usecase
                .execute(session, ChannelId::new(payload.channel_id), payload.content)
                .await
            {
                tracing::warn!("Message from '{}' rejected: {}", session.username(), e);
                reply_error(state, session, e.to_string()).await;
            }
        }
        ClientEvent::LeaveChannel(payload) => {
            state
                .leave_channel_usecase
                .execute(session, ChannelId::new(payload.channel_id))
                .await;
        }
    }
}

/// Payload identity fields are never trusted; a mismatch is only logged.
fn warn_on_claimed_identity(
    session: &ConnectionSession,
    user_id: Option<i64>,
    username: Option<&str>,
) {
    let id_mismatch = user_id.is_some_and(|id| id != session.user_id().value());
    let name_mismatch = username.is_some_and(|name| name != session.username().as_str());
    if id_mismatch || name_mismatch {
        tracing::warn!(
            "Connection {} claims {:?}/{:?} but is bound to user {} '{}'",
            session.id(),
            user_id,
            username,
            session.user_id(),
            session.username()
        );
    }
}

async fn reply_error(state: &AppState, session: &ConnectionSession, error: String) {
    let event = ChatEvent::MessageError { error };
    if let Err(e) = state.message_pusher.push_to(&session.id(), &event).await {
        tracing::warn!("Failed to send message-error to {}: {}", session.id(), e);
    }
}
