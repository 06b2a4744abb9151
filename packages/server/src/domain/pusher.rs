//! Outbound delivery to connected clients.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ChatEvent, ConnectionId, MessagePushError};

/// Per-connection outbound queue of serialized frames
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Encodes events for the transport and pushes them to live connections.
///
/// Delivery is best-effort and at-most-once: a connection whose transport is
/// already closed is skipped during a broadcast.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    async fn register_client(&self, connection: ConnectionId, sender: PusherChannel);

    async fn unregister_client(&self, connection: &ConnectionId);

    async fn push_to(
        &self,
        connection: &ConnectionId,
        event: &ChatEvent,
    ) -> Result<(), MessagePushError>;

    /// Deliver `event` to every target. Missing or closed targets are
    /// logged and skipped; the rest still receive the frame.
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &ChatEvent,
    ) -> Result<(), MessagePushError>;
}
