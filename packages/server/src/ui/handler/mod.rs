mod http;
mod websocket;

pub use http::{get_channel_members, get_channel_messages, health_check};
pub use websocket::websocket_handler;
