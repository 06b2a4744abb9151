//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server does not know this user
    #[error("User {0} is not registered on the server")]
    Unauthorized(i64),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}
