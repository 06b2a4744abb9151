//! Domain error types.

use thiserror::Error;

/// Validation failures when constructing value objects
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Message content cannot be empty")]
    EmptyMessageContent,

    #[error("Message content is too long ({actual} characters, max {max})")]
    MessageContentTooLong { max: usize, actual: usize },
}

/// Failures of the persistent chat store
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Failed to access chat data file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize chat data: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("User '{0}' already exists")]
    DuplicateUsername(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] ValueObjectError),
}

/// Failures when pushing frames to connected clients
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Client '{0}' not found")]
    ClientNotFound(String),

    #[error("Failed to push message: {0}")]
    PushFailed(String),
}
