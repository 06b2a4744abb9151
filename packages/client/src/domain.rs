//! What to do after a session ends with an error.

use std::time::Duration;

use crate::error::ClientError;

/// Outcome of a failed session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// The server refused this user; another attempt would be refused too.
    Abort,
    /// Wait, then connect again.
    Retry,
    /// The reconnect budget is spent.
    GiveUp,
}

/// Reconnect budget of the client: up to `max_attempts` failed sessions,
/// `interval` apart.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            interval: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// `failures` counts failed sessions so far, including the one that
    /// produced `error`.
    pub fn decide(&self, error: &ClientError, failures: u32) -> RetryDecision {
        match error {
            ClientError::Unauthorized(_) => RetryDecision::Abort,
            ClientError::ConnectionError(_) if failures < self.max_attempts => RetryDecision::Retry,
            ClientError::ConnectionError(_) => RetryDecision::GiveUp,
        }
    }
}
