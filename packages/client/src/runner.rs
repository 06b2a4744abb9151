//! Client execution logic with reconnection support.

use super::{
    domain::{RetryDecision, RetryPolicy},
    error::ClientError,
    session::{SessionContext, run_client_session},
    ui::spawn_input_reader,
};

/// Run the chat client with reconnection logic
///
/// After a reconnect the client rejoins the channel it was in.
pub async fn run_client(url: String, user_id: i64, channel: Option<i64>) -> Result<(), ClientError> {
    let policy = RetryPolicy::default();
    let prompt = format!("[{}]> ", user_id);
    let mut input_rx = spawn_input_reader(prompt.clone());
    let mut ctx = SessionContext {
        url: &url,
        user_id,
        prompt: &prompt,
        channel,
    };
    let mut failures = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} as user {} (attempt {}/{})",
            url,
            user_id,
            failures + 1,
            policy.max_attempts
        );

        let e = match run_client_session(&mut ctx, &mut input_rx).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                return Ok(());
            }
            Err(e) => e,
        };

        failures += 1;
        match policy.decide(&e, failures) {
            RetryDecision::Abort => return Err(e),
            RetryDecision::GiveUp => {
                tracing::error!(
                    "Failed to reconnect after {} attempts. Exiting.",
                    policy.max_attempts
                );
                return Err(e);
            }
            RetryDecision::Retry => {
                tracing::warn!("Connection lost: {}", e);
                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    policy.interval.as_secs(),
                    failures + 1,
                    policy.max_attempts
                );
                tokio::time::sleep(policy.interval).await;
            }
        }
    }
}
