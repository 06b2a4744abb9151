//! Tsudoi chat client.
//!
//! Connects to the chat server as a registered user, optionally joins a
//! channel, and sends each input line to that channel.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval)
//! and rejoins the channel it was in. An unknown user exits immediately.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tsudoi-client -- --user-id 1 --channel 5
//! ```

use clap::Parser;
use tsudoi_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "tsudoi-client")]
#[command(about = "Channel chat client for the Tsudoi server", long_about = None)]
struct Args {
    /// Registered user id to connect as
    #[arg(short = 'i', long)]
    user_id: i64,

    /// Channel to join right after connecting
    #[arg(short = 'c', long)]
    channel: Option<i64>,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:3000/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = tsudoi_client::run_client(args.url, args.user_id, args.channel).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
