//! Tsudoi channel chat server.
//!
//! Clients connect to `/ws?user_id=<id>`, join a channel and exchange
//! messages; every message is saved to the JSON data file before it is
//! broadcast to the channel room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tsudoi-server
//! cargo run --bin tsudoi-server -- --host 0.0.0.0 --port 3000 --data-file data/chat_data.json
//! ```

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use tsudoi_server::{
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryRoomRepository, JsonFileChatRepository},
    },
    ui::{AppState, Server},
};
use tsudoi_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "tsudoi-server")]
#[command(about = "Channel chat server with JSON file persistence", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "3000")]
    port: u16,

    /// JSON document holding users, groups, channels and messages
    #[arg(short = 'd', long, default_value = "data/chat_data.json")]
    data_file: PathBuf,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "debug")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Initialize dependencies in order:
    // 1. Store
    // 2. Room registry and MessagePusher
    // 3. AppState (UseCases)
    // 4. Server

    // 1. Load the store (created with defaults when missing or unreadable)
    let store = match JsonFileChatRepository::load(args.data_file.clone()).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!(
                "Failed to open data file {}: {}",
                args.data_file.display(),
                e
            );
            std::process::exit(1);
        }
    };
    tracing::info!("Store loaded from {}", store.path().display());

    // 2. Create the room registry (in-memory) and the WebSocket pusher
    let rooms = Arc::new(InMemoryRoomRepository::default());
    let message_pusher = Arc::new(WebSocketMessagePusher::default());

    // 3. Wire the use cases
    let state = Arc::new(AppState::new(
        store,
        rooms,
        message_pusher,
        Arc::new(SystemClock),
    ));

    // 4. Create and run the server
    let server = Server::new(state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
