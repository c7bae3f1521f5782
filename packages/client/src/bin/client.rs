//! Simple WebSocket relay client with reconnection support.
//!
//! Connects to a WebSocket relay server and sends messages from stdin.
//! Every message is broadcast to all connected clients, and recent messages
//! are replayed right after connecting.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kairan-client -- --author Alice
//! cargo run --bin kairan-client -- -a Bob --room lobby
//! ```

use clap::Parser;

use kairan_client::run_client;
use kairan_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "kairan-client")]
#[command(about = "WebSocket relay client with broadcast support", long_about = None)]
struct Args {
    /// Display name attached to sent messages
    #[arg(short = 'a', long)]
    author: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:3001/ws")]
    url: String,

    /// Room to join right after connecting
    #[arg(short = 'r', long)]
    room: Option<String>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) = run_client(args.url, args.author, args.room).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
