//! WebSocket message relay server.
//!
//! Every message received from a client is broadcast to all connected clients,
//! and a bounded buffer of recent messages is replayed to new connections.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kairan-server
//! cargo run --bin kairan-server -- --host 0.0.0.0 --port 3001
//! PORT=4000 cargo run --bin kairan-server
//! ```

use std::{collections::HashMap, sync::Arc};

use clap::Parser;
use tokio::sync::Mutex;

use kairan_server::{
    domain::{BufferConfig, DEFAULT_MESSAGE_CAPACITY, DEFAULT_RETENTION_MS, Relay},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryRelayRepository,
    },
    ui::Server,
    usecase::{
        ConnectClientUseCase, DEFAULT_SYNC_WINDOW_MS, DisconnectClientUseCase,
        GetRelayStateUseCase, GetRoomDetailUseCase, GetRoomsUseCase, JoinRoomUseCase,
        SendMessageUseCase,
    },
};
use kairan_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "kairan-server")]
#[command(about = "WebSocket message relay server with broadcast support", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "3001")]
    port: u16,

    /// Maximum number of messages kept in the buffer
    #[arg(long, env = "BUFFER_CAPACITY", default_value_t = DEFAULT_MESSAGE_CAPACITY)]
    buffer_capacity: usize,

    /// Buffer retention period in milliseconds
    #[arg(long, env = "RETENTION_MS", default_value_t = DEFAULT_RETENTION_MS)]
    retention_ms: i64,

    /// History sync window for new connections in milliseconds
    #[arg(long, env = "SYNC_WINDOW_MS", default_value_t = DEFAULT_SYNC_WINDOW_MS)]
    sync_window_ms: i64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. UseCases
    // 4. Server

    // 1. Create Repository (in-memory relay state)
    let relay = Arc::new(Mutex::new(Relay::new(BufferConfig {
        capacity: args.buffer_capacity,
        retention_ms: args.retention_ms,
    })));
    tracing::info!(
        "Relay created (buffer capacity {}, retention {} ms)",
        args.buffer_capacity,
        args.retention_ms
    );
    let repository = Arc::new(InMemoryRelayRepository::new(relay, Arc::new(SystemClock)));

    // 2. Create MessagePusher (WebSocket implementation)
    let pusher_connections = Arc::new(Mutex::new(HashMap::new()));
    let message_pusher = Arc::new(WebSocketMessagePusher::new(pusher_connections.clone()));

    // 3. Create UseCases
    let connect_client_usecase = Arc::new(ConnectClientUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        args.sync_window_ms,
    ));
    let disconnect_client_usecase = Arc::new(DisconnectClientUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(repository.clone()));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(repository.clone()));
    let get_room_detail_usecase = Arc::new(GetRoomDetailUseCase::new(repository.clone()));
    let get_relay_state_usecase = Arc::new(GetRelayStateUseCase::new(repository.clone()));

    // 4. Create and run the server
    let server = Server::new(
        connect_client_usecase,
        disconnect_client_usecase,
        join_room_usecase,
        send_message_usecase,
        get_rooms_usecase,
        get_room_detail_usecase,
        get_relay_state_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
