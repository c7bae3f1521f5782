//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, protocol::Message},
};

use kairan_server::infrastructure::dto::websocket::{ClientFrame, MessageDto, ServerEvent};
use kairan_shared::time::now_unix_millis;

use crate::{error::ClientError, formatter::MessageFormatter, ui::redisplay_prompt};

/// Run the WebSocket client session
///
/// Connects to the server, optionally joins a room, then relays stdin lines
/// as `send_message` frames while printing everything the server pushes.
pub async fn run_client_session(
    url: &str,
    author: &str,
    room: Option<&str>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = match connect_async(url).await {
        Ok(result) => result,
        Err(tungstenite::Error::Url(e)) => {
            // A malformed URL never becomes connectable, treat it as fatal
            return Err(ClientError::InvalidUrl(e.to_string()));
        }
        Err(e) => {
            return Err(ClientError::ConnectionError(e.to_string()));
        }
    };

    tracing::info!("Connected to relay server!");
    println!(
        "\nYou are '{}'. Type messages and press Enter to send. Press Ctrl+C to exit.\n",
        author
    );

    let (mut write, mut read) = ws_stream.split();

    // Join the requested room before any input is processed
    if let Some(room) = room {
        match serde_json::to_string(&ClientFrame::join_room(room)) {
            Ok(json) => {
                write
                    .send(Message::Text(json.into()))
                    .await
                    .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
                tracing::info!("Joining room '{}'", room);
            }
            Err(e) => {
                tracing::error!("Failed to serialize join frame: {}", e);
            }
        }
    }

    // Clone author for read task
    let author_for_read = author.to_string();

    // Spawn a task to handle incoming messages
    let mut read_task = tokio::spawn(async move {
        let mut connection_error = false;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => match serde_json::from_str::<ServerEvent>(&text) {
                    Ok(ServerEvent::SyncMessages(messages)) => {
                        let formatted = MessageFormatter::format_sync_history(&messages);
                        print!("{}", formatted);
                        redisplay_prompt(&author_for_read);
                    }
                    Ok(ServerEvent::ReceiveMessage(chat)) => {
                        let formatted = MessageFormatter::format_chat_message(
                            &chat.author,
                            &chat.content,
                            chat.timestamp.unwrap_or_default(),
                        );
                        print!("{}", formatted);
                        redisplay_prompt(&author_for_read);
                    }
                    Ok(ServerEvent::UserCount(count)) => {
                        let formatted = MessageFormatter::format_user_count(count);
                        print!("{}", formatted);
                        redisplay_prompt(&author_for_read);
                    }
                    Ok(ServerEvent::Ack(ack)) => {
                        let formatted = MessageFormatter::format_ack(&ack);
                        print!("\n{}", formatted);
                        redisplay_prompt(&author_for_read);
                    }
                    // If parsing fails, display as raw text
                    Err(_) => {
                        let formatted = MessageFormatter::format_raw_message(&text);
                        print!("{}", formatted);
                        redisplay_prompt(&author_for_read);
                    }
                },
                Ok(Message::Binary(data)) => {
                    let formatted = MessageFormatter::format_binary_message(data.len());
                    print!("{}", formatted);
                    redisplay_prompt(&author_for_read);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    connection_error = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    connection_error = true;
                    break;
                }
                _ => {}
            }
        }

        connection_error
    });

    // Clone author for the input loop
    let author = author.to_string();
    let author_for_prompt = author.clone();

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", author_for_prompt);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to handle stdin input and send to WebSocket
    let session_started_at = now_unix_millis();
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;
        let mut seq: u64 = 0;

        while let Some(line) = input_rx.recv().await {
            // The sequence number doubles as the ack correlation id.
            // The sent confirmation is printed when the ack comes back.
            seq += 1;
            let message = MessageDto {
                id: format!("{}-{}", session_started_at, seq),
                author: author.clone(),
                content: line,
                timestamp: None,
            };
            let frame = ClientFrame::send_message(&message, seq);

            let json = match serde_json::to_string(&frame) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                    continue;
                }
            };

            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send message: {}", e);
                write_error = true;
                break;
            }
        }

        write_error
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            let connection_error = read_result.unwrap_or(false);
            if connection_error {
                return Err(ClientError::ConnectionError(
                    "Connection lost".to_string(),
                ));
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            let write_error = write_result.unwrap_or(false);
            if write_error {
                return Err(ClientError::ConnectionError(
                    "Connection lost".to_string(),
                ));
            }
        }
    }

    Ok(())
}
