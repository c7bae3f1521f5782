//! Message formatting utilities for client display.

use kairan_server::infrastructure::dto::websocket::{AckBody, MessageDto};
use kairan_shared::time::millis_to_rfc3339;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the recent-message history replayed right after connecting
    ///
    /// # Arguments
    ///
    /// * `messages` - Buffered messages pushed by the server
    ///
    /// # Returns
    ///
    /// A formatted string with the message history
    pub fn format_sync_history(messages: &[MessageDto]) -> String {
        let mut output = String::new();
        output.push_str("\n\n============================================================\n");
        output.push_str("Recent messages:\n");

        if messages.is_empty() {
            output.push_str("(No recent messages)\n");
        } else {
            for message in messages {
                let timestamp_str = millis_to_rfc3339(message.timestamp.unwrap_or_default());
                output.push_str(&format!(
                    "@{}: {} (sent at {})\n",
                    message.author, message.content, timestamp_str
                ));
            }
        }

        output.push_str("============================================================\n");
        output
    }

    /// Format a chat message
    ///
    /// # Arguments
    ///
    /// * `author` - The display name of the sender
    /// * `content` - The message content
    /// * `sent_at` - Unix timestamp when the server received the message (milliseconds)
    ///
    /// # Returns
    ///
    /// A formatted string with the chat message
    pub fn format_chat_message(author: &str, content: &str, sent_at: i64) -> String {
        let timestamp_str = millis_to_rfc3339(sent_at);
        format!(
            "\n\n------------------------------------------------------------\n\
             @{}: {}\n\
             sent at {}\n\
             ------------------------------------------------------------\n",
            author, content, timestamp_str
        )
    }

    /// Format a user-count notification
    ///
    /// # Arguments
    ///
    /// * `count` - The number of clients currently connected
    ///
    /// # Returns
    ///
    /// A formatted string with the connection count
    pub fn format_user_count(count: usize) -> String {
        format!("\n* {} client(s) connected\n", count)
    }

    /// Format the delivery result of a sent message
    ///
    /// # Arguments
    ///
    /// * `ack` - The ack payload returned by the server
    ///
    /// # Returns
    ///
    /// A confirmation line on success, or the failure reason
    pub fn format_ack(ack: &AckBody) -> String {
        if ack.success {
            let timestamp_str = millis_to_rfc3339(ack.timestamp.unwrap_or_default());
            format!("sent at {}\n", timestamp_str)
        } else {
            let reason = ack.error.as_deref().unwrap_or("unknown error");
            format!("send failed: {}\n", reason)
        }
    }

    /// Format a binary message notification
    ///
    /// # Arguments
    ///
    /// * `byte_count` - The number of bytes received
    ///
    /// # Returns
    ///
    /// A formatted string with the binary data notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when parsing fails)
    ///
    /// # Arguments
    ///
    /// * `text` - The raw text received
    ///
    /// # Returns
    ///
    /// A formatted string with the raw message
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
