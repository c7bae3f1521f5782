//! UI utilities for the client.

use std::io::Write;

/// Redisplay the prompt after receiving a message
pub fn redisplay_prompt(author: &str) {
    print!("{}> ", author);
    std::io::stdout().flush().ok();
}
