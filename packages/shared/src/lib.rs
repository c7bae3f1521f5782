//! Shared utilities for the Kairan relay server and client.

pub mod logger;
pub mod time;
