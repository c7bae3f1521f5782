//! Kairan relay server library.
//!
//! This library implements a WebSocket message relay: every message sent by a
//! client is broadcast to all connected clients, a bounded buffer of recent
//! messages is replayed to newly connected clients, and lightweight rooms
//! track membership for introspection over HTTP.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
