//! Repository 実装
//!
//! ## 概要
//!
//! このモジュールは `RelayRepository` trait の具体的な実装を提供します。
//!
//! ## 実装
//!
//! - `inmemory`: HashMap ベースのインメモリ実装
//! - 将来的に: `postgres`, `redis` など

pub mod inmemory;

pub use inmemory::InMemoryRelayRepository;
