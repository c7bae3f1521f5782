//! インメモリ Repository 実装

pub mod relay;

pub use relay::InMemoryRelayRepository;
