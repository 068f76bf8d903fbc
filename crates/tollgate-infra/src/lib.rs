//! # Tollgate Infrastructure
//!
//! Concrete counter store backends for the port defined in `tollgate-core`.
//!
//! ## Feature Flags
//!
//! - `redis` (default) - distributed counters on Redis or Valkey
//!
//! The in-memory store is always available and needs no external services.

pub mod store;

// Re-exports - In-Memory
pub use store::InMemoryCounterStore;

// Re-exports - Redis
#[cfg(feature = "redis")]
pub use store::{RedisCounterStore, RedisStoreConfig};
