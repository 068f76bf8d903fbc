use std::time::Duration;

use async_trait::async_trait;

/// Counter store trait - abstraction over shared counter backends
/// (Redis, in-memory).
///
/// A backend exposes one atomic primitive: record a hit against a key,
/// starting a window of the given duration when the counter is created, and
/// observe the post-hit count together with the window's remaining lifetime
/// in the same atomic step. Two concurrent hits must never observe the same
/// count - the store serializes them, so the engine needs no locking of its
/// own. Implementations must be safe to call from many in-flight
/// evaluations concurrently.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically record one hit against `key` and report the window state.
    ///
    /// Creates the counter with expiry `window` on first hit; the store's
    /// time-to-live mechanism resets it, so there is no delete operation.
    async fn hit(&self, key: &str, window: Duration) -> Result<WindowState, StoreError>;
}

/// State of a counter window as observed by a single atomic hit.
#[derive(Debug, Clone, Copy)]
pub struct WindowState {
    /// Counter value after this hit was recorded.
    pub count: u64,
    /// Time remaining until the window expires and the counter resets.
    pub expires_in: Duration,
}

/// Counter store operation errors.
///
/// These never escape the engine: the limiter converts them into a decision
/// according to its failure policy.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Operation failed: {0}")]
    Operation(String),
}
