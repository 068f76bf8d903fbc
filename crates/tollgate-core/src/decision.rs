//! Admission decisions.

use std::time::Duration;

use serde::Serialize;

/// Outcome of a rate limit evaluation.
///
/// Produced per event, never persisted. A denial carries the remaining
/// lifetime of the window that rejected it, so the caller knows the
/// earliest time admission may succeed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decision {
    /// Whether the event is admitted.
    pub admitted: bool,
    /// How long the caller should wait before retrying. Zero when admitted.
    pub retry_after: Duration,
}

impl Decision {
    /// An admitting decision.
    pub fn admit() -> Self {
        Self {
            admitted: true,
            retry_after: Duration::ZERO,
        }
    }

    /// A denying decision with a retry hint.
    pub fn deny(retry_after: Duration) -> Self {
        Self {
            admitted: false,
            retry_after,
        }
    }

    /// Retry hint in whole seconds, rounded up - the shape expected by a
    /// `Retry-After` response header.
    pub fn retry_after_secs(&self) -> u64 {
        self.retry_after.as_secs() + u64::from(self.retry_after.subsec_nanos() > 0)
    }
}
