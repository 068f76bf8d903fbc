//! Rate limiting rules.

use std::time::Duration;

use crate::error::ConfigError;

/// A single rate limiting rule: at most `capacity` admissions per `window`.
///
/// Rules are immutable value objects. Two rules with the same capacity and
/// window produce the same [`signature`](Rule::signature), so for a given
/// identity they share counter state in the store - they are the same
/// limiter, just constructed twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    capacity: u64,
    window: Duration,
    identity_override: Option<String>,
}

impl Rule {
    /// Create a rule allowing `capacity` admissions per `window`.
    ///
    /// A zero capacity is valid and denies every event. A zero window is a
    /// configuration error - it would describe a counter that resets
    /// instantly and can never be observed.
    pub fn new(capacity: u64, window: Duration) -> Result<Self, ConfigError> {
        if window.is_zero() {
            return Err(ConfigError::ZeroWindow);
        }
        Ok(Self {
            capacity,
            window,
            identity_override: None,
        })
    }

    /// `capacity` admissions per second.
    pub fn per_second(capacity: u64) -> Self {
        Self {
            capacity,
            window: Duration::from_secs(1),
            identity_override: None,
        }
    }

    /// `capacity` admissions per minute.
    pub fn per_minute(capacity: u64) -> Self {
        Self {
            capacity,
            window: Duration::from_secs(60),
            identity_override: None,
        }
    }

    /// `capacity` admissions per hour.
    pub fn per_hour(capacity: u64) -> Self {
        Self {
            capacity,
            window: Duration::from_secs(3600),
            identity_override: None,
        }
    }

    /// Pin this rule to a fixed identity instead of the event's identity.
    ///
    /// Useful for global limits that apply to all callers together.
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity_override = Some(identity.into());
        self
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn identity_override(&self) -> Option<&str> {
        self.identity_override.as_deref()
    }

    /// Stable signature embedded in subject keys, so distinct
    /// capacity/window pairs on the same identity occupy distinct counters.
    pub fn signature(&self) -> String {
        format!("{}x{}ms", self.capacity, self.window.as_millis())
    }
}
