//! Identity resolution - deciding who or what an event is attributed to.

use crate::error::EvalError;
use crate::rule::Rule;

/// Per-event context handed to the engine by a transport adapter.
///
/// `origin` is the event's network origin: the peer address for an HTTP
/// request, or the connection's peer for a WebSocket message (individual
/// messages have no network identity of their own, so the connection's
/// origin is reused for every message unless a context key is supplied).
/// `context_key` is an explicit per-call override token; when present it
/// replaces the origin for that call only.
#[derive(Debug, Clone, Default)]
pub struct EventContext {
    origin: Option<String>,
    context_key: Option<String>,
}

impl EventContext {
    /// Context for an event with a known network origin.
    pub fn from_origin(origin: impl Into<String>) -> Self {
        Self {
            origin: Some(origin.into()),
            context_key: None,
        }
    }

    /// Context with no discoverable origin.
    ///
    /// Evaluation fails with [`EvalError::IdentityUnresolved`] unless an
    /// override token is supplied here or on the rule.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Attach an explicit per-call override token.
    pub fn with_context_key(mut self, key: impl Into<String>) -> Self {
        self.context_key = Some(key.into());
        self
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn context_key(&self) -> Option<&str> {
        self.context_key.as_deref()
    }
}

/// Resolve the identity component of a subject key.
///
/// Precedence: the rule's pinned identity, then the event's override token,
/// then the event's origin. Empty strings count as absent. If nothing
/// remains the deployment is misconfigured - that is a fault, not a denial.
pub fn resolve(event: &EventContext, rule: &Rule) -> Result<String, EvalError> {
    [
        rule.identity_override(),
        event.context_key(),
        event.origin(),
    ]
    .into_iter()
    .flatten()
    .find(|candidate| !candidate.is_empty())
    .map(str::to_owned)
    .ok_or(EvalError::IdentityUnresolved)
}
