//! The admission engine: window checks and rule composition.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::decision::Decision;
use crate::error::{ConfigError, EvalError};
use crate::identity::{self, EventContext};
use crate::key::SubjectKey;
use crate::ports::{CounterStore, StoreError};
use crate::rule::Rule;

/// Default key namespace when none is configured.
pub const DEFAULT_PREFIX: &str = "tollgate";

/// Policy for store unavailability: the store round trip failed or timed
/// out, and the engine must still return a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Admit when the store cannot be reached (availability first).
    #[default]
    FailOpen,
    /// Deny when the store cannot be reached (protect the backend).
    FailClosed,
}

impl FromStr for FailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" | "fail-open" => Ok(Self::FailOpen),
            "closed" | "fail-closed" => Ok(Self::FailClosed),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct LimiterConfig {
    /// Namespace prefix for all subject keys.
    pub prefix: String,
    /// What to do when the counter store is unreachable.
    pub failure_policy: FailurePolicy,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// The rate limiting engine.
///
/// Holds the process's shared counter store connection. Cheap to clone and
/// safe to share across concurrent evaluations: every counter mutation is a
/// single atomic step in the store, so the engine itself keeps no mutable
/// state. A `Limiter` cannot exist without a store, and dropping it
/// releases the engine's handle on the connection.
#[derive(Clone)]
pub struct Limiter {
    store: Arc<dyn CounterStore>,
    config: LimiterConfig,
}

impl Limiter {
    /// Create an engine over `store` with the default configuration.
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self::with_config(store, LimiterConfig::default())
    }

    /// Create an engine with an explicit prefix and failure policy.
    pub fn with_config(store: Arc<dyn CounterStore>, config: LimiterConfig) -> Self {
        Self { store, config }
    }

    /// Evaluate a single rule for an event.
    ///
    /// One atomic store round trip: increment the subject's counter and
    /// compare the result against the rule's capacity. The store serializes
    /// concurrent hits on the same key, so of N simultaneous events in one
    /// fresh window exactly `min(N, capacity)` are admitted.
    pub async fn check(&self, event: &EventContext, rule: &Rule) -> Result<Decision, EvalError> {
        let identity = identity::resolve(event, rule)?;
        let key = SubjectKey::new(&self.config.prefix, rule, &identity);

        // A zero-capacity rule denies unconditionally; starting a window in
        // the store would never change the outcome.
        if rule.capacity() == 0 {
            return Ok(Decision::deny(rule.window()));
        }

        match self.store.hit(key.as_str(), rule.window()).await {
            Ok(state) => {
                let decision = if state.count <= rule.capacity() {
                    Decision::admit()
                } else {
                    Decision::deny(state.expires_in)
                };
                debug!(
                    key = %key,
                    count = state.count,
                    capacity = rule.capacity(),
                    admitted = decision.admitted,
                    "checked rule"
                );
                Ok(decision)
            }
            Err(err) => Ok(self.apply_failure_policy(&key, rule.window(), err)),
        }
    }

    /// Evaluate an ordered set of rules for one event.
    ///
    /// All rules must admit. The first denial short-circuits: its decision
    /// becomes the composite decision and no later rule is consulted, so
    /// `retry_after` always belongs to the rule that denied and the number
    /// of store round trips is bounded by the rules actually checked. An
    /// empty rule set admits.
    pub async fn check_all(
        &self,
        event: &EventContext,
        rules: &[Rule],
    ) -> Result<Decision, EvalError> {
        for rule in rules {
            let decision = self.check(event, rule).await?;
            if !decision.admitted {
                return Ok(decision);
            }
        }
        Ok(Decision::admit())
    }

    fn apply_failure_policy(&self, key: &SubjectKey, window: Duration, err: StoreError) -> Decision {
        match self.config.failure_policy {
            FailurePolicy::FailOpen => {
                warn!(key = %key, error = %err, "counter store unavailable, failing open");
                Decision::admit()
            }
            FailurePolicy::FailClosed => {
                warn!(key = %key, error = %err, "counter store unavailable, failing closed");
                Decision::deny(window)
            }
        }
    }
}
