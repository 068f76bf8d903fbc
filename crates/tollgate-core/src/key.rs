//! Subject key construction.

use std::fmt;

use crate::rule::Rule;

/// Fully qualified key for a counter in the shared store.
///
/// Unique per (rule signature, identity) pair across the whole deployment,
/// and namespaced under the limiter prefix so it cannot collide with
/// unrelated keys in a shared store instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubjectKey(String);

impl SubjectKey {
    pub fn new(prefix: &str, rule: &Rule, identity: &str) -> Self {
        Self(format!("{}:{}:{}", prefix, rule.signature(), identity))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
