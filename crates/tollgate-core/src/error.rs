//! Engine-level error types.

use thiserror::Error;

/// Configuration errors - invalid rule or limiter parameters.
///
/// These are fatal at construction time and are never coerced into a
/// rate limit decision.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("rule window must be greater than zero")]
    ZeroWindow,

    #[error("unknown failure policy: {0:?} (expected \"open\" or \"closed\")")]
    UnknownPolicy(String),
}

/// Evaluation errors - faults that are not rate limit denials.
///
/// A denial is an ordinary `Decision`, never an error. Transports should
/// treat these as internal faults (5xx-class), not as rejections, since
/// they indicate misconfiguration rather than caller behavior.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("no identity for event: no override token and no known origin")]
    IdentityUnresolved,
}
