//! # Tollgate Core
//!
//! The engine of the tollgate distributed rate limiter: rules, identity
//! resolution, subject keys, and the admission decision logic.
//! This crate contains no store backend - those live in `tollgate-infra`
//! and plug in through the [`ports::CounterStore`] trait.

pub mod decision;
pub mod error;
pub mod identity;
pub mod key;
pub mod limiter;
pub mod ports;
pub mod rule;

pub use decision::Decision;
pub use error::{ConfigError, EvalError};
pub use identity::EventContext;
pub use key::SubjectKey;
pub use limiter::{DEFAULT_PREFIX, FailurePolicy, Limiter, LimiterConfig};
pub use rule::Rule;
