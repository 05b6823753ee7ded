//! Error types.
//!
//! Only registration can fail outright. Everything that can go wrong while
//! classifying (bad input, unknown family, a broken predicate) is folded into
//! the returned `ClassificationResult` instead.

use std::borrow::Cow;

use thiserror::Error;

use crate::engine::Strategy;

/// Rule-set misconfiguration detected while building a registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("duplicate rule id '{id}' in family '{family}'")]
    DuplicateRuleId { family: String, id: &'static str },

    #[error("rule with empty id in family '{family}'")]
    EmptyRuleId { family: String },

    #[error("family '{family}' already holds rules evaluated as {existing}; cannot switch to {requested}")]
    StrategyConflict { family: String, existing: Strategy, requested: Strategy },
}

/// Raised by a predicate that could not evaluate its input.
///
/// The composer demotes it to a no-opinion step and keeps going.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct PredicateFailure {
    pub message: Cow<'static, str>,
}

impl PredicateFailure {
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        PredicateFailure { message: message.into() }
    }

    /// A context key held a value of the wrong shape.
    pub fn bad_context(key: &str, expected: &str) -> Self {
        PredicateFailure::new(format!("context key '{key}' is not a {expected}"))
    }
}
