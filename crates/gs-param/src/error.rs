//! Parameter-validation error type.
//!
//! Every variant is a *configuration* error: local, recoverable, and
//! meant to be surfaced to whoever attempted the set so
//! they can retry with corrected input.  A failed operation never disturbs
//! sibling parameters that were already set.

use thiserror::Error;

use crate::ParamKind;

#[derive(Debug, Error)]
pub enum ParamError {
    #[error("parameter '{0}' is already declared")]
    DuplicateKey(String),

    #[error("unknown parameter '{0}'")]
    UnknownKey(String),

    #[error("parameter '{key}' expects {expected} but got {got}")]
    TypeMismatch {
        key:      String,
        expected: ParamKind,
        got:      ParamKind,
    },

    #[error("value for parameter '{key}' outside its domain: {description}")]
    DomainViolation {
        key:         String,
        /// Human-readable domain description, e.g. "an integer in 1..=100".
        description: String,
    },

    #[error("required parameter '{0}' has no value")]
    Unset(String),
}

pub type ParamResult<T> = Result<T, ParamError>;
