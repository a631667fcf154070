//! Closed value universe for parameters.
//!
//! Parameters are configured at runtime from front ends and saved files, so
//! their values live in a closed enum rather than a generic type parameter —
//! the declared [`ParamKind`] is checked against a candidate value's runtime
//! kind on every set, and typed probes (`as_int` etc.) return `None` on a
//! kind mismatch instead of panicking.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── ParamKind ─────────────────────────────────────────────────────────────────

/// The declared type of a parameter.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ParamKind {
    Int,
    Float,
    Bool,
    Text,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamKind::Int   => "Int",
            ParamKind::Float => "Float",
            ParamKind::Bool  => "Bool",
            ParamKind::Text  => "Text",
        };
        f.write_str(name)
    }
}

// ── ParamValue ────────────────────────────────────────────────────────────────

/// A typed parameter value.
///
/// Serde-serializable so saved simulations can persist parameter values
/// without persisting domains or strategies.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl ParamValue {
    /// The runtime kind of this value.
    #[inline]
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Int(_)   => ParamKind::Int,
            ParamValue::Float(_) => ParamKind::Float,
            ParamValue::Bool(_)  => ParamKind::Bool,
            ParamValue::Text(_)  => ParamKind::Text,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v)   => write!(f, "{v}"),
            ParamValue::Float(v) => write!(f, "{v}"),
            ParamValue::Bool(v)  => write!(f, "{v}"),
            ParamValue::Text(v)  => f.write_str(v),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}
