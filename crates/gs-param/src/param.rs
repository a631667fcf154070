//! A single declared parameter: key, kind, optional domain, optional value.

use std::fmt;
use std::sync::Arc;

use crate::{ParamKind, ParamResult, ParamValue};
use crate::error::ParamError;

// ── Domain ────────────────────────────────────────────────────────────────────

/// A validation predicate plus the human-readable description a front end
/// shows when the predicate rejects a candidate value.
///
/// The predicate is shared via `Arc`, so cloning a parameter (or a whole
/// [`ParameterSet`][crate::ParameterSet]) shares the immutable domain while
/// values stay independent.
#[derive(Clone)]
pub struct Domain {
    check:       Arc<dyn Fn(&ParamValue) -> bool + Send + Sync>,
    description: String,
}

impl Domain {
    pub fn new<F>(description: impl Into<String>, check: F) -> Self
    where
        F: Fn(&ParamValue) -> bool + Send + Sync + 'static,
    {
        Self {
            check:       Arc::new(check),
            description: description.into(),
        }
    }

    /// Convenience domain for integer ranges, the most common case
    /// (grid sizes, population counts).
    pub fn int_range(range: std::ops::RangeInclusive<i64>) -> Self {
        let description = format!("an integer in {}..={}", range.start(), range.end());
        Domain::new(description, move |v| {
            v.as_int().is_some_and(|n| range.contains(&n))
        })
    }

    /// Convenience domain for float intervals (probabilities, thresholds).
    pub fn float_range(range: std::ops::RangeInclusive<f64>) -> Self {
        let description = format!("a number in {}..={}", range.start(), range.end());
        Domain::new(description, move |v| {
            v.as_float().is_some_and(|x| range.contains(&x))
        })
    }

    #[inline]
    pub fn accepts(&self, value: &ParamValue) -> bool {
        (self.check)(value)
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Debug for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Domain")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

// ── Parameter ─────────────────────────────────────────────────────────────────

/// One declared parameter within a [`ParameterSet`][crate::ParameterSet].
///
/// Invariant: `value`, when present, matches `kind` and satisfies `domain`.
/// Both are enforced by every mutation path ([`Parameter::with_value`] and
/// `ParameterSet::set`), so readers never need to re-validate.
#[derive(Clone, Debug)]
pub struct Parameter {
    key:      String,
    kind:     ParamKind,
    domain:   Option<Domain>,
    value:    Option<ParamValue>,
    required: bool,
}

impl Parameter {
    /// Declare a user-settable parameter that must have a value before the
    /// owning set passes the readiness gate.
    pub fn required(key: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            key: key.into(),
            kind,
            domain: None,
            value: None,
            required: true,
        }
    }

    /// Declare an optional parameter (internal counters, tuning knobs).
    pub fn optional(key: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            key: key.into(),
            kind,
            domain: None,
            value: None,
            required: false,
        }
    }

    /// Attach a validation domain.
    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Attach an initial value, validated against kind and domain.
    pub fn with_value(mut self, value: impl Into<ParamValue>) -> ParamResult<Self> {
        let value = value.into();
        self.validate(&value)?;
        self.value = Some(value);
        Ok(self)
    }

    /// Check `candidate` against the declared kind and domain without
    /// storing it.
    pub(crate) fn validate(&self, candidate: &ParamValue) -> ParamResult<()> {
        if candidate.kind() != self.kind {
            return Err(ParamError::TypeMismatch {
                key:      self.key.clone(),
                expected: self.kind,
                got:      candidate.kind(),
            });
        }
        if let Some(domain) = &self.domain {
            if !domain.accepts(candidate) {
                return Err(ParamError::DomainViolation {
                    key:         self.key.clone(),
                    description: domain.description().to_owned(),
                });
            }
        }
        Ok(())
    }

    /// Store a pre-validated value.  Only `ParameterSet::set` and
    /// `with_value` call this, after `validate` succeeded.
    pub(crate) fn store(&mut self, value: ParamValue) {
        self.value = Some(value);
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    pub fn domain(&self) -> Option<&Domain> {
        self.domain.as_ref()
    }

    pub fn value(&self) -> Option<&ParamValue> {
        self.value.as_ref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// A required parameter with no value blocks the readiness gate.
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }
}
