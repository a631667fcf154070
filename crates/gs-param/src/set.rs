//! `ParameterSet` — the keyed registry of declared parameters.
//!
//! # Why a `BTreeMap`
//!
//! Iteration order feeds user-facing listings (`unset_required`) and the
//! persistence format, so it must be stable across runs.  A `BTreeMap`
//! gives deterministic key order for free; sets are small (tens of keys at
//! most), so the log-time lookups are irrelevant.

use std::collections::BTreeMap;

use crate::error::ParamError;
use crate::{ParamKind, ParamResult, ParamValue, Parameter};

/// An order-independent mapping from string key to a typed, optionally
/// domain-validated parameter.
///
/// `Clone` is a full copy: cloned values are fully independent of
/// the original (setting a value on the clone never leaks back), while
/// domain predicates — immutable by construction — are shared via `Arc`.
/// Model parameter templates rely on this when the same declared set is
/// reused across configuration sessions.
#[derive(Clone, Debug, Default)]
pub struct ParameterSet {
    params: BTreeMap<String, Parameter>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Declaration ───────────────────────────────────────────────────────

    /// Register a new parameter.  Errors with [`ParamError::DuplicateKey`]
    /// if the key is already declared.
    pub fn add(&mut self, param: Parameter) -> ParamResult<()> {
        if self.params.contains_key(param.key()) {
            return Err(ParamError::DuplicateKey(param.key().to_owned()));
        }
        self.params.insert(param.key().to_owned(), param);
        Ok(())
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Set a value, validating key, kind, and domain.
    ///
    /// On any failure the parameter keeps its previous value, so a front
    /// end can show one field's validation error without losing the user's
    /// other entries.
    pub fn set(&mut self, key: &str, value: impl Into<ParamValue>) -> ParamResult<()> {
        let value = value.into();
        let param = self
            .params
            .get_mut(key)
            .ok_or_else(|| ParamError::UnknownKey(key.to_owned()))?;
        param.validate(&value)?;
        param.store(value);
        Ok(())
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn get(&self, key: &str) -> Option<&Parameter> {
        self.params.get(key)
    }

    /// Typed probe: `Some` only if `key` exists **and** its declared kind
    /// is `kind`.
    ///
    /// The double check is intentional — heterogeneous callers (a strategy
    /// scanning arbitrary neighbor agents) can probe for "an Int named
    /// energy" without erroring on agents that lack it or declare it as
    /// something else.
    pub fn get_typed(&self, key: &str, kind: ParamKind) -> Option<&Parameter> {
        self.params.get(key).filter(|p| p.kind() == kind)
    }

    /// The set value for `key`, if any.
    pub fn value(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key).and_then(Parameter::value)
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        self.value(key).and_then(ParamValue::as_int)
    }

    pub fn float(&self, key: &str) -> Option<f64> {
        self.value(key).and_then(ParamValue::as_float)
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        self.value(key).and_then(ParamValue::as_bool)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.value(key).and_then(ParamValue::as_text)
    }

    // ── Fallible typed getters (for init functions past the gate) ─────────

    pub fn require_int(&self, key: &str) -> ParamResult<i64> {
        self.int(key).ok_or_else(|| ParamError::Unset(key.to_owned()))
    }

    pub fn require_float(&self, key: &str) -> ParamResult<f64> {
        self.float(key).ok_or_else(|| ParamError::Unset(key.to_owned()))
    }

    pub fn require_bool(&self, key: &str) -> ParamResult<bool> {
        self.bool(key).ok_or_else(|| ParamError::Unset(key.to_owned()))
    }

    pub fn require_text(&self, key: &str) -> ParamResult<&str> {
        self.text(key).ok_or_else(|| ParamError::Unset(key.to_owned()))
    }

    // ── Readiness gate ────────────────────────────────────────────────────

    /// Keys of required parameters that still have no value — what a front
    /// end must prompt for before the owning model/agent may run.
    pub fn unset_required(&self) -> Vec<&str> {
        self.params
            .values()
            .filter(|p| p.is_required() && !p.is_set())
            .map(Parameter::key)
            .collect()
    }

    /// The readiness gate: `true` iff every required parameter has a value.
    pub fn is_ready(&self) -> bool {
        self.params
            .values()
            .all(|p| !p.is_required() || p.is_set())
    }

    // ── Iteration ─────────────────────────────────────────────────────────

    /// All declared parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.values()
    }

    /// `(key, value)` pairs for every *set* parameter, in key order.
    /// This is what persistence serializes — declarations and domains are
    /// code, values are data.
    pub fn values(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.params
            .values()
            .filter_map(|p| p.value().map(|v| (p.key(), v)))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
