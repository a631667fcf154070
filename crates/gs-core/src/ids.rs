//! Strongly typed identifier wrappers.
//!
//! `AgentId` is identity-based rather than index-based: an agent keeps its
//! id when it moves between cells, when the grid is copied at the start of a
//! tick, and when it is serialized and restored.  `SessionId` is the external
//! string handle by which a front end refers to one configured simulation.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

// ── AgentId ───────────────────────────────────────────────────────────────────

/// Unique identity of one agent, stable across grid copies.
///
/// Equality on `AgentId` is how the tick loop tells "the same agent, moved"
/// from "a different agent now occupying this cell".
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct AgentId(pub u64);

/// Process-wide id source.  Starts at 1 so `AgentId(0)` never occurs
/// organically and can be used as a "no agent" marker in tests.
static NEXT_AGENT_ID: AtomicU64 = AtomicU64::new(1);

impl AgentId {
    /// Draw a fresh, process-unique id.
    ///
    /// Called by `AgentBuilder::build`; cloning an `Agent` (as the grid copy
    /// does every tick) deliberately does *not* draw a new id.
    pub fn fresh() -> AgentId {
        AgentId(NEXT_AGENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AgentId({})", self.0)
    }
}

// ── SessionId ─────────────────────────────────────────────────────────────────

/// External handle for one configured/running simulation.
///
/// The scheduler registry and the subscriber registry are both keyed by
/// `SessionId`.  The value is opaque to the engine — front ends typically
/// use a UUID string or a user-chosen name.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        SessionId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        SessionId(s.to_owned())
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        SessionId(s)
    }
}
