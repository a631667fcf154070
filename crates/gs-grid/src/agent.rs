//! `Agent` — one behavior unit — and the `TickStrategy` seam it closes over.

use std::fmt;
use std::sync::Arc;

use gs_core::{AgentId, Position};
use gs_param::{ParamResult, ParamValue, ParameterSet};

use crate::{GridResult, GridState};

// ── TickStrategy ──────────────────────────────────────────────────────────────

/// Pluggable per-tick agent behavior — the main extension point for
/// behavior catalogs.
///
/// A strategy is invoked once per agent per model tick with the working
/// state and the agent's position in the pre-tick snapshot.  It may move,
/// add, or remove agents, and mutate parameter sets (its own or a
/// neighbor's) through `GridState::agent_at_mut`.
///
/// # Thread safety
///
/// The scheduler may tick different simulations on different worker
/// threads, so strategies must be `Send + Sync`.  Per-agent state belongs
/// in the agent's [`ParameterSet`], not in the strategy itself — the
/// strategy instance is shared by every clone of the agent.
///
/// Any `Fn(&mut GridState, Position) -> GridResult<()>` closure implements
/// the trait, so simple behaviors need no named type:
///
/// ```rust,ignore
/// builder.strategy(|state: &mut GridState, pos: Position| {
///     let free: Vec<_> = state
///         .positions_within(pos, 1)
///         .into_iter()
///         .filter(|&p| state.is_free(p))
///         .collect();
///     match free.first() {
///         Some(&target) => state.move_agent(pos, target),
///         None => Ok(()),
///     }
/// });
/// ```
pub trait TickStrategy: Send + Sync + 'static {
    /// Advance one agent.  `pos` is where the pre-tick snapshot saw it.
    fn tick(&self, state: &mut GridState, pos: Position) -> GridResult<()>;
}

impl<F> TickStrategy for F
where
    F: Fn(&mut GridState, Position) -> GridResult<()> + Send + Sync + 'static,
{
    fn tick(&self, state: &mut GridState, pos: Position) -> GridResult<()> {
        self(state, pos)
    }
}

// ── Agent ─────────────────────────────────────────────────────────────────────

/// One simulated entity: identity, a mutable species tag, parameters, and
/// an immutable tick strategy.
///
/// Built once via `AgentBuilder` (gs-model) and thereafter only mutated
/// through its tag and parameters.  `Clone` — which the grid copy performs
/// for every agent every tick — keeps the `AgentId` and shares the strategy
/// via `Arc`, while parameters are deep-cloned so the pre-tick snapshot is
/// insulated from in-tick mutation.
#[derive(Clone)]
pub struct Agent {
    id:       AgentId,
    kind:     String,
    params:   ParameterSet,
    strategy: Arc<dyn TickStrategy>,
}

impl Agent {
    /// Assemble an agent from parts.  Prefer `AgentBuilder` (gs-model),
    /// which validates and assigns the fresh id; this constructor exists
    /// for the builder and for persistence to call.
    pub fn new(
        id:       AgentId,
        kind:     impl Into<String>,
        params:   ParameterSet,
        strategy: Arc<dyn TickStrategy>,
    ) -> Self {
        Self {
            id,
            kind: kind.into(),
            params,
            strategy,
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    /// The species tag.  A display label first; strategies may also branch
    /// on it when scanning neighbors.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Retag the agent — e.g. an SIR strategy flipping `"S"` to `"I"`.
    pub fn set_kind(&mut self, kind: impl Into<String>) {
        self.kind = kind.into();
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut ParameterSet {
        &mut self.params
    }

    /// Validated parameter write — the side-effect channel strategies use
    /// on themselves and on neighbor agents (e.g. depleting energy).
    pub fn set_parameter(&mut self, key: &str, value: impl Into<ParamValue>) -> ParamResult<()> {
        self.params.set(key, value)
    }

    /// Shared handle to the (immutable) strategy.
    pub fn strategy(&self) -> Arc<dyn TickStrategy> {
        Arc::clone(&self.strategy)
    }

    /// Run this agent's strategy against `state`.
    ///
    /// Total with respect to a missing self: if `pos` no longer holds an
    /// agent with this id — it was removed or displaced by an agent visited
    /// earlier in the same tick — the state is returned unchanged rather
    /// than failing.  The tick loop relies on this to visit a fixed
    /// pre-tick snapshot without tracking removals.
    pub fn tick(&self, state: &mut GridState, pos: Position) -> GridResult<()> {
        match state.agent_at(pos) {
            Some(current) if current.id == self.id => self.strategy.tick(state, pos),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
