//! The `Model` struct and its snapshot-copy tick fold.

use gs_grid::GridState;
use gs_param::{ParamResult, ParamValue, ParameterSet};

use crate::{ModelError, ModelResult};

// ── Function seams ────────────────────────────────────────────────────────────

/// Builds the starting state from the model's (ready) parameter set.
pub type InitFn = Box<dyn Fn(&ParameterSet) -> ModelResult<GridState> + Send + Sync>;

/// Decides whether the simulation is over, given the pre- and post-tick
/// states.  Typical predicates: "no agent changed cell or membership",
/// "fewer than two species remain", "no agents of kind X left".
pub type ExitFn = Box<dyn Fn(&GridState, &GridState) -> bool + Send + Sync>;

/// Ordered `(label, value)` pairs for display — e.g.
/// `[("susceptible", "94"), ("infected", "6")]`.
pub type Statistics = Vec<(String, String)>;

/// Extracts display statistics from a state.
pub type StatisticsFn = Box<dyn Fn(&GridState) -> Statistics + Send + Sync>;

// ── Model ─────────────────────────────────────────────────────────────────────

/// The orchestrator of one simulation species.
///
/// Built once via [`ModelBuilder`][crate::ModelBuilder] and reused for the
/// whole lifetime of one simulation.  The model itself is stateless between
/// ticks — all evolving state lives in the `GridState` it is handed.
pub struct Model {
    params:     ParameterSet,
    init:       InitFn,
    exit:       ExitFn,
    statistics: Option<StatisticsFn>,
}

impl Model {
    pub(crate) fn new(
        params:     ParameterSet,
        init:       InitFn,
        exit:       ExitFn,
        statistics: Option<StatisticsFn>,
    ) -> Self {
        Self {
            params,
            init,
            exit,
            statistics,
        }
    }

    // ── Parameters ────────────────────────────────────────────────────────

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Validated write into the model-level parameter set.
    pub fn set_parameter(&mut self, key: &str, value: impl Into<ParamValue>) -> ParamResult<()> {
        self.params.set(key, value)
    }

    /// Required model parameters still without a value.
    pub fn unset_parameters(&self) -> Vec<&str> {
        self.params.unset_required()
    }

    /// The readiness gate for [`initialize`][Self::initialize].
    pub fn is_configured(&self) -> bool {
        self.params.is_ready()
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Build the starting state by running the init function against the
    /// model's parameter set.
    ///
    /// Errors with [`ModelError::ParametersNotSet`] if the readiness gate
    /// fails — callers should check [`is_configured`][Self::is_configured]
    /// first and prompt for the missing keys.
    pub fn initialize(&self) -> ModelResult<GridState> {
        if !self.params.is_ready() {
            let missing = self
                .params
                .unset_required()
                .into_iter()
                .map(str::to_owned)
                .collect();
            return Err(ModelError::ParametersNotSet(missing));
        }
        (self.init)(&self.params)
    }

    /// Advance the state by one tick.
    ///
    /// Captures the row-major `(position, agent)` snapshot of `state`,
    /// copies the state, then folds every snapshot agent's tick into the
    /// copy **in snapshot order**.  An agent that was removed or displaced
    /// by an earlier agent in the same tick is a contractual no-op
    /// ([`Agent::tick`][gs_grid::Agent::tick]), not a skipped iteration —
    /// concurrent mutation never costs another agent its turn.
    ///
    /// Deterministic strategies make the whole tick deterministic: the
    /// snapshot order is canonical and the fold is sequential.
    pub fn tick(&self, state: &GridState) -> ModelResult<GridState> {
        let snapshot = state.agents();
        let mut next = state.clone();
        for (pos, agent) in &snapshot {
            agent.tick(&mut next, *pos)?;
        }
        Ok(next)
    }

    /// Evaluate the exit predicate against consecutive states.
    pub fn is_over(&self, old: &GridState, new: &GridState) -> bool {
        (self.exit)(old, new)
    }

    /// Current display statistics; empty when no generator is attached.
    pub fn statistics(&self, state: &GridState) -> Statistics {
        match &self.statistics {
            Some(f) => f(state),
            None => Vec::new(),
        }
    }
}
