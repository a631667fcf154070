//! Fluent builders for [`Agent`] and [`Model`].
//!
//! Both follow the same contract: declarations accumulate fluently, all
//! validation happens in `build()`.  A duplicate parameter key or a missing
//! required piece (tick strategy, init function, exit function) surfaces
//! there, never as a panic later.

use std::sync::Arc;

use gs_core::AgentId;
use gs_grid::{Agent, TickStrategy};
use gs_param::{Parameter, ParameterSet};

use crate::model::{ExitFn, InitFn, Model, StatisticsFn};
use crate::{ModelError, ModelResult};

// ── AgentBuilder ──────────────────────────────────────────────────────────────

/// Fluent builder for one [`Agent`].
///
/// # Example
///
/// ```rust,ignore
/// let agent = AgentBuilder::new("wolf")
///     .param(Parameter::required("energy", ParamKind::Int).with_value(20)?)
///     .strategy(hunt)
///     .build()?;
/// ```
pub struct AgentBuilder {
    kind:     String,
    params:   Vec<Parameter>,
    strategy: Option<Arc<dyn TickStrategy>>,
}

impl AgentBuilder {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind:     kind.into(),
            params:   Vec::new(),
            strategy: None,
        }
    }

    /// Declare a parameter.  Duplicate keys are caught in `build()`.
    pub fn param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    /// Attach the tick strategy.
    pub fn strategy<S: TickStrategy>(mut self, strategy: S) -> Self {
        self.strategy = Some(Arc::new(strategy));
        self
    }

    /// Attach an already-shared strategy.
    ///
    /// Agent factories use this to hand the *same* strategy instance to a
    /// whole population instead of allocating one per agent.
    pub fn shared_strategy(mut self, strategy: Arc<dyn TickStrategy>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Validate and assemble, assigning a fresh [`AgentId`].
    ///
    /// Errors with [`ModelError::MissingStrategy`] if no strategy was
    /// attached, or a parameter error on duplicate keys.
    pub fn build(self) -> ModelResult<Agent> {
        let strategy = self.strategy.ok_or(ModelError::MissingStrategy)?;

        let mut params = ParameterSet::new();
        for p in self.params {
            params.add(p)?;
        }

        Ok(Agent::new(AgentId::fresh(), self.kind, params, strategy))
    }
}

// ── ModelBuilder ──────────────────────────────────────────────────────────────

/// Fluent builder for a [`Model`].
///
/// # Required inputs
///
/// - `.init_fn(..)` — builds the starting state from the parameter set
/// - `.exit_fn(..)` — the termination predicate over (old, new) states
///
/// # Optional inputs
///
/// - `.param(..)` — model-level parameter declarations (grid size,
///   population counts, …)
/// - `.statistics_fn(..)` — display statistics; absent generators yield an
///   empty list
pub struct ModelBuilder {
    params:     Vec<Parameter>,
    init:       Option<InitFn>,
    exit:       Option<ExitFn>,
    statistics: Option<StatisticsFn>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self {
            params:     Vec::new(),
            init:       None,
            exit:       None,
            statistics: None,
        }
    }

    /// Declare a model-level parameter.  Duplicate keys are caught in
    /// `build()`.
    pub fn param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    /// Attach the initializer that builds the starting state.
    pub fn init_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&ParameterSet) -> ModelResult<gs_grid::GridState> + Send + Sync + 'static,
    {
        self.init = Some(Box::new(f));
        self
    }

    /// Attach the exit predicate over consecutive states.
    pub fn exit_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&gs_grid::GridState, &gs_grid::GridState) -> bool + Send + Sync + 'static,
    {
        self.exit = Some(Box::new(f));
        self
    }

    /// Attach an optional statistics generator.
    pub fn statistics_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&gs_grid::GridState) -> crate::Statistics + Send + Sync + 'static,
    {
        self.statistics = Some(Box::new(f));
        self
    }

    /// Validate and assemble.
    ///
    /// Errors with [`ModelError::MissingInitFn`] / [`ModelError::MissingExitFn`]
    /// when a required function is unset, or a parameter error on duplicate
    /// keys.
    pub fn build(self) -> ModelResult<Model> {
        let init = self.init.ok_or(ModelError::MissingInitFn)?;
        let exit = self.exit.ok_or(ModelError::MissingExitFn)?;

        let mut params = ParameterSet::new();
        for p in self.params {
            params.add(p)?;
        }

        Ok(Model::new(params, init, exit, self.statistics))
    }
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}
