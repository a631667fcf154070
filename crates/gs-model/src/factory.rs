//! Factory contracts — the boundary to the behavior catalog.
//!
//! The engine is agnostic to what strategies compute; a concrete simulation
//! (flocking, contagion, predator/prey, segregation, foraging) plugs in by
//! supplying these two factories.  The front-end initialization flow asks a
//! [`ModelFactory`] for a model to configure, and persistence asks
//! [`AgentFactory`]s to rebuild saved agents kind by kind.

use gs_grid::Agent;

use crate::{Model, ModelResult};

/// Produces agents of one kind with their declared parameter set and tick
/// strategy.
///
/// Each call yields a fresh agent (fresh [`AgentId`][gs_core::AgentId],
/// fresh parameter values); implementations typically share one strategy
/// instance across the population via
/// [`AgentBuilder::shared_strategy`][crate::AgentBuilder::shared_strategy].
pub trait AgentFactory: Send + Sync {
    fn create_agent(&self) -> ModelResult<Agent>;
}

/// Produces a ready-to-configure [`Model`]: parameter declarations, init
/// function, exit predicate, optional statistics.
pub trait ModelFactory: Send + Sync {
    fn create_model(&self) -> ModelResult<Model>;
}
