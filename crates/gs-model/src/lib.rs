//! `gs-model` — the agent/model abstraction layer.
//!
//! A [`Model`] orchestrates one simulation "species": it owns the
//! model-level parameter set, an initializer that builds the starting
//! [`GridState`][gs_grid::GridState] from parameters, the per-tick fold
//! that visits every agent against a copy of the pre-tick state, an exit
//! predicate over consecutive states, and an optional statistics extractor.
//!
//! Behavior catalogs plug in through two seams: [`AgentBuilder`] /
//! [`ModelBuilder`] for assembly, and [`AgentFactory`] / [`ModelFactory`]
//! for the contracts a concrete simulation (flocking, contagion,
//! segregation, …) must supply.
//!
//! # What lives here
//!
//! | Module      | Contents                                        |
//! |-------------|-------------------------------------------------|
//! | [`model`]   | `Model`, `Statistics`, function type aliases    |
//! | [`builder`] | `AgentBuilder`, `ModelBuilder`                  |
//! | [`factory`] | `AgentFactory`, `ModelFactory`                  |
//! | [`error`]   | `ModelError`, `ModelResult`                     |

pub mod builder;
pub mod error;
pub mod factory;
pub mod model;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use builder::{AgentBuilder, ModelBuilder};
pub use error::{ModelError, ModelResult};
pub use factory::{AgentFactory, ModelFactory};
pub use model::{ExitFn, InitFn, Model, Statistics, StatisticsFn};
