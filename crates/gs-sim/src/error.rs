//! Run-control error type.
//!
//! The state-machine variants are deliberate failures, not idempotent
//! no-ops: starting an already-running simulation or ticking one that is
//! mid-computation means the caller's picture of the state machine is
//! stale, and that deserves surfacing.

use thiserror::Error;

use gs_model::ModelError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation is already running")]
    AlreadyRunning,

    #[error("simulation is not running")]
    NotRunning,

    #[error("simulation has finished")]
    Finished,

    /// A previous tick for this simulation is still in flight — at most one
    /// tick may be computing at any time.
    #[error("a tick for this simulation is already calculating")]
    AlreadyCalculating,

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type SimResult<T> = Result<T, SimError>;
