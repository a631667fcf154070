use thiserror::Error;

use gs_core::SessionId;
use gs_grid::GridError;
use gs_model::ModelError;
use gs_param::ParamError;
use gs_sim::SimError;

#[derive(Debug, Error)]
pub enum SchedError {
    #[error("unknown session '{0}'")]
    UnknownSession(SessionId),

    #[error("session '{0}' is already registered")]
    DuplicateSession(SessionId),

    /// Loading a saved simulation found a kind with no registered factory.
    #[error("no agent factory registered for kind '{0}'")]
    UnknownKind(String),

    #[error("saved simulation has unsupported format version {0}")]
    UnsupportedVersion(u32),

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Param(#[from] ParamError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("saved simulation is malformed: {0}")]
    Format(#[from] serde_json::Error),
}

pub type SchedResult<T> = Result<T, SchedError>;
