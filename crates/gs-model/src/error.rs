use thiserror::Error;

use gs_grid::GridError;
use gs_param::ParamError;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("agent has no tick strategy attached")]
    MissingStrategy,

    #[error("model has no init function attached")]
    MissingInitFn,

    #[error("model has no exit function attached")]
    MissingExitFn,

    /// The readiness gate failed: the named required parameters are unset.
    #[error("required parameters not set: {}", .0.join(", "))]
    ParametersNotSet(Vec<String>),

    #[error(transparent)]
    Param(#[from] ParamError),

    #[error(transparent)]
    Grid(#[from] GridError),
}

pub type ModelResult<T> = Result<T, ModelError>;
