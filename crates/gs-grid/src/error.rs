//! Spatial error type.
//!
//! Every variant is a violated occupancy/bounds invariant.  Per the error
//! taxonomy these are programming errors in a behavior strategy: the tick
//! that triggered one is abandoned (the scheduler logs it per simulation),
//! but silently clobbering occupancy is never an option.

use thiserror::Error;

use gs_core::Position;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("position {0} is outside the grid")]
    OutOfBounds(Position),

    #[error("position {0} is already occupied by an agent")]
    Occupied(Position),

    #[error("no agent at position {0}")]
    Vacant(Position),
}

pub type GridResult<T> = Result<T, GridError>;
