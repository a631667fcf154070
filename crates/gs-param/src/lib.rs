//! `gs-param` — runtime-validated parameter sets for the gridsim framework.
//!
//! Both agents and models declare their configuration as a [`ParameterSet`]:
//! an order-independent mapping from string key to a typed, optionally
//! domain-checked value with a notion of "required and unset".  The set's
//! readiness gate (`is_ready`) is the precondition for initializing a model
//! or running an agent.
//!
//! # What lives here
//!
//! | Module    | Contents                                        |
//! |-----------|-------------------------------------------------|
//! | [`value`] | `ParamValue`, `ParamKind`                       |
//! | [`param`] | `Parameter`, `Domain`                           |
//! | [`set`]   | `ParameterSet` — registry + validation + gate   |
//! | [`error`] | `ParamError`, `ParamResult`                     |

pub mod error;
pub mod param;
pub mod set;
pub mod value;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{ParamError, ParamResult};
pub use param::{Domain, Parameter};
pub use set::ParameterSet;
pub use value::{ParamKind, ParamValue};
