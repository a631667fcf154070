//! `gs-grid` — the mutable spatial state every simulation runs on.
//!
//! A [`GridState`] is a `width × height` board indexing at most one
//! [`Agent`] per cell (the occupancy invariant) plus an independent layer of
//! passive background [`Entity`]s.  Agents carry their behavior as an
//! immutable [`TickStrategy`]; the three types are mutually recursive
//! (strategies mutate the grid that stores the agents that own them), which
//! is why they share one crate.
//!
//! # What lives here
//!
//! | Module     | Contents                                        |
//! |------------|-------------------------------------------------|
//! | [`grid`]   | `GridState` — occupancy, entities, radius query |
//! | [`agent`]  | `Agent`, `TickStrategy`                         |
//! | [`entity`] | `Entity` — passive cell occupant                |
//! | [`error`]  | `GridError`, `GridResult`                       |

pub mod agent;
pub mod entity;
pub mod error;
pub mod grid;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use agent::{Agent, TickStrategy};
pub use entity::Entity;
pub use error::{GridError, GridResult};
pub use grid::GridState;
