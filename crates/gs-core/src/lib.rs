//! `gs-core` — foundational types for the `gridsim` agent-simulation framework.
//!
//! This crate is a dependency of every other `gs-*` crate.  It intentionally
//! has no `gs-*` dependencies and minimal external ones (only `rand` and
//! `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                  |
//! |---------------|-------------------------------------------|
//! | [`position`]  | `Position` — integer grid coordinates     |
//! | [`ids`]       | `AgentId`, `SessionId`                    |
//! | [`time`]      | `Tick` — completed-tick counter           |
//! | [`rng`]       | `SimRng` — deterministic RNG for catalogs |

pub mod ids;
pub mod position;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use ids::{AgentId, SessionId};
pub use position::Position;
pub use rng::SimRng;
pub use time::Tick;
