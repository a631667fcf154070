//! `gs-sched` — the scheduler that runs many simulations off one ticker.
//!
//! A [`SimulationsController`] owns the registry of active simulations
//! keyed by session id.  A single [`Ticker`] thread drives it on a fixed
//! base period; each pass advances every *running* simulation — on the
//! calling thread or fanned out over rayon's pool, per [`TickSettings`] —
//! and forwards each produced snapshot to the one subscriber channel
//! registered for that session.
//!
//! ```text
//! Ticker ──every base period──▶ Controller::make_models_tick
//!            │ filter running
//!            ▼ per simulation (sync or rayon task)
//!         Simulation::tick ──Some(output)──▶ subscriber channel
//! ```
//!
//! # What lives here
//!
//! | Module         | Contents                                       |
//! |----------------|------------------------------------------------|
//! | [`controller`] | `SimulationsController`, `Subscriber`          |
//! | [`ticker`]     | `Ticker` — owned periodic driver thread        |
//! | [`config`]     | `TickSettings`, `TickMode`                     |
//! | [`session`]    | `SessionBuilder` — the front-end init flow     |
//! | [`persist`]    | `save_simulation` / `load_simulation` (JSON)   |
//! | [`error`]      | `SchedError`, `SchedResult`                    |

pub mod config;
pub mod controller;
pub mod error;
pub mod persist;
pub mod session;
pub mod ticker;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{TickMode, TickSettings};
pub use controller::{SimulationsController, Subscriber};
pub use error::{SchedError, SchedResult};
pub use persist::{load_simulation, save_simulation, SavedSimulation};
pub use session::SessionBuilder;
pub use ticker::Ticker;
