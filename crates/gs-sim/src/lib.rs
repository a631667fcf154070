//! `gs-sim` — one running simulation as a state machine.
//!
//! A [`Simulation`] wraps one (state, model) pair behind run control:
//!
//! ```text
//! Idle ──start()──▶ Running ◀──start()── Paused
//!                     │  ▲                  ▲
//!                     │  └────pause()───────┘
//!                     └──exit predicate──▶ Finished
//! ```
//!
//! Each scheduler pass offers the simulation one base period of elapsed
//! time via [`Simulation::tick`]; the simulation throttles itself against
//! its configured tick rate, guards against overlapping computation, and —
//! when due — advances its model once and emits an immutable [`SimOutput`]
//! snapshot.
//!
//! # What lives here
//!
//! | Module     | Contents                            |
//! |------------|-------------------------------------|
//! | [`sim`]    | `Simulation`, `RunState`            |
//! | [`output`] | `SimOutput`, `CellView`             |
//! | [`error`]  | `SimError`, `SimResult`             |

pub mod error;
pub mod output;
pub mod sim;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{SimError, SimResult};
pub use output::{CellView, SimOutput};
pub use sim::{RunState, Simulation};
