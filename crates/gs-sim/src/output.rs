//! Immutable output snapshots published to subscribers.

use serde::{Deserialize, Serialize};

use gs_core::{Position, Tick};
use gs_grid::GridState;
use gs_model::Statistics;

/// One occupied cell in a snapshot: position plus the occupant's kind
/// label.  Kinds are labels for display — front ends map them to colors or
/// glyphs without knowing the behavior catalog.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct CellView {
    pub pos:  Position,
    pub kind: String,
}

/// The immutable result of one successful simulation tick.
///
/// Decoupled from the live `GridState` on purpose: a snapshot crosses
/// thread and (serialized) process boundaries to subscribers, long after
/// the grid that produced it has moved on.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct SimOutput {
    /// Completed-tick counter of the producing simulation.
    pub tick: Tick,
    pub width: u32,
    pub height: u32,
    /// Occupied cells in row-major order.
    pub cells: Vec<CellView>,
    /// `true` once the model's exit predicate has fired; the final snapshot
    /// of a simulation carries it.
    pub finished: bool,
    /// Display statistics from the model's generator; empty without one.
    pub statistics: Statistics,
}

impl SimOutput {
    /// Capture a snapshot of `state` after a completed tick.
    pub(crate) fn capture(
        tick: Tick,
        state: &GridState,
        finished: bool,
        statistics: Statistics,
    ) -> Self {
        let cells = state
            .agents()
            .into_iter()
            .map(|(pos, agent)| CellView {
                pos,
                kind: agent.kind().to_owned(),
            })
            .collect();
        Self {
            tick,
            width: state.width(),
            height: state.height(),
            cells,
            finished,
            statistics,
        }
    }

    /// The kind label at `pos`, if that cell was occupied.
    pub fn kind_at(&self, pos: Position) -> Option<&str> {
        self.cells
            .iter()
            .find(|c| c.pos == pos)
            .map(|c| c.kind.as_str())
    }
}
