//! `GridState` — positional occupancy, background entities, and the radius
//! queries every non-trivial strategy is built on.
//!
//! # Storage
//!
//! Occupancy is a hash map from [`Position`] to [`Agent`] rather than a
//! dense `Vec<Option<Agent>>`: populations are typically sparse relative to
//! the board, the tick loop snapshots occupied cells only, and `copy()`
//! cost scales with agents rather than area.  `FxHashMap` because the keys
//! are small integer pairs hashed on every cell probe of every radius
//! query.
//!
//! # Radius metric
//!
//! All neighborhood queries use **Chebyshev** distance: the ball of radius
//! `r` is exactly the (2r+1)² square centered on the query cell, so the
//! query enumerates the clipped square directly — O(r²), independent of
//! grid size, no post-filter pass.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use gs_core::{AgentId, Position};

use crate::error::GridError;
use crate::{Agent, Entity, GridResult};

/// The mutable spatial state of one simulation.
///
/// Invariants:
/// - every stored position lies within `[0, width) × [0, height)`;
/// - at most one agent per position (enforced — adds and moves onto an
///   occupied cell fail, they never overwrite);
/// - the entity layer is independent of agent occupancy.
///
/// `Clone` is a deep copy: the clone shares no backing containers
/// with the original, so mutating one never aliases into the other.  The
/// model tick loop clones the pre-tick state and folds agent effects into
/// the clone.
#[derive(Clone, Debug, Default)]
pub struct GridState {
    width:    u32,
    height:   u32,
    agents:   FxHashMap<Position, Agent>,
    entities: FxHashMap<Position, Entity>,
}

impl GridState {
    /// An empty `width × height` board.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            agents:   FxHashMap::default(),
            entities: FxHashMap::default(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    // ── Predicates ────────────────────────────────────────────────────────

    /// `true` iff `pos` lies within `[0, width) × [0, height)`.
    #[inline]
    pub fn is_inside(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as u32) < self.width
            && (pos.y as u32) < self.height
    }

    /// In bounds and agent-free.  Out-of-bounds cells are *not* free.
    #[inline]
    pub fn is_free(&self, pos: Position) -> bool {
        self.is_inside(pos) && !self.agents.contains_key(&pos)
    }

    /// In bounds and holding an agent.
    #[inline]
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.agents.contains_key(&pos)
    }

    // ── Agent occupancy ───────────────────────────────────────────────────

    /// Place `agent` at `pos`.
    ///
    /// Errors with [`GridError::OutOfBounds`] or [`GridError::Occupied`];
    /// an existing occupant is never overwritten.
    pub fn add_agent(&mut self, pos: Position, agent: Agent) -> GridResult<()> {
        if !self.is_inside(pos) {
            return Err(GridError::OutOfBounds(pos));
        }
        if self.agents.contains_key(&pos) {
            return Err(GridError::Occupied(pos));
        }
        self.agents.insert(pos, agent);
        Ok(())
    }

    /// Remove the agent with identity `id` from `pos`, returning it.
    ///
    /// Silent no-op (`None`) when the cell is empty or holds a *different*
    /// agent — a strategy acting on a stale position must not evict
    /// whoever moved in since.
    pub fn remove_agent(&mut self, pos: Position, id: AgentId) -> Option<Agent> {
        match self.agents.get(&pos) {
            Some(agent) if agent.id() == id => self.agents.remove(&pos),
            _ => None,
        }
    }

    /// Relocate the agent at `from` to `to` — remove + add, atomically.
    ///
    /// Errors with [`GridError::Vacant`] (`from` empty),
    /// [`GridError::OutOfBounds`] or [`GridError::Occupied`] (`to`); on any
    /// error the grid is unchanged.  The moved agent keeps its identity and
    /// parameters untouched.
    ///
    /// Moving in place (`from == to`) succeeds as a no-op; a strategy that
    /// picks its own cell as the relocation target is not occupying itself.
    pub fn move_agent(&mut self, from: Position, to: Position) -> GridResult<()> {
        if !self.is_inside(to) {
            return Err(GridError::OutOfBounds(to));
        }
        if from == to {
            return if self.agents.contains_key(&from) {
                Ok(())
            } else {
                Err(GridError::Vacant(from))
            };
        }
        if self.agents.contains_key(&to) {
            return Err(GridError::Occupied(to));
        }
        let Some(agent) = self.agents.remove(&from) else {
            return Err(GridError::Vacant(from));
        };
        self.agents.insert(to, agent);
        Ok(())
    }

    /// The agent at `pos`, if any.  Never errors for any position.
    pub fn agent_at(&self, pos: Position) -> Option<&Agent> {
        self.agents.get(&pos)
    }

    /// Mutable access to the agent at `pos` — how strategies retag agents
    /// and mutate parameter sets (their own or a neighbor's).
    pub fn agent_at_mut(&mut self, pos: Position) -> Option<&mut Agent> {
        self.agents.get_mut(&pos)
    }

    // ── Entity layer ──────────────────────────────────────────────────────

    /// Place a background entity at `pos`; an existing entity at the same
    /// cell is replaced (entities have no occupancy invariant).
    pub fn place_entity(&mut self, pos: Position, entity: Entity) -> GridResult<()> {
        if !self.is_inside(pos) {
            return Err(GridError::OutOfBounds(pos));
        }
        self.entities.insert(pos, entity);
        Ok(())
    }

    pub fn remove_entity(&mut self, pos: Position) -> Option<Entity> {
        self.entities.remove(&pos)
    }

    /// The entity at `pos`, if any.  Never errors for any position.
    pub fn entity_at(&self, pos: Position) -> Option<&Entity> {
        self.entities.get(&pos)
    }

    // ── Radius queries ────────────────────────────────────────────────────

    /// All in-bounds positions within Chebyshev distance `r` of `center`,
    /// **including `center` itself** (when in bounds), in row-major order.
    ///
    /// Cost is O((2r+1)²) regardless of grid size — the clipped bounding
    /// square is enumerated directly, never the whole board.
    pub fn positions_within(&self, center: Position, r: u32) -> Vec<Position> {
        let r = r as i32;
        let y_lo = (center.y - r).max(0);
        let y_hi = (center.y + r).min(self.height as i32 - 1);
        let x_lo = (center.x - r).max(0);
        let x_hi = (center.x + r).min(self.width as i32 - 1);

        let mut out = Vec::new();
        for y in y_lo..=y_hi {
            for x in x_lo..=x_hi {
                out.push(Position::new(x, y));
            }
        }
        out
    }

    /// The occupied subset of [`positions_within`][Self::positions_within]
    /// as `(Position, &Agent)` pairs, **including `center`'s occupant** —
    /// filter by id if you only want neighbors.
    pub fn agents_within(&self, center: Position, r: u32) -> Vec<(Position, &Agent)> {
        self.positions_within(center, r)
            .into_iter()
            .filter_map(|p| self.agents.get(&p).map(|a| (p, a)))
            .collect()
    }

    // ── Snapshots ─────────────────────────────────────────────────────────

    /// A cloned snapshot of every `(Position, Agent)` pair in canonical
    /// row-major order.
    ///
    /// The snapshot is stable for the duration of one tick's iteration no
    /// matter how the live state is mutated — the tick loop iterates over
    /// the snapshot, never a live view.  Row-major order is imposed (not
    /// the map's iteration order) so deterministic strategies make the
    /// whole tick deterministic.
    pub fn agents(&self) -> Vec<(Position, Agent)> {
        let mut snapshot: Vec<(Position, Agent)> = self
            .agents
            .iter()
            .map(|(&p, a)| (p, a.clone()))
            .collect();
        snapshot.sort_unstable_by_key(|&(p, _)| p);
        snapshot
    }

    /// A cloned snapshot of every `(Position, Entity)` pair in row-major
    /// order.  Persistence serializes this; the tick loop never visits
    /// entities.
    pub fn entities(&self) -> Vec<(Position, Entity)> {
        let mut snapshot: Vec<(Position, Entity)> = self
            .entities
            .iter()
            .map(|(&p, e)| (p, e.clone()))
            .collect();
        snapshot.sort_unstable_by_key(|&(p, _)| p);
        snapshot
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// The distinct agent kinds currently on the board, sorted.
    ///
    /// Exit predicates like "fewer than two species remain" are one
    /// `kinds_present().len()` call.
    pub fn kinds_present(&self) -> BTreeSet<&str> {
        self.agents.values().map(Agent::kind).collect()
    }
}
