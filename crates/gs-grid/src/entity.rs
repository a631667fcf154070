//! Passive, non-agent cell occupants.

/// A background occupant of one grid cell — terrain, a sugar heap, a wall.
///
/// Entities never act and are never visited by the tick loop; strategies
/// read them (`GridState::entity_at`) to make decisions.  The entity layer
/// is independent of agent occupancy: a cell may hold an agent, an entity,
/// both, or neither.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Entity {
    kind: String,
}

impl Entity {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }
}
