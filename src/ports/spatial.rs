//! Spatial index port - where other agents are.

use crate::{identifiers::AgentId, types::Position};

/// An agent found by a neighborhood query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Neighbor {
    pub id: AgentId,
    pub position: Position,
}

/// Positional index of one agent population.
///
/// A navigation agent registers itself in its own population's index and
/// queries both that index and, optionally, another population's index to
/// find nearby agents. Implementations must be safe to share between agents
/// stepped on different threads.
pub trait SpatialIndex: Send + Sync {
    /// Agents within Chebyshev distance `radius` of `center`.
    fn explore(&self, center: Position, radius: u32) -> Vec<Neighbor>;

    fn insert(&self, id: AgentId, position: Position);

    fn move_to(&self, id: AgentId, position: Position);

    fn remove(&self, id: AgentId);
}
