//! In-memory spatial index implementing the [`SpatialIndex`] port.

use dashmap::DashMap;

use crate::{
    identifiers::AgentId,
    ports::{Neighbor, SpatialIndex},
    types::Position,
};

/// Agent positions of one population, keyed by agent id.
///
/// Queries scan every registered agent, which is fine for the few dozen
/// agents a grid evacuation run holds.
#[derive(Debug, Default)]
pub struct InMemorySpatialIndex {
    positions: DashMap<AgentId, Position>,
}

impl InMemorySpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position_of(&self, id: AgentId) -> Option<Position> {
        self.positions.get(&id).map(|entry| *entry)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl SpatialIndex for InMemorySpatialIndex {
    fn explore(&self, center: Position, radius: u32) -> Vec<Neighbor> {
        let mut found: Vec<Neighbor> = self
            .positions
            .iter()
            .filter(|entry| entry.value().chebyshev(center) <= radius)
            .map(|entry| Neighbor {
                id: *entry.key(),
                position: *entry.value(),
            })
            .collect();
        found.sort_by_key(|neighbor| neighbor.id);
        found
    }

    fn insert(&self, id: AgentId, position: Position) {
        self.positions.insert(id, position);
    }

    fn move_to(&self, id: AgentId, position: Position) {
        self.positions.insert(id, position);
    }

    fn remove(&self, id: AgentId) {
        self.positions.remove(&id);
    }
}
