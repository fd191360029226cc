//! Host collaborators injected into an agent.

use std::sync::Arc;

use crate::{
    identifiers::AgentId,
    ports::{GridMap, SpatialIndex},
    types::Position,
};

/// The grid and agent populations an agent lives in.
///
/// `peers` is the agent's own population: the agent registers, moves and
/// removes itself there. `others` is an optional second population that is
/// only queried, so its agents count as obstacles and potential collisions.
#[derive(Clone)]
pub struct Environment {
    pub grid: Arc<dyn GridMap>,
    pub peers: Arc<dyn SpatialIndex>,
    pub others: Option<Arc<dyn SpatialIndex>>,
}

impl Environment {
    pub fn new(grid: Arc<dyn GridMap>, peers: Arc<dyn SpatialIndex>) -> Self {
        Self {
            grid,
            peers,
            others: None,
        }
    }

    pub fn with_others(mut self, others: Arc<dyn SpatialIndex>) -> Self {
        self.others = Some(others);
        self
    }

    /// Positions of agents other than `me` within `radius` of `center`.
    pub fn agents_near(&self, me: AgentId, center: Position, radius: u32) -> Vec<Position> {
        let peers = self
            .peers
            .explore(center, radius)
            .into_iter()
            .filter(|neighbor| neighbor.id != me)
            .map(|neighbor| neighbor.position);
        let others = self
            .others
            .iter()
            .flat_map(|index| index.explore(center, radius))
            .map(|neighbor| neighbor.position);

        peers.chain(others).collect()
    }
}
