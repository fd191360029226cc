//! Learning modes, tick outcomes and move legality.

use serde::{Deserialize, Serialize};

use crate::{
    ports::GridMap,
    types::{Direction, Position},
};

/// How an agent picks its moves. Fixed for the agent's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningMode {
    /// Uniform random legal moves, with table updates and checkpoints.
    Training,
    /// Greedy moves from the table, exploring only when nothing is known.
    Exploiting,
}

impl LearningMode {
    pub fn from_train_flag(train: bool) -> Self {
        if train {
            LearningMode::Training
        } else {
            LearningMode::Exploiting
        }
    }
}

/// Lifecycle of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    /// Built but not yet placed on the grid.
    Created,
    Active,
    /// Reached the exit and left the simulation.
    Exited,
    /// Taken out by the host before reaching the exit.
    Removed,
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// The agent is not active; nothing was done.
    Inactive,
    /// The agent stood on the exit and left the simulation.
    Exited { position: Position },
    /// No legal move was available.
    Idle,
    /// The agent moved; `value` is the Q-value stored for the move.
    Moved {
        from: Position,
        to: Position,
        value: f64,
    },
}

/// Legal destinations from `from`, in compass order.
///
/// A destination is legal when it is inside the grid, routable, and not one
/// of the `occupied` cells.
pub fn legal_actions(grid: &dyn GridMap, from: Position, occupied: &[Position]) -> Vec<Position> {
    Direction::neighbors(from)
        .filter(|&cell| grid.contains(cell) && grid.is_routable(cell) && !occupied.contains(&cell))
        .collect()
}
