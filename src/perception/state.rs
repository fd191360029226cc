//! Perceived state and its accumulation across ticks.

use std::{
    collections::BTreeSet,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

use crate::{identifiers::StateKey, perception::codec, types::Position};

/// Snapshot of an agent's knowledge.
///
/// Equality and hashing consider `self_position`, `walls`, `doors` and
/// `exit` only. `nearby_agents` is volatile and only feeds reward shaping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerceivedState {
    /// The agent's cell at the latest tick.
    pub self_position: Position,
    /// Other agents seen within the exploration radius.
    pub nearby_agents: Vec<Position>,
    /// Non-routable cells discovered so far.
    pub walls: BTreeSet<Position>,
    /// Door cells discovered so far.
    pub doors: BTreeSet<Position>,
    /// The exit, once it has been seen.
    pub exit: Option<Position>,
}

impl PerceivedState {
    /// A state that knows nothing but the agent's own cell.
    pub fn at(self_position: Position) -> Self {
        Self {
            self_position,
            ..Self::default()
        }
    }

    pub fn with_walls(mut self, walls: impl IntoIterator<Item = Position>) -> Self {
        self.walls.extend(walls);
        self
    }

    pub fn with_doors(mut self, doors: impl IntoIterator<Item = Position>) -> Self {
        self.doors.extend(doors);
        self
    }

    pub fn with_exit(mut self, exit: Position) -> Self {
        self.exit = Some(exit);
        self
    }

    pub fn with_nearby_agents(mut self, agents: impl IntoIterator<Item = Position>) -> Self {
        self.nearby_agents.extend(agents);
        self
    }

    /// Canonical table key for this state.
    pub fn key(&self) -> StateKey {
        codec::encode(self)
    }

    /// Fold previously remembered knowledge into a fresh observation.
    ///
    /// Position and nearby agents come from `fresh`. Walls and doors are the
    /// union of both, and a known exit is never forgotten.
    pub fn merge(remembered: &PerceivedState, fresh: PerceivedState) -> PerceivedState {
        let PerceivedState {
            self_position,
            nearby_agents,
            mut walls,
            mut doors,
            exit,
        } = fresh;

        walls.extend(remembered.walls.iter().copied());
        doors.extend(remembered.doors.iter().copied());

        PerceivedState {
            self_position,
            nearby_agents,
            walls,
            doors,
            exit: exit.or(remembered.exit),
        }
    }

    /// The state the agent expects after moving to `destination`.
    ///
    /// Everything except the position is carried over unchanged, so cells
    /// that would only become visible after the move are not anticipated.
    pub fn with_self_position(&self, destination: Position) -> PerceivedState {
        PerceivedState {
            self_position: destination,
            ..self.clone()
        }
    }
}

impl PartialEq for PerceivedState {
    fn eq(&self, other: &Self) -> bool {
        self.self_position == other.self_position
            && self.walls == other.walls
            && self.doors == other.doors
            && self.exit == other.exit
    }
}

impl Eq for PerceivedState {}

impl Hash for PerceivedState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.self_position.hash(state);
        self.walls.hash(state);
        self.doors.hash(state);
        self.exit.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn test_merge_accumulates_geometry() {
        let remembered = PerceivedState::at(p(1, 1))
            .with_walls([p(0, 0), p(0, 1)])
            .with_doors([p(2, 0)])
            .with_exit(p(9, 9));
        let fresh = PerceivedState::at(p(2, 2))
            .with_walls([p(0, 1), p(3, 3)])
            .with_nearby_agents([p(3, 2)]);

        let merged = PerceivedState::merge(&remembered, fresh);

        assert_eq!(merged.self_position, p(2, 2));
        assert_eq!(
            merged.walls.iter().copied().collect::<Vec<_>>(),
            vec![p(0, 0), p(0, 1), p(3, 3)]
        );
        assert!(merged.doors.contains(&p(2, 0)));
        assert_eq!(merged.exit, Some(p(9, 9)));
        assert_eq!(merged.nearby_agents, vec![p(3, 2)]);
    }

    #[test]
    fn test_merge_prefers_fresh_exit() {
        let remembered = PerceivedState::at(p(1, 1)).with_exit(p(9, 9));
        let fresh = PerceivedState::at(p(1, 2)).with_exit(p(0, 9));
        assert_eq!(PerceivedState::merge(&remembered, fresh).exit, Some(p(0, 9)));
    }

    #[test]
    fn test_merge_does_not_carry_stale_agents() {
        let remembered = PerceivedState::at(p(1, 1)).with_nearby_agents([p(1, 2)]);
        let merged = PerceivedState::merge(&remembered, PerceivedState::at(p(2, 1)));
        assert!(merged.nearby_agents.is_empty());
    }

    #[test]
    fn test_equality_ignores_nearby_agents() {
        let a = PerceivedState::at(p(4, 4)).with_walls([p(4, 5)]);
        let b = a.clone().with_nearby_agents([p(5, 5)]);
        assert_eq!(a, b);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_expected_state_only_moves_agent() {
        let state = PerceivedState::at(p(1, 1))
            .with_walls([p(0, 0)])
            .with_nearby_agents([p(2, 2)]);
        let expected = state.with_self_position(p(1, 2));
        assert_eq!(expected.self_position, p(1, 2));
        assert_eq!(expected.walls, state.walls);
        assert_eq!(expected.nearby_agents, state.nearby_agents);
    }
}
