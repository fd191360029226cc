//! Reward shaping for grid navigation.

use serde::{Deserialize, Serialize};

use crate::{perception::PerceivedState, types::Position};

/// The event a candidate move corresponds to, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardEvent {
    ReachedExit,
    NextToWall,
    Collision,
    FoundDoor,
    InRoom,
}

/// Immediate reward for each [`RewardEvent`].
///
/// Every move except reaching the exit is penalized, which favours short
/// routes. Collisions cost more than plain walking, and doors cost less.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardModel {
    pub exit: f64,
    pub in_room: f64,
    pub next_to_wall: f64,
    pub collision: f64,
    pub find_door: f64,
}

impl RewardModel {
    pub const EXIT: f64 = 100.0;
    pub const IN_ROOM: f64 = -5.0;
    pub const NEXT_TO_WALL: f64 = -2.0;
    pub const COLLISION: f64 = -10.0;
    pub const FIND_DOOR: f64 = -1.0;

    /// Classify moving to `action` given what `state` knows.
    ///
    /// The first matching rule wins: exit, wall, nearby agent, door, room.
    pub fn classify(state: &PerceivedState, action: Position) -> RewardEvent {
        if state.exit == Some(action) {
            RewardEvent::ReachedExit
        } else if state.walls.contains(&action) {
            RewardEvent::NextToWall
        } else if state.nearby_agents.contains(&action) {
            RewardEvent::Collision
        } else if state.doors.contains(&action) {
            RewardEvent::FoundDoor
        } else {
            RewardEvent::InRoom
        }
    }

    pub fn value(&self, event: RewardEvent) -> f64 {
        match event {
            RewardEvent::ReachedExit => self.exit,
            RewardEvent::NextToWall => self.next_to_wall,
            RewardEvent::Collision => self.collision,
            RewardEvent::FoundDoor => self.find_door,
            RewardEvent::InRoom => self.in_room,
        }
    }

    /// Immediate reward for moving to `action` from `state`.
    pub fn reward_for(&self, state: &PerceivedState, action: Position) -> f64 {
        self.value(Self::classify(state, action))
    }
}

impl Default for RewardModel {
    fn default() -> Self {
        Self {
            exit: Self::EXIT,
            in_room: Self::IN_ROOM,
            next_to_wall: Self::NEXT_TO_WALL,
            collision: Self::COLLISION,
            find_door: Self::FIND_DOOR,
        }
    }
}
