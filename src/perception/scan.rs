//! Local scan of the grid around an agent.

use crate::{perception::PerceivedState, ports::GridMap, types::Position};

/// Build a fresh observation of the cells within `radius` of `position`.
///
/// The scan covers the Chebyshev square around the agent, clipped to the
/// grid. A cell is classified as a door first, then as the exit, and
/// otherwise as a wall when it is not routable. `nearby_agents` are the
/// positions of other agents the caller found within the same radius.
pub fn perceive(
    grid: &dyn GridMap,
    position: Position,
    radius: u32,
    nearby_agents: Vec<Position>,
) -> PerceivedState {
    let mut state = PerceivedState {
        self_position: position,
        nearby_agents,
        ..PerceivedState::default()
    };

    let radius = i32::try_from(radius).unwrap_or(i32::MAX);
    let x_range = position.x.saturating_sub(radius).max(0)
        ..=position.x.saturating_add(radius).min(grid.width() - 1);
    let y_range = position.y.saturating_sub(radius).max(0)
        ..=position.y.saturating_add(radius).min(grid.height() - 1);

    for x in x_range {
        for y in y_range.clone() {
            let cell = Position::new(x, y);
            if grid.is_door(cell) {
                state.doors.insert(cell);
            } else if grid.is_exit(cell) {
                state.exit = Some(cell);
            } else if !grid.is_routable(cell) {
                state.walls.insert(cell);
            }
        }
    }

    state
}
