//! Property tests for the state encoding.

use std::collections::BTreeSet;

use gridnav::{
    perception::{PerceivedState, decode, encode},
    types::Position,
};
use proptest::prelude::*;

fn position() -> impl Strategy<Value = Position> {
    (-50i32..50, -50i32..50).prop_map(|(x, y)| Position::new(x, y))
}

prop_compose! {
    fn perceived_state()(
        self_position in position(),
        nearby in prop::collection::vec(position(), 0..4),
        walls in prop::collection::btree_set(position(), 0..12),
        doors in prop::collection::btree_set(position(), 0..4),
        exit in prop::option::of(position()),
    ) -> PerceivedState {
        let mut state = PerceivedState::at(self_position)
            .with_nearby_agents(nearby)
            .with_walls(walls)
            .with_doors(doors);
        state.exit = exit;
        state
    }
}

proptest! {
    #[test]
    fn decode_inverts_encode(state in perceived_state()) {
        let decoded = decode(encode(&state).as_str()).unwrap();

        prop_assert_eq!(decoded.self_position, state.self_position);
        prop_assert_eq!(&decoded.walls, &state.walls);
        prop_assert_eq!(&decoded.doors, &state.doors);
        prop_assert_eq!(decoded.exit, state.exit);
        prop_assert!(decoded.nearby_agents.is_empty());
        prop_assert_eq!(decoded, state);
    }

    #[test]
    fn encoding_ignores_nearby_agents(
        state in perceived_state(),
        others in prop::collection::vec(position(), 1..4),
    ) {
        let crowded = state.clone().with_nearby_agents(others);
        prop_assert_eq!(encode(&crowded), encode(&state));
    }

    #[test]
    fn insertion_order_does_not_change_the_key(
        self_position in position(),
        walls in prop::collection::vec(position(), 0..12),
    ) {
        let forward = PerceivedState::at(self_position).with_walls(walls.iter().copied());
        let backward = PerceivedState::at(self_position).with_walls(walls.iter().rev().copied());
        prop_assert_eq!(forward.key(), backward.key());
    }

    #[test]
    fn merged_knowledge_only_grows(
        old in perceived_state(),
        fresh in perceived_state(),
    ) {
        let merged = PerceivedState::merge(&old, fresh.clone());

        prop_assert!(merged.walls.is_superset(&old.walls));
        prop_assert!(merged.walls.is_superset(&fresh.walls));
        prop_assert!(merged.doors.is_superset(&old.doors));
        prop_assert_eq!(merged.self_position, fresh.self_position);
        prop_assert_eq!(merged.exit, fresh.exit.or(old.exit));
    }
}

#[test]
fn decoded_lists_are_sets() {
    let decoded = decode(
        "SelfPosition: (0, 0)~ NearbyAgents: []~ Walls: [(2, 2); (1, 1); (2, 2)]~ Doors: []~ Exit: ",
    )
    .unwrap();

    let expected: BTreeSet<_> = [Position::new(1, 1), Position::new(2, 2)].into();
    assert_eq!(decoded.walls, expected);
    assert_eq!(decoded.exit, None);
}
