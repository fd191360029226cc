//! End-to-end behavior of single agents on small grids.

use std::{
    path::Path,
    sync::{Arc, atomic::Ordering},
};

use gridnav::{
    Error,
    adapters::{Cell, GridWorld, InMemoryRepository, NavigationEvent, RecordingObserver},
    navigation::{AgentStatus, NavigationAgent, TickOutcome},
    perception::PerceivedState,
    ports::TableRepository,
    q_learning::{LoadReport, QTable, RewardModel},
};

mod common;

use common::{World, approx_eq, counting_exit_handler, exploiting, p, training};

#[test]
fn test_training_tick_records_one_entry_for_the_current_state() {
    let world = World::open(10, 10);
    let table = Arc::new(QTable::default());
    let mut agent = NavigationAgent::builder(training(p(5, 5)), world.environment())
        .table(Arc::clone(&table))
        .build()
        .unwrap();
    agent.init().unwrap();

    let outcome = agent.tick();
    let TickOutcome::Moved { from, to, value } = outcome else {
        panic!("expected a move, got {outcome:?}");
    };

    assert_eq!(from, p(5, 5));
    assert_eq!(to.chebyshev(p(5, 5)), 1);
    assert_eq!(agent.position(), to);
    assert_eq!(world.peers.position_of(agent.id()), Some(to));

    // Room penalty plus the discounted room penalty of the cell moved to.
    assert!(approx_eq(value, -5.0 + 0.8 * -5.0));

    let start_key = PerceivedState::at(p(5, 5)).key();
    let under_start: Vec<_> = table
        .snapshot()
        .into_iter()
        .filter(|(key, _)| key.state == start_key)
        .collect();
    assert_eq!(under_start.len(), 1);
    assert_eq!(under_start[0].0.action, to);
    assert!(approx_eq(under_start[0].1, value));
}

#[test]
fn test_exploiting_agent_steps_onto_adjacent_exit_and_leaves() {
    let grid = GridWorld::open(3, 3).unwrap().with_cell(p(2, 1), Cell::Exit);
    let world = World::new(grid);
    let (calls, handler) = counting_exit_handler();
    let mut agent = NavigationAgent::builder(exploiting(p(1, 1)), world.environment())
        .on_exit(handler)
        .build()
        .unwrap();
    agent.init().unwrap();
    assert_eq!(agent.knowledge().exit, Some(p(2, 1)));

    match agent.tick() {
        TickOutcome::Moved { to, value, .. } => {
            assert_eq!(to, p(2, 1));
            assert!(approx_eq(value, RewardModel::EXIT + 0.8 * RewardModel::IN_ROOM));
        }
        other => panic!("expected a move onto the exit, got {other:?}"),
    }
    assert_eq!(agent.position(), p(2, 1));

    assert_eq!(
        agent.tick(),
        TickOutcome::Exited {
            position: p(2, 1)
        }
    );
    assert_eq!(agent.status(), AgentStatus::Exited);
    assert!(world.peers.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert_eq!(agent.tick(), TickOutcome::Inactive);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_training_agent_persists_table_when_leaving() {
    let grid = GridWorld::parse("..E").unwrap();
    let world = World::new(grid);
    let repo = InMemoryRepository::new();
    let path = Path::new("exit-table");
    let mut agent = NavigationAgent::builder(
        training(p(2, 0)).with_table_path(path),
        world.environment(),
    )
    .repository(Arc::new(repo.clone()))
    .build()
    .unwrap();
    agent.init().unwrap();

    assert!(matches!(agent.tick(), TickOutcome::Exited { .. }));
    assert!(repo.contains(path));
}

#[test]
fn test_greedy_agent_walks_down_a_corridor_to_the_exit() {
    let world = World::parse(
        "#######\n\
         #S...E#\n\
         #######",
    );
    let start = world.grid.starts()[0];
    let recorder = RecordingObserver::new();
    let mut agent = NavigationAgent::builder(exploiting(start), world.environment())
        .observer(Box::new(recorder.clone()))
        .build()
        .unwrap();
    agent.init().unwrap();

    for _ in 0..5 {
        agent.tick();
    }

    assert_eq!(agent.status(), AgentStatus::Exited);
    assert_eq!(recorder.move_count(), 4);
    assert_eq!(recorder.exits(), vec![(agent.id(), 4)]);
    assert!(agent.knowledge().walls.contains(&p(0, 1)));
}

#[test]
fn test_checkpoint_every_hundred_ticks() {
    let world = World::open(6, 6);
    let repo = InMemoryRepository::new();
    let recorder = RecordingObserver::new();
    let path = Path::new("checkpoint");
    let mut agent =
        NavigationAgent::builder(training(p(3, 3)).with_table_path(path), world.environment())
            .repository(Arc::new(repo.clone()))
            .observer(Box::new(recorder.clone()))
            .build()
            .unwrap();
    agent.init().unwrap();

    for _ in 0..99 {
        agent.tick();
    }
    assert!(!repo.contains(path));

    agent.tick();
    assert!(repo.contains(path));
    assert!(recorder.events().contains(&NavigationEvent::Checkpoint {
        agent: agent.id(),
        tick: 100,
        saved: true,
    }));

    let saved = repo.contents(path).unwrap();
    assert!(saved.lines().count() > 0);
}

/// Repository whose disk is always full.
struct FullDisk;

impl TableRepository for FullDisk {
    fn save(&self, _table: &QTable, path: &Path) -> gridnav::Result<()> {
        Err(Error::Io {
            operation: format!("write table to {path:?}"),
            source: std::io::Error::other("no space left on device"),
        })
    }

    fn load_into(&self, _table: &QTable, _path: &Path) -> gridnav::Result<LoadReport> {
        Ok(LoadReport::default())
    }
}

#[test]
fn test_failed_checkpoint_does_not_interrupt_the_tick() {
    let world = World::open(6, 6);
    let recorder = RecordingObserver::new();
    let mut agent = NavigationAgent::builder(
        training(p(3, 3))
            .with_table_path("full-disk")
            .with_checkpoint_interval(1),
        world.environment(),
    )
    .repository(Arc::new(FullDisk))
    .observer(Box::new(recorder.clone()))
    .build()
    .unwrap();
    agent.init().unwrap();

    for _ in 0..3 {
        assert!(matches!(agent.tick(), TickOutcome::Moved { .. }));
    }

    let failed: Vec<_> = recorder
        .events()
        .into_iter()
        .filter(|event| matches!(event, NavigationEvent::Checkpoint { saved: false, .. }))
        .collect();
    assert_eq!(failed.len(), 3);
    assert_eq!(recorder.move_count(), 3);
    assert!(!agent.checkpoint());
    assert!(agent.is_active());
}

#[test]
fn test_exploiting_agent_never_saves() {
    let world = World::open(6, 6);
    let repo = InMemoryRepository::new();
    let path = Path::new("never");
    let mut agent = NavigationAgent::builder(
        exploiting(p(3, 3))
            .with_table_path(path)
            .with_checkpoint_interval(1),
        world.environment(),
    )
    .repository(Arc::new(repo.clone()))
    .build()
    .unwrap();
    agent.init().unwrap();

    for _ in 0..10 {
        agent.tick();
    }
    assert!(!agent.checkpoint());
    assert_eq!(repo.count(), 0);
}

#[test]
fn test_agent_without_free_neighbor_idles() {
    let world = World::open(2, 1);
    let mut blocked = NavigationAgent::builder(training(p(0, 0)), world.environment())
        .id(gridnav::AgentId::new(1))
        .build()
        .unwrap();
    let mut blocker = NavigationAgent::builder(training(p(1, 0)), world.environment())
        .id(gridnav::AgentId::new(2))
        .build()
        .unwrap();
    blocked.init().unwrap();
    blocker.init().unwrap();

    assert_eq!(blocked.tick(), TickOutcome::Idle);
    assert_eq!(blocked.position(), p(0, 0));
    assert_eq!(blocked.knowledge().nearby_agents, vec![p(1, 0)]);
}

#[test]
fn test_occupied_cells_are_never_entered() {
    let world = World::open(3, 3);
    let mut mover = NavigationAgent::builder(training(p(1, 1)), world.environment())
        .id(gridnav::AgentId::new(1))
        .build()
        .unwrap();
    mover.init().unwrap();

    // Fill every neighbor except (2, 2).
    let mut blockers = Vec::new();
    for (index, cell) in [p(0, 0), p(1, 0), p(2, 0), p(0, 1), p(2, 1), p(0, 2), p(1, 2)]
        .into_iter()
        .enumerate()
    {
        let mut blocker = NavigationAgent::builder(training(cell), world.environment())
            .id(gridnav::AgentId::new(10 + index as u64))
            .build()
            .unwrap();
        blocker.init().unwrap();
        blockers.push(blocker);
    }

    match mover.tick() {
        TickOutcome::Moved { to, .. } => assert_eq!(to, p(2, 2)),
        other => panic!("expected a move into the free cell, got {other:?}"),
    }
}

#[test]
fn test_hopeless_values_fall_back_to_exploration() {
    let world = World::open(50, 50);
    let rewards = RewardModel {
        in_room: -150.0,
        ..RewardModel::default()
    };
    let mut agent = NavigationAgent::builder(exploiting(p(25, 25)), world.environment())
        .rewards(rewards)
        .build()
        .unwrap();
    agent.init().unwrap();

    // Greedy choice on ties would always be north.
    let mut headings = Vec::new();
    for _ in 0..10 {
        if let TickOutcome::Moved { from, to, .. } = agent.tick() {
            headings.push(p(to.x - from.x, to.y - from.y));
        }
    }

    assert_eq!(headings.len(), 10);
    assert!(headings.iter().any(|heading| *heading != p(0, 1)));
}

#[test]
fn test_removed_agent_does_not_run_exit_handler() {
    let world = World::open(4, 4);
    let (calls, handler) = counting_exit_handler();
    let mut agent = NavigationAgent::builder(training(p(1, 1)), world.environment())
        .on_exit(handler)
        .build()
        .unwrap();
    agent.init().unwrap();
    assert_eq!(world.peers.len(), 1);

    agent.remove();

    assert_eq!(agent.status(), AgentStatus::Removed);
    assert!(world.peers.is_empty());
    assert_eq!(agent.tick(), TickOutcome::Inactive);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_start_outside_grid_is_rejected() {
    let world = World::open(4, 4);
    let mut agent = NavigationAgent::builder(training(p(4, 0)), world.environment())
        .build()
        .unwrap();

    assert!(matches!(
        agent.init(),
        Err(Error::StartOutOfBounds { width: 4, height: 4, .. })
    ));
    assert!(world.peers.is_empty());
}

#[test]
fn test_init_loads_persisted_table_into_empty_shared_table() {
    let world = World::open(4, 4);
    let path = Path::new("persisted");
    let repo = InMemoryRepository::new().with_contents(
        path,
        "?SelfPosition: (1, 1)~ NearbyAgents: []~ Walls: []~ Doors: []~ Exit: !(2,2)%12.5\n",
    );
    let table = Arc::new(QTable::default());
    let mut agent =
        NavigationAgent::builder(exploiting(p(1, 1)).with_table_path(path), world.environment())
            .table(Arc::clone(&table))
            .repository(Arc::new(repo))
            .build()
            .unwrap();

    let report = agent.init().unwrap().unwrap();

    assert_eq!(report.loaded, 1);
    assert_eq!(
        table.get(&PerceivedState::at(p(1, 1)).key(), p(2, 2)),
        Some(12.5)
    );

    // A second init is a no-op.
    assert!(agent.init().unwrap().is_none());
}

#[test]
fn test_exploiting_agent_follows_loaded_values() {
    let world = World::open(4, 4);
    let table = Arc::new(QTable::default());
    let mut agent = NavigationAgent::builder(exploiting(p(1, 1)), world.environment())
        .table(Arc::clone(&table))
        .build()
        .unwrap();
    agent.init().unwrap();

    // Make south-west clearly the best move from the start.
    let key = agent.knowledge().key();
    table.update(&key, p(0, 0), 50.0);

    match agent.tick() {
        TickOutcome::Moved { to, .. } => assert_eq!(to, p(0, 0)),
        other => panic!("expected the learned move, got {other:?}"),
    }
}
