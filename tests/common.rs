//! Common test utilities for the gridnav test suite.
//!
//! This module builds small worlds and agents wired the way a host would
//! wire them.

#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use gridnav::{
    adapters::{GridWorld, InMemorySpatialIndex},
    app::AgentConfig,
    identifiers::AgentId,
    navigation::Environment,
    ports::SpatialIndex,
    types::Position,
};

pub fn p(x: i32, y: i32) -> Position {
    Position::new(x, y)
}

/// A grid plus the spatial index of the agents living on it.
pub struct World {
    pub grid: Arc<GridWorld>,
    pub peers: Arc<InMemorySpatialIndex>,
}

impl World {
    pub fn new(grid: GridWorld) -> Self {
        Self {
            grid: Arc::new(grid),
            peers: Arc::new(InMemorySpatialIndex::new()),
        }
    }

    pub fn open(width: i32, height: i32) -> Self {
        Self::new(GridWorld::open(width, height).unwrap())
    }

    /// Parse an ASCII map (bottom row is `y == 0`).
    pub fn parse(map: &str) -> Self {
        Self::new(GridWorld::parse(map).unwrap())
    }

    pub fn environment(&self) -> Environment {
        let peers: Arc<dyn SpatialIndex> = self.peers.clone();
        Environment::new(self.grid.clone(), peers)
    }
}

pub fn training(start: Position) -> AgentConfig {
    AgentConfig::new(start).with_training(true).with_seed(7)
}

pub fn exploiting(start: Position) -> AgentConfig {
    AgentConfig::new(start).with_seed(7)
}

/// An exit handler together with the number of times it ran.
pub fn counting_exit_handler() -> (Arc<AtomicUsize>, impl FnOnce(AgentId) + Send + 'static) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    (calls, move |_id: AgentId| {
        counter.fetch_add(1, Ordering::SeqCst);
    })
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
