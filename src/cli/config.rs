//! Run configuration for the `gridnav` CLI

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    app::{AgentConfig, DEFAULT_CHECKPOINT_INTERVAL},
    types::Position,
};

/// Settings for a `gridnav run`, usually read from a JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// ASCII map to navigate
    pub map: Option<PathBuf>,

    /// Q-table file, loaded on start and written by training agents
    pub table: Option<PathBuf>,

    /// Number of episodes; every episode places the agents again
    pub episodes: u64,

    /// Tick limit per episode
    pub max_ticks: u64,

    /// Learn while moving instead of exploiting the table
    pub train: bool,

    /// Chebyshev radius of each scan
    pub explore_radius: u32,

    pub max_trip_distance: f64,

    /// Ticks between table checkpoints
    pub checkpoint_interval: u64,

    /// Random seed for reproducibility
    pub seed: Option<u64>,

    /// Extra start cells besides the `S` cells of the map
    pub starts: Vec<Position>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            map: None,
            table: None,
            episodes: 1,
            max_ticks: 1_000,
            train: false,
            explore_radius: 1,
            max_trip_distance: 0.0,
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
            seed: None,
            starts: Vec::new(),
        }
    }
}

impl RunConfig {
    /// Read a configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read run config {}", path.display()),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Agent settings for an agent starting at `start`.
    ///
    /// The run seed is left out so every agent gets its own seed from the
    /// app.
    pub fn agent_config(&self, start: Position) -> AgentConfig {
        let mut config = AgentConfig::new(start)
            .with_explore_radius(self.explore_radius)
            .with_max_trip_distance(self.max_trip_distance)
            .with_training(self.train)
            .with_checkpoint_interval(self.checkpoint_interval);
        if let Some(table) = &self.table {
            config = config.with_table_path(table.clone());
        }
        config
    }
}
