//! Configuration types for agent creation.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{Result, error::Error, navigation::LearningMode, types::Position};

/// Checkpoint the shared table every this many ticks by default.
pub const DEFAULT_CHECKPOINT_INTERVAL: u64 = 100;

/// Configuration for creating a navigation agent.
///
/// # Examples
///
/// ```
/// use gridnav::app::AgentConfig;
/// use gridnav::types::Position;
///
/// let config = AgentConfig::new(Position::new(5, 5))
///     .with_explore_radius(2)
///     .with_training(true)
///     .with_table_path("qtable.txt")
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Cell the agent is placed on by `init`
    pub start: Position,
    /// Chebyshev radius scanned for walls, doors, the exit and other agents
    pub explore_radius: u32,
    /// Longest trip the agent is declared to make; not used by learning
    pub max_trip_distance: f64,
    /// Explore randomly and persist the table (`true`) or follow it (`false`)
    pub train: bool,
    /// Where the shared table is loaded from and checkpointed to
    pub table_path: Option<PathBuf>,
    /// Ticks between checkpoints
    pub checkpoint_interval: u64,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl AgentConfig {
    /// Create a configuration starting at `start`.
    ///
    /// Uses default values for other parameters:
    /// - Explore radius: 1
    /// - Mode: exploitation
    /// - No table path (nothing is loaded or saved)
    /// - Checkpoint interval: 100 ticks
    /// - Seed: None (non-deterministic)
    pub fn new(start: Position) -> Self {
        Self {
            start,
            explore_radius: 1,
            max_trip_distance: 0.0,
            train: false,
            table_path: None,
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
            seed: None,
        }
    }

    pub fn with_explore_radius(mut self, radius: u32) -> Self {
        self.explore_radius = radius;
        self
    }

    pub fn with_max_trip_distance(mut self, distance: f64) -> Self {
        self.max_trip_distance = distance;
        self
    }

    pub fn with_training(mut self, train: bool) -> Self {
        self.train = train;
        self
    }

    pub fn with_table_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.table_path = Some(path.into());
        self
    }

    pub fn with_checkpoint_interval(mut self, ticks: u64) -> Self {
        self.checkpoint_interval = ticks;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn mode(&self) -> LearningMode {
        LearningMode::from_train_flag(self.train)
    }

    /// Check the configuration for values an agent cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for a zero explore radius, a
    /// zero checkpoint interval or a negative or non-finite trip distance.
    pub fn validate(&self) -> Result<()> {
        if self.explore_radius == 0 {
            return Err(Error::InvalidConfiguration {
                message: "explore_radius must be at least 1".to_string(),
            });
        }
        if self.checkpoint_interval == 0 {
            return Err(Error::InvalidConfiguration {
                message: "checkpoint_interval must be at least 1".to_string(),
            });
        }
        if !self.max_trip_distance.is_finite() || self.max_trip_distance < 0.0 {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "max_trip_distance must be finite and non-negative, got {}",
                    self.max_trip_distance
                ),
            });
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new(Position::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AgentConfig::new(Position::new(2, 3));
        assert_eq!(config.explore_radius, 1);
        assert_eq!(config.checkpoint_interval, 100);
        assert_eq!(config.mode(), LearningMode::Exploiting);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = AgentConfig::new(Position::new(0, 0));
        assert!(base.clone().with_explore_radius(0).validate().is_err());
        assert!(base.clone().with_checkpoint_interval(0).validate().is_err());
        assert!(base.with_max_trip_distance(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_deserialize_partial_json() {
        let config: AgentConfig =
            serde_json::from_str(r#"{"start": {"x": 4, "y": 1}, "train": true}"#).unwrap();
        assert_eq!(config.start, Position::new(4, 1));
        assert_eq!(config.mode(), LearningMode::Training);
        assert_eq!(config.checkpoint_interval, DEFAULT_CHECKPOINT_INTERVAL);
    }
}
