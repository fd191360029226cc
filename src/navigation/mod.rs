//! Navigation agents
//!
//! A [`NavigationAgent`] is stepped once per tick by its host. Each tick it
//! perceives its neighborhood, merges the observation into what it already
//! knows, updates the shared Q-table for the move it picks, and moves.
//!
//! ## Usage Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use gridnav::adapters::{GridWorld, InMemorySpatialIndex};
//! use gridnav::app::AgentConfig;
//! use gridnav::navigation::{Environment, NavigationAgent, TickOutcome};
//! use gridnav::types::Position;
//!
//! let grid = Arc::new(GridWorld::open(10, 10)?);
//! let peers = Arc::new(InMemorySpatialIndex::new());
//! let environment = Environment::new(grid, peers);
//!
//! let config = AgentConfig::new(Position::new(5, 5)).with_training(true).with_seed(7);
//! let mut agent = NavigationAgent::builder(config, environment).build()?;
//! agent.init()?;
//!
//! assert!(matches!(agent.tick(), TickOutcome::Moved { .. }));
//! # Ok::<(), gridnav::Error>(())
//! ```

pub mod agent;
pub mod environment;
pub mod policy;

pub use agent::{ExitHandler, NavigationAgent, NavigationAgentBuilder};
pub use environment::Environment;
pub use policy::{AgentStatus, LearningMode, TickOutcome, legal_actions};
