//! Grid navigation with tabular Q-learning
//!
//! This crate provides:
//! - Perception of the cells around an agent and a canonical text encoding
//!   of what it has seen
//! - A shared, thread-safe Q-table with a line-oriented persistence format
//! - Navigation agents that learn to leave a grid through its exit
//! - Ports for the host engine (grid, spatial index, table storage, events)
//!   with in-process adapters
//! - A small sequential simulation runner and the `gridnav` CLI

pub mod adapters;
pub mod app;
pub mod cli;
pub mod error;
pub mod identifiers;
pub mod navigation;
pub mod perception;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod types;

pub use app::{AgentConfig, App, AppBuilder};
pub use error::{Error, Result};
pub use identifiers::{AgentId, StateActionKey, StateKey};
pub use navigation::{LearningMode, NavigationAgent, TickOutcome};
pub use perception::PerceivedState;
pub use q_learning::{QTable, RewardModel};
pub use types::{Direction, Position};
