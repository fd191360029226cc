//! Application layer with dependency injection container.
//!
//! The [`App`] owns the collaborators shared by every agent of a run (the
//! Q-table, the reward model and the table repository) and wires them into
//! new agents. Hosts supply the per-agent [`AgentConfig`] and the
//! [`crate::navigation::Environment`].
//!
//! # Usage
//!
//! ## Production
//!
//! ```
//! use gridnav::app::App;
//!
//! let app = App::new();
//! assert!(app.table().is_empty());
//! ```
//!
//! ## Testing
//!
//! ```
//! use gridnav::app::App;
//! use gridnav::adapters::InMemoryRepository;
//!
//! let app = App::for_testing()
//!     .with_repository(InMemoryRepository::new())
//!     .with_default_seed(42)
//!     .build();
//! ```

pub mod config;
pub mod container;

pub use config::{AgentConfig, DEFAULT_CHECKPOINT_INTERVAL};
pub use container::{App, AppBuilder};
