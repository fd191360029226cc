//! Adapters implementing the navigation ports.
//!
//! These are the crate's own implementations of the traits in
//! [`crate::ports`]. A host engine can supply its own instead.

pub mod grid_world;
pub mod in_memory_repository;
pub mod recording_observer;
pub mod spatial_index;
pub mod text_file_repository;

pub use grid_world::{Cell, GridWorld};
pub use in_memory_repository::InMemoryRepository;
pub use recording_observer::{NavigationEvent, RecordingObserver};
pub use spatial_index::InMemorySpatialIndex;
pub use text_file_repository::TextFileRepository;
