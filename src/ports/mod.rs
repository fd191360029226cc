//! Ports (trait boundaries) for the collaborators a navigation agent needs.
//!
//! The hosting simulation owns the grid, the spatial index and storage. The
//! agent only sees them through these traits; the crate's own
//! implementations live in [`crate::adapters`].

pub mod grid;
pub mod observer;
pub mod repository;
pub mod spatial;

pub use grid::GridMap;
pub use observer::{NoopObserver, Observer};
pub use repository::TableRepository;
pub use spatial::{Neighbor, SpatialIndex};
