//! Minimal host for running navigation agents.
//!
//! Real deployments embed agents in their own simulation engine. The
//! [`Simulation`] here is the small sequential scheduler used by the CLI and
//! the integration tests: it owns the spatial index, keeps the registry of
//! live agents and steps each of them once per tick.

pub mod simulation;

pub use simulation::{Simulation, SimulationSummary, StepSummary};
