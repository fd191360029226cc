//! CLI infrastructure for the grid navigation toolkit
//!
//! This module provides the command-line interface for running agents on a
//! map and inspecting the Q-tables they persist.

pub mod commands;
pub mod config;
pub mod output;
