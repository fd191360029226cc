//! Observer port - navigation event notifications.
//!
//! This port lets a host collect data about agents (trajectories, exit
//! times, checkpoint health) without coupling the agent to any output
//! format. Structured logging through `tracing` happens regardless of the
//! observer installed.

use crate::{Result, identifiers::AgentId, types::Position};

/// Observer trait for monitoring a navigation agent.
///
/// # Event Sequence
///
/// For each call to [`crate::navigation::NavigationAgent::tick`] at most one
/// of these is reported:
/// 1. `on_exit` when the agent starts the tick on the exit cell
/// 2. `on_move` when a legal move was taken
/// 3. `on_idle` when no legal move existed
///
/// `on_checkpoint` may additionally be reported before the move whenever a
/// periodic save was attempted.
///
/// Errors returned by an observer are logged and otherwise ignored; they
/// never interrupt the agent.
///
/// # Examples
///
/// ```
/// use gridnav::{identifiers::AgentId, ports::Observer, types::Position};
///
/// struct StepCounter {
///     steps: usize,
/// }
///
/// impl Observer for StepCounter {
///     fn on_move(
///         &mut self,
///         _agent: AgentId,
///         _tick: u64,
///         _from: Position,
///         _to: Position,
///         _value: f64,
///     ) -> gridnav::Result<()> {
///         self.steps += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called after the agent moved from `from` to `to`.
    ///
    /// `value` is the Q-value stored for the move by this tick's update.
    fn on_move(
        &mut self,
        _agent: AgentId,
        _tick: u64,
        _from: Position,
        _to: Position,
        _value: f64,
    ) -> Result<()> {
        Ok(())
    }

    /// Called when the agent had no legal move this tick.
    fn on_idle(&mut self, _agent: AgentId, _tick: u64) -> Result<()> {
        Ok(())
    }

    /// Called after a checkpoint save was attempted.
    fn on_checkpoint(&mut self, _agent: AgentId, _tick: u64, _saved: bool) -> Result<()> {
        Ok(())
    }

    /// Called once, when the agent reaches the exit and leaves the simulation.
    fn on_exit(&mut self, _agent: AgentId, _tick: u64, _position: Position) -> Result<()> {
        Ok(())
    }
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {}
