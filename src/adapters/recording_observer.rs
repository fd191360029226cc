//! Observer that records navigation events for later inspection.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::{Result, identifiers::AgentId, ports::Observer, types::Position};

/// One reported navigation event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NavigationEvent {
    Moved {
        agent: AgentId,
        tick: u64,
        from: Position,
        to: Position,
        value: f64,
    },
    Idle {
        agent: AgentId,
        tick: u64,
    },
    Checkpoint {
        agent: AgentId,
        tick: u64,
        saved: bool,
    },
    Exited {
        agent: AgentId,
        tick: u64,
        position: Position,
    },
}

/// Shared event log.
///
/// Clones append to the same log, so one recorder can be handed to many
/// agents and read back by the host.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<NavigationEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<NavigationEvent> {
        self.lock().clone()
    }

    /// Agents that reached the exit, with the tick they left on.
    pub fn exits(&self) -> Vec<(AgentId, u64)> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                NavigationEvent::Exited { agent, tick, .. } => Some((*agent, *tick)),
                _ => None,
            })
            .collect()
    }

    pub fn move_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|event| matches!(event, NavigationEvent::Moved { .. }))
            .count()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<NavigationEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, event: NavigationEvent) -> Result<()> {
        self.lock().push(event);
        Ok(())
    }
}

impl Observer for RecordingObserver {
    fn on_move(
        &mut self,
        agent: AgentId,
        tick: u64,
        from: Position,
        to: Position,
        value: f64,
    ) -> Result<()> {
        self.record(NavigationEvent::Moved {
            agent,
            tick,
            from,
            to,
            value,
        })
    }

    fn on_idle(&mut self, agent: AgentId, tick: u64) -> Result<()> {
        self.record(NavigationEvent::Idle { agent, tick })
    }

    fn on_checkpoint(&mut self, agent: AgentId, tick: u64, saved: bool) -> Result<()> {
        self.record(NavigationEvent::Checkpoint { agent, tick, saved })
    }

    fn on_exit(&mut self, agent: AgentId, tick: u64, position: Position) -> Result<()> {
        self.record(NavigationEvent::Exited {
            agent,
            tick,
            position,
        })
    }
}
