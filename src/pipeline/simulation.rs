//! Sequential tick scheduler over a set of agents.

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Result,
    adapters::{InMemorySpatialIndex, RecordingObserver},
    app::{AgentConfig, App},
    identifiers::AgentId,
    navigation::{Environment, NavigationAgent, TickOutcome},
    ports::{GridMap, SpatialIndex},
    q_learning::{LoadReport, QTable},
};

/// Outcome counts of a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSummary {
    pub moved: usize,
    pub idle: usize,
    pub exited: usize,
}

/// Totals of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub ticks: u64,
    pub moves: usize,
    pub exited: usize,
    pub remaining: usize,
    pub table_entries: usize,
}

/// A grid, its agents and the shared index they move in.
pub struct Simulation {
    agents: Vec<NavigationAgent>,
    peers: Arc<InMemorySpatialIndex>,
    deregistered: Arc<Mutex<Vec<AgentId>>>,
    table: Arc<QTable>,
    load_report: LoadReport,
    tick: u64,
    moves: usize,
    exited: usize,
}

impl Simulation {
    /// Create and place one agent per configuration.
    ///
    /// Agents are wired through `app`, so they share its table and
    /// repository. When `recorder` is given every agent reports to it.
    ///
    /// # Errors
    ///
    /// Returns the first agent construction or initialization error.
    pub fn new(
        app: &App,
        grid: Arc<dyn GridMap>,
        configs: &[AgentConfig],
        recorder: Option<&RecordingObserver>,
    ) -> Result<Self> {
        let peers = Arc::new(InMemorySpatialIndex::new());
        let index: Arc<dyn SpatialIndex> = Arc::clone(&peers) as Arc<dyn SpatialIndex>;
        let environment = Environment::new(grid, index);
        let deregistered = Arc::new(Mutex::new(Vec::new()));
        let mut load_report = LoadReport::default();
        let mut agents = Vec::with_capacity(configs.len());

        for config in configs {
            let exits = Arc::clone(&deregistered);
            let mut builder = app
                .agent_builder(config.clone(), environment.clone())
                .on_exit(move |id| {
                    exits
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(id);
                });
            if let Some(recorder) = recorder {
                builder = builder.observer(Box::new(recorder.clone()));
            }

            let mut agent = builder.build()?;
            if let Some(report) = agent.init()? {
                load_report = report;
            }
            agents.push(agent);
        }

        info!(agents = agents.len(), "simulation ready");
        Ok(Self {
            agents,
            peers,
            deregistered,
            table: app.table(),
            load_report,
            tick: 0,
            moves: 0,
            exited: 0,
        })
    }

    /// Step every live agent once, then drop the ones that left.
    pub fn step(&mut self) -> StepSummary {
        self.tick += 1;
        let mut summary = StepSummary::default();

        for agent in &mut self.agents {
            match agent.tick() {
                TickOutcome::Moved { .. } => summary.moved += 1,
                TickOutcome::Idle => summary.idle += 1,
                TickOutcome::Exited { .. } => summary.exited += 1,
                TickOutcome::Inactive => {}
            }
        }

        let left = std::mem::take(
            &mut *self
                .deregistered
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        if !left.is_empty() {
            debug!(tick = self.tick, agents = ?left, "deregistering agents");
            self.agents.retain(|agent| !left.contains(&agent.id()));
        }

        self.moves += summary.moved;
        self.exited += summary.exited;
        summary
    }

    /// Step until every agent has left or `max_ticks` ticks have passed.
    pub fn run(&mut self, max_ticks: u64) -> SimulationSummary {
        self.run_with(max_ticks, |_, _| {})
    }

    /// Like [`Simulation::run`], calling `on_step` after every tick.
    pub fn run_with(
        &mut self,
        max_ticks: u64,
        mut on_step: impl FnMut(u64, &StepSummary),
    ) -> SimulationSummary {
        while self.tick < max_ticks && !self.agents.is_empty() {
            let step = self.step();
            on_step(self.tick, &step);
        }

        let summary = self.summary();
        info!(
            ticks = summary.ticks,
            exited = summary.exited,
            remaining = summary.remaining,
            "simulation finished"
        );
        summary
    }

    /// Totals so far.
    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary {
            ticks: self.tick,
            moves: self.moves,
            exited: self.exited,
            remaining: self.agents.len(),
            table_entries: self.table.len(),
        }
    }

    /// Take every remaining agent off the grid.
    pub fn clear(&mut self) {
        for agent in &mut self.agents {
            agent.remove();
        }
        self.agents.clear();
    }

    pub fn agents(&self) -> &[NavigationAgent] {
        &self.agents
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Report of the table load done while placing the agents, if any.
    pub fn load_report(&self) -> LoadReport {
        self.load_report
    }

    pub fn index(&self) -> &InMemorySpatialIndex {
        &self.peers
    }
}
