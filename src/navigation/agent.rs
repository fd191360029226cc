//! The per-tick perceive, learn and move cycle.

use std::{fmt, sync::Arc};

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};
use tracing::{debug, info, warn};

use crate::{
    Result,
    adapters::TextFileRepository,
    app::AgentConfig,
    error::Error,
    identifiers::AgentId,
    navigation::{
        Environment,
        policy::{AgentStatus, LearningMode, TickOutcome, legal_actions},
    },
    perception::{self, PerceivedState},
    ports::{NoopObserver, Observer, TableRepository},
    q_learning::{LoadReport, NO_ACTION_VALUE, QTable, RewardModel},
    types::Position,
};

/// Callback run once when an agent leaves the simulation through the exit.
pub type ExitHandler = Box<dyn FnOnce(AgentId) + Send>;

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Q-learning agent that tries to leave a grid through its exit.
///
/// The agent shares its [`QTable`] with the rest of the run and talks to the
/// host only through the injected [`Environment`], [`TableRepository`],
/// [`Observer`] and exit handler.
pub struct NavigationAgent {
    id: AgentId,
    config: AgentConfig,
    mode: LearningMode,
    status: AgentStatus,
    position: Position,
    knowledge: PerceivedState,
    ticks: u64,
    table: Arc<QTable>,
    rewards: RewardModel,
    environment: Environment,
    repository: Arc<dyn TableRepository>,
    observer: Box<dyn Observer>,
    on_exit: Option<ExitHandler>,
    rng: StdRng,
}

impl NavigationAgent {
    /// Start building an agent for `config` living in `environment`.
    pub fn builder(config: AgentConfig, environment: Environment) -> NavigationAgentBuilder {
        NavigationAgentBuilder::new(config, environment)
    }

    /// Place the agent on its start cell and take a first look around.
    ///
    /// When a table path is configured and the shared table is still empty,
    /// the persisted table is loaded into it and the load report returned.
    /// Calling `init` on an agent that is already initialized does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StartOutOfBounds`] if the start cell is outside the
    /// grid, or the repository's error if an existing table cannot be read.
    pub fn init(&mut self) -> Result<Option<LoadReport>> {
        if self.status != AgentStatus::Created {
            return Ok(None);
        }

        let grid = &self.environment.grid;
        if !grid.contains(self.config.start) {
            return Err(Error::StartOutOfBounds {
                position: self.config.start,
                width: grid.width(),
                height: grid.height(),
            });
        }

        let report = match &self.config.table_path {
            Some(path) if self.table.is_empty() => {
                Some(self.repository.load_into(&self.table, path)?)
            }
            _ => None,
        };

        self.position = self.config.start;
        self.environment.peers.insert(self.id, self.position);
        self.knowledge = self.perceive();
        self.status = AgentStatus::Active;

        debug!(agent = %self.id, position = %self.position, mode = ?self.mode, "agent initialized");
        Ok(report)
    }

    /// Advance the agent by one tick.
    ///
    /// An agent standing on the exit checkpoints the table, leaves the
    /// spatial index and runs its exit handler. Otherwise it checkpoints
    /// every `checkpoint_interval` ticks, refreshes its knowledge and makes
    /// one move according to its [`LearningMode`].
    pub fn tick(&mut self) -> TickOutcome {
        if self.status != AgentStatus::Active {
            return TickOutcome::Inactive;
        }

        if self.environment.grid.is_exit(self.position) {
            return self.leave_through_exit();
        }

        self.ticks += 1;
        if self.ticks % self.config.checkpoint_interval == 0 {
            self.checkpoint();
        }

        let fresh = self.perceive();
        self.knowledge = PerceivedState::merge(&self.knowledge, fresh);

        let outcome = match self.mode {
            LearningMode::Training => {
                let actions = self.legal_actions_from(self.position);
                self.explore(&actions)
            }
            LearningMode::Exploiting => self.exploit(),
        };

        let observed = match outcome {
            TickOutcome::Moved { from, to, value } => {
                self.observer.on_move(self.id, self.ticks, from, to, value)
            }
            TickOutcome::Idle => self.observer.on_idle(self.id, self.ticks),
            TickOutcome::Inactive | TickOutcome::Exited { .. } => Ok(()),
        };
        self.report_observer_failure(observed);

        outcome
    }

    /// Take the agent out of the simulation without reaching the exit.
    ///
    /// The exit handler is not run.
    pub fn remove(&mut self) {
        if self.status == AgentStatus::Active {
            self.environment.peers.remove(self.id);
        }
        if matches!(self.status, AgentStatus::Active | AgentStatus::Created) {
            self.status = AgentStatus::Removed;
            self.on_exit = None;
        }
    }

    /// Save the table now, if this agent is allowed to.
    ///
    /// Only training agents with a table path write. Failures are logged and
    /// reported to the observer; `true` means the table was written.
    pub fn checkpoint(&mut self) -> bool {
        if self.mode != LearningMode::Training {
            return false;
        }
        let Some(path) = self.config.table_path.as_deref() else {
            return false;
        };

        let saved = match self.repository.save(&self.table, path) {
            Ok(()) => true,
            Err(error) => {
                warn!(agent = %self.id, path = %path.display(), %error, "checkpoint failed");
                false
            }
        };

        let observed = self.observer.on_checkpoint(self.id, self.ticks, saved);
        self.report_observer_failure(observed);
        saved
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Everything the agent has accumulated about the grid so far.
    pub fn knowledge(&self) -> &PerceivedState {
        &self.knowledge
    }

    pub fn mode(&self) -> LearningMode {
        self.mode
    }

    pub fn status(&self) -> AgentStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == AgentStatus::Active
    }

    /// Ticks counted so far (the exit tick is not counted).
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn max_trip_distance(&self) -> f64 {
        self.config.max_trip_distance
    }

    pub fn rewards(&self) -> &RewardModel {
        &self.rewards
    }

    /// The shared table this agent learns into.
    pub fn table(&self) -> Arc<QTable> {
        Arc::clone(&self.table)
    }

    fn perceive(&self) -> PerceivedState {
        let radius = self.config.explore_radius;
        let nearby = self.environment.agents_near(self.id, self.position, radius);
        perception::perceive(self.environment.grid.as_ref(), self.position, radius, nearby)
    }

    /// Legal moves from `from`, checked against where agents are right now.
    fn legal_actions_from(&self, from: Position) -> Vec<Position> {
        let occupied = self.environment.agents_near(self.id, from, 1);
        legal_actions(self.environment.grid.as_ref(), from, &occupied)
    }

    fn explore(&mut self, actions: &[Position]) -> TickOutcome {
        match actions.choose(&mut self.rng).copied() {
            Some(action) => self.take(action),
            None => {
                debug!(agent = %self.id, position = %self.position, "no legal move");
                TickOutcome::Idle
            }
        }
    }

    fn exploit(&mut self) -> TickOutcome {
        let actions = self.legal_actions_from(self.position);
        let best = self
            .table
            .best_action(&self.knowledge, &actions, &self.rewards);

        match best.action {
            None => {
                debug!(agent = %self.id, position = %self.position, "no legal move");
                TickOutcome::Idle
            }
            Some(_) if best.value <= NO_ACTION_VALUE => {
                debug!(agent = %self.id, value = best.value, "nothing worth following, exploring");
                self.explore(&actions)
            }
            Some(action) => self.take(action),
        }
    }

    fn take(&mut self, action: Position) -> TickOutcome {
        let next_actions = self.legal_actions_from(action);
        let value = self
            .table
            .bootstrap_update(&self.knowledge, action, &next_actions, &self.rewards);

        let from = self.position;
        self.position = action;
        self.environment.peers.move_to(self.id, action);

        debug!(agent = %self.id, %from, to = %action, value, "moved");
        TickOutcome::Moved {
            from,
            to: action,
            value,
        }
    }

    fn leave_through_exit(&mut self) -> TickOutcome {
        self.checkpoint();

        self.environment.peers.remove(self.id);
        self.status = AgentStatus::Exited;
        if let Some(handler) = self.on_exit.take() {
            handler(self.id);
        }

        info!(agent = %self.id, position = %self.position, ticks = self.ticks, "agent reached the exit");
        let observed = self.observer.on_exit(self.id, self.ticks, self.position);
        self.report_observer_failure(observed);

        TickOutcome::Exited {
            position: self.position,
        }
    }

    fn report_observer_failure(&self, result: Result<()>) {
        if let Err(error) = result {
            warn!(agent = %self.id, %error, "observer failed");
        }
    }
}

impl fmt::Debug for NavigationAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationAgent")
            .field("id", &self.id)
            .field("mode", &self.mode)
            .field("status", &self.status)
            .field("position", &self.position)
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}

/// Builder for [`NavigationAgent`].
///
/// Every collaborator except the environment has a default: a private
/// table, the default rewards, the text file repository, no observer and no
/// exit handler.
pub struct NavigationAgentBuilder {
    config: AgentConfig,
    environment: Environment,
    id: AgentId,
    table: Option<Arc<QTable>>,
    rewards: RewardModel,
    repository: Option<Arc<dyn TableRepository>>,
    observer: Option<Box<dyn Observer>>,
    on_exit: Option<ExitHandler>,
}

impl NavigationAgentBuilder {
    fn new(config: AgentConfig, environment: Environment) -> Self {
        Self {
            config,
            environment,
            id: AgentId::default(),
            table: None,
            rewards: RewardModel::default(),
            repository: None,
            observer: None,
            on_exit: None,
        }
    }

    pub fn id(mut self, id: AgentId) -> Self {
        self.id = id;
        self
    }

    /// Share `table` with other agents.
    pub fn table(mut self, table: Arc<QTable>) -> Self {
        self.table = Some(table);
        self
    }

    pub fn rewards(mut self, rewards: RewardModel) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn repository(mut self, repository: Arc<dyn TableRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Run `handler` once when the agent leaves through the exit.
    pub fn on_exit(mut self, handler: impl FnOnce(AgentId) + Send + 'static) -> Self {
        self.on_exit = Some(Box::new(handler));
        self
    }

    /// Build the agent. It still has to be placed with [`NavigationAgent::init`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the configuration does not
    /// validate.
    pub fn build(self) -> Result<NavigationAgent> {
        self.config.validate()?;

        Ok(NavigationAgent {
            id: self.id,
            mode: self.config.mode(),
            status: AgentStatus::Created,
            position: self.config.start,
            knowledge: PerceivedState::at(self.config.start),
            ticks: 0,
            table: self.table.unwrap_or_default(),
            rewards: self.rewards,
            environment: self.environment,
            repository: self
                .repository
                .unwrap_or_else(|| Arc::new(TextFileRepository::new())),
            observer: self.observer.unwrap_or_else(|| Box::new(NoopObserver)),
            on_exit: self.on_exit,
            rng: build_rng(self.config.seed),
            config: self.config,
        })
    }
}
