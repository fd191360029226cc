//! Dependency injection container for navigation runs.
//!
//! The container owns the collaborators every agent of a run shares: the
//! Q-table, the reward model and the table repository. It hands out agent
//! builders with those already wired in.

use std::{
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use super::config::AgentConfig;
use crate::{
    Result,
    adapters::TextFileRepository,
    identifiers::AgentId,
    navigation::{Environment, NavigationAgent, NavigationAgentBuilder},
    ports::TableRepository,
    q_learning::{LoadReport, QTable, RewardModel},
};

/// Application with dependency injection.
///
/// # Examples
///
/// ## Production usage
///
/// ```
/// use std::sync::Arc;
///
/// use gridnav::adapters::{GridWorld, InMemorySpatialIndex};
/// use gridnav::app::{AgentConfig, App};
/// use gridnav::navigation::Environment;
/// use gridnav::types::Position;
///
/// let app = App::new();
/// let environment = Environment::new(
///     Arc::new(GridWorld::open(8, 8)?),
///     Arc::new(InMemorySpatialIndex::new()),
/// );
///
/// let config = AgentConfig::new(Position::new(1, 1)).with_seed(42);
/// let agent = app.create_agent(config, environment)?;
/// # Ok::<(), gridnav::Error>(())
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use gridnav::app::App;
/// use gridnav::adapters::InMemoryRepository;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct App {
    /// Repository for table persistence
    table_repository: Arc<dyn TableRepository>,
    /// Table shared by every agent created here
    table: Arc<QTable>,
    rewards: RewardModel,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
    next_id: AtomicU64,
}

impl App {
    /// Create a new app with production defaults.
    ///
    /// Uses:
    /// - `TextFileRepository` for table persistence
    /// - An empty table with the default discount factor
    /// - The default reward model
    /// - No default seed (non-deterministic RNG)
    pub fn new() -> Self {
        AppBuilder::new().build()
    }

    /// Create a builder for constructing app with custom dependencies.
    ///
    /// Primarily used for testing with in-memory dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    /// Get the table repository.
    pub fn table_repository(&self) -> Arc<dyn TableRepository> {
        Arc::clone(&self.table_repository)
    }

    /// Get the shared Q-table.
    pub fn table(&self) -> Arc<QTable> {
        Arc::clone(&self.table)
    }

    pub fn rewards(&self) -> &RewardModel {
        &self.rewards
    }

    /// An agent builder with the shared collaborators and a fresh id.
    ///
    /// If the config has no seed and the app has a default one, the agent
    /// is seeded with the default plus its id, so agents of one run differ
    /// but the run as a whole is reproducible.
    pub fn agent_builder(
        &self,
        mut config: AgentConfig,
        environment: Environment,
    ) -> NavigationAgentBuilder {
        let id = AgentId::new(self.next_id.fetch_add(1, Ordering::Relaxed));

        if config.seed.is_none() {
            config.seed = self
                .default_seed
                .map(|seed| seed.wrapping_add(id.value()));
        }

        NavigationAgent::builder(config, environment)
            .id(id)
            .table(self.table())
            .rewards(self.rewards)
            .repository(self.table_repository())
    }

    /// Create a navigation agent with the given configuration.
    ///
    /// The agent still has to be placed with [`NavigationAgent::init`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    pub fn create_agent(
        &self,
        config: AgentConfig,
        environment: Environment,
    ) -> Result<NavigationAgent> {
        self.agent_builder(config, environment).build()
    }

    /// Merge a persisted table into the shared table.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gridnav::app::App;
    /// use std::path::Path;
    ///
    /// let app = App::new();
    /// let report = app.load_table(Path::new("qtable.txt"))?;
    /// println!("{} entries, {} skipped", report.loaded, report.skipped);
    /// # Ok::<(), gridnav::Error>(())
    /// ```
    pub fn load_table(&self, path: &Path) -> Result<LoadReport> {
        self.table_repository.load_into(&self.table, path)
    }

    /// Persist the shared table.
    pub fn save_table(&self, path: &Path) -> Result<()> {
        self.table_repository.save(&self.table, path)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing app with custom dependencies.
///
/// # Examples
///
/// ```
/// use gridnav::app::AppBuilder;
/// use gridnav::adapters::InMemoryRepository;
///
/// let app = AppBuilder::new()
///     .with_repository(InMemoryRepository::new())
///     .with_discount_factor(0.9)
///     .build();
/// assert_eq!(app.table().discount_factor(), 0.9);
/// ```
pub struct AppBuilder {
    table_repository: Option<Arc<dyn TableRepository>>,
    table: Option<Arc<QTable>>,
    discount_factor: Option<f64>,
    rewards: RewardModel,
    default_seed: Option<u64>,
}

impl AppBuilder {
    /// Create a new app builder.
    pub fn new() -> Self {
        Self {
            table_repository: None,
            table: None,
            discount_factor: None,
            rewards: RewardModel::default(),
            default_seed: None,
        }
    }

    /// Set a custom table repository.
    pub fn with_repository<R: TableRepository + 'static>(mut self, repo: R) -> Self {
        self.table_repository = Some(Arc::new(repo));
        self
    }

    /// Share an existing table instead of starting from an empty one.
    pub fn with_table(mut self, table: Arc<QTable>) -> Self {
        self.table = Some(table);
        self
    }

    /// Discount factor of the table created by `build`.
    ///
    /// Ignored when a table is supplied with [`AppBuilder::with_table`].
    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = Some(discount_factor);
        self
    }

    pub fn with_rewards(mut self, rewards: RewardModel) -> Self {
        self.rewards = rewards;
        self
    }

    /// Set a default random seed for all agents created by this container.
    ///
    /// Useful for creating deterministic tests.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app with the configured dependencies.
    ///
    /// If no repository was specified, uses `TextFileRepository` by default.
    pub fn build(self) -> App {
        let discount_factor = self.discount_factor;
        App {
            table_repository: self
                .table_repository
                .unwrap_or_else(|| Arc::new(TextFileRepository::new())),
            table: self.table.unwrap_or_else(|| {
                Arc::new(discount_factor.map_or_else(QTable::default, QTable::new))
            }),
            rewards: self.rewards,
            default_seed: self.default_seed,
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
