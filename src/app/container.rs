//! Dependency injection container.
//!
//! The container owns infrastructure dependencies (the table repository) and
//! provides factory methods that wire them into agents.

use std::{path::Path, sync::Arc};

use super::config::AgentConfig;
use crate::{
    Result,
    adapters::MsgPackRepository,
    ports::TableRepository,
    q_learning::{QLearningAgent, TableStorage},
};

/// Application with dependency injection.
///
/// # Examples
///
/// ## Production usage
///
/// ```no_run
/// use tictactoe_rl::app::{App, AgentConfig};
/// use std::path::Path;
///
/// let app = App::new();
/// let agent = app.open_agent(AgentConfig::default(), Path::new("qtable.msgpack"))?;
/// # Ok::<(), tictactoe_rl::Error>(())
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use tictactoe_rl::app::App;
/// use tictactoe_rl::adapters::InMemoryRepository;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct App {
    /// Repository for value-table persistence
    table_repository: Arc<dyn TableRepository + Send + Sync>,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create a new app with production defaults.
    ///
    /// Uses `MsgPackRepository` and no default seed.
    pub fn new() -> Self {
        Self {
            table_repository: Arc::new(MsgPackRepository::new()),
            default_seed: None,
        }
    }

    /// Create a builder for constructing an app with custom dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    /// Get the table repository.
    pub fn table_repository(&self) -> Arc<dyn TableRepository + Send + Sync> {
        Arc::clone(&self.table_repository)
    }

    /// Create an agent with an empty table and no storage.
    ///
    /// The config's seed wins over the container default.
    pub fn create_agent(&self, config: AgentConfig) -> Result<QLearningAgent> {
        let agent = QLearningAgent::new(config.clone())?;
        match config.seed.or(self.default_seed) {
            Some(seed) => Ok(agent.with_seed(seed)),
            None => Ok(agent),
        }
    }

    /// Create an agent bound to `path` and load whatever table is stored
    /// there (an empty one if nothing usable is found).
    pub fn open_agent(&self, config: AgentConfig, path: &Path) -> Result<QLearningAgent> {
        let storage = TableStorage::new(self.table_repository(), path);
        let mut agent = self.create_agent(config)?.with_storage(storage);
        agent.load();
        Ok(agent)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing an app with custom dependencies.
///
/// # Examples
///
/// ```
/// use tictactoe_rl::app::AppBuilder;
/// use tictactoe_rl::adapters::InMemoryRepository;
///
/// let app = AppBuilder::new()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
#[derive(Default)]
pub struct AppBuilder {
    table_repository: Option<Arc<dyn TableRepository + Send + Sync>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    /// Create a new app builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom table repository.
    pub fn with_repository<R: TableRepository + Send + Sync + 'static>(mut self, repo: R) -> Self {
        self.table_repository = Some(Arc::new(repo));
        self
    }

    /// Set a default random seed for all agents created by this container.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app. Falls back to `MsgPackRepository` if no repository
    /// was given.
    pub fn build(self) -> App {
        App {
            table_repository: self
                .table_repository
                .unwrap_or_else(|| Arc::new(MsgPackRepository::new())),
            default_seed: self.default_seed,
        }
    }
}
