//! Dependency injection container for the arena application.
//!
//! The container owns infrastructure dependencies (brain storage, loaded
//! configuration) and provides factory methods for engines, match sessions
//! and training pipelines.

use std::{path::Path, sync::Arc};

use super::config::ArenaConfig;
use crate::{
    Result,
    adapters::JsonRepository,
    arena::{ActionRegistry, MatchSession},
    pipeline::{TrainingConfig, TrainingPipeline},
    ports::QTableRepository,
    q_learning::{DecisionEngine, EngineConfig, QTable},
};

/// Application with dependency injection.
///
/// # Examples
///
/// ## Production usage
///
/// ```no_run
/// use gladiator::app::App;
/// use std::path::Path;
///
/// let app = App::new();
/// let engine = app.load_engine(Path::new("brain.json"));
/// let session = app.create_session();
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use gladiator::app::App;
/// use gladiator::adapters::InMemoryRepository;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct App {
    /// Storage for learned tables
    repository: Arc<dyn QTableRepository>,
    config: ArenaConfig,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create a new app with production defaults.
    ///
    /// Uses:
    /// - `JsonRepository` for brain files
    /// - The default [`ArenaConfig`]
    /// - No default seed (non-deterministic RNG)
    pub fn new() -> Self {
        Self {
            repository: Arc::new(JsonRepository::new()),
            config: ArenaConfig::default(),
            default_seed: None,
        }
    }

    /// Create a builder for constructing app with custom dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    /// Get the brain repository.
    pub fn repository(&self) -> Arc<dyn QTableRepository> {
        Arc::clone(&self.repository)
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Number of actions in the standard catalogue.
    pub fn action_count(&self) -> usize {
        ActionRegistry::standard().count()
    }

    fn engine_config(&self) -> EngineConfig {
        let mut engine = self.config.engine.clone();
        if engine.seed.is_none() {
            engine.seed = self.default_seed;
        }
        engine
    }

    /// Create an engine with an empty table and no persistence.
    pub fn create_engine(&self) -> DecisionEngine {
        DecisionEngine::new(self.action_count(), self.engine_config())
    }

    /// Create an engine backed by the brain at `path`.
    ///
    /// Never fails: an absent or unusable brain is replaced by a fresh one.
    pub fn load_engine(&self, path: &Path) -> DecisionEngine {
        DecisionEngine::load_or_create(
            self.action_count(),
            self.engine_config(),
            self.repository(),
            path,
        )
    }

    /// Strictly load the table stored at `path`, for inspection.
    ///
    /// # Errors
    ///
    /// Unlike [`load_engine`](Self::load_engine), any read, decode or
    /// structural problem is returned to the caller.
    pub fn load_table(&self, path: &Path) -> Result<QTable> {
        self.repository.load(path)?.into_table(self.action_count())
    }

    /// Start a match with the configured rules.
    pub fn create_session(&self) -> MatchSession {
        let session = MatchSession::standard(self.config.rules.clone());
        match self.default_seed {
            Some(seed) => session.with_seed(seed),
            None => session,
        }
    }

    /// Build a self-play pipeline with the configured rules.
    pub fn create_pipeline(&self, mut training: TrainingConfig) -> TrainingPipeline {
        if training.seed.is_none() {
            training.seed = self.default_seed;
        }
        TrainingPipeline::new(training, self.config.rules.clone())
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
/// use gladiator::app::{AppBuilder, ArenaConfig};
/// use gladiator::adapters::InMemoryRepository;
///
/// let app = AppBuilder::new()
///     .with_repository(InMemoryRepository::new())
///     .with_config(ArenaConfig::default().without_exploration())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct AppBuilder {
    repository: Option<Arc<dyn QTableRepository>>,
    config: ArenaConfig,
    default_seed: Option<u64>,
}

impl AppBuilder {
    /// Create a new app builder.
    pub fn new() -> Self {
        Self {
            repository: None,
            config: ArenaConfig::default(),
            default_seed: None,
        }
    }

    /// Set a custom brain repository.
    pub fn with_repository<R: QTableRepository + 'static>(mut self, repo: R) -> Self {
        self.repository = Some(Arc::new(repo));
        self
    }

    pub fn with_config(mut self, config: ArenaConfig) -> Self {
        self.config = config;
        self
    }

    /// Set a default random seed for everything created by this container.
    ///
    /// A seed in the engine config takes precedence.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app with the configured dependencies.
    ///
    /// If no repository was specified, uses `JsonRepository` by default.
    pub fn build(self) -> App {
        App {
            repository: self
                .repository
                .unwrap_or_else(|| Arc::new(JsonRepository::new())),
            config: self.config,
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
