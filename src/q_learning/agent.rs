//! Q-learning decision engine
//!
//! A tabular learner with a single-step update and no next-state bootstrap.
//! It writes its whole table back to storage after every reward.

use std::{
    any::Any,
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    Error, Result,
    arena::Situation,
    ports::{Learner, QTableRepository},
    q_learning::{q_table::QTable, serialization::SavedQTable},
};

/// Hyperparameters of the decision engine.
///
/// # Examples
///
/// ```
/// use gladiator::q_learning::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_learning_rate(0.25)
///     .with_seed(42)
///     .without_exploration();
/// assert_eq!(config.effective_exploration_rate(), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// α in (0, 1]
    pub learning_rate: f64,
    /// γ, persisted for compatibility; the single-step rule never reads it
    pub discount_factor: f64,
    /// Probability of a uniformly random action
    pub exploration_rate: f64,
    /// Host override; `false` forces greedy play
    pub exploration_enabled: bool,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.5,
            discount_factor: 0.9,
            exploration_rate: 0.3,
            exploration_enabled: true,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_exploration(mut self, rate: f64) -> Self {
        self.exploration_rate = rate;
        self.exploration_enabled = true;
        self
    }

    /// Deployed play: always exploit.
    pub fn without_exploration(mut self) -> Self {
        self.exploration_enabled = false;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Rate actually used when selecting.
    pub fn effective_exploration_rate(&self) -> f64 {
        if self.exploration_enabled {
            self.exploration_rate
        } else {
            0.0
        }
    }
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Where the engine writes its table after each reward.
struct BrainStore {
    repository: Arc<dyn QTableRepository>,
    path: PathBuf,
}

impl fmt::Debug for BrainStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrainStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Tabular Q-learning controller
///
/// Selection is ε-greedy over the row of the sensed situation. Rewards update
/// the row's current best slot toward the reward, which is not necessarily
/// the slot of the action executed this turn.
#[derive(Debug)]
pub struct DecisionEngine {
    name: String,
    config: EngineConfig,
    table: QTable,
    rng: StdRng,
    store: Option<BrainStore>,
}

impl DecisionEngine {
    /// Create an engine with an empty table and no persistence.
    pub fn new(action_count: usize, config: EngineConfig) -> Self {
        Self {
            name: "q-learning".to_string(),
            rng: build_rng(config.seed),
            table: QTable::new(action_count),
            config,
            store: None,
        }
    }

    /// Create an engine around an existing table.
    pub fn from_table(table: QTable, config: EngineConfig) -> Self {
        Self {
            table,
            ..Self::new(0, config)
        }
    }

    /// Load the table stored at `path`, or start empty and write it.
    ///
    /// Any load failure degrades to a fresh table: a missing file, bytes
    /// that do not decode, or a record that fails structural checks
    /// (including an action count other than `action_count`).
    pub fn load_or_create(
        action_count: usize,
        config: EngineConfig,
        repository: Arc<dyn QTableRepository>,
        path: impl Into<PathBuf>,
    ) -> Self {
        let path = path.into();
        let loaded = if repository.exists(&path) {
            match repository
                .load(&path)
                .and_then(|saved| saved.into_table(action_count))
            {
                Ok(table) => {
                    info!("loaded {} situations from {}", table.len(), path.display());
                    Some(table)
                }
                Err(err) => {
                    warn!("discarding brain at {}: {err}", path.display());
                    None
                }
            }
        } else {
            info!("no brain at {}, starting fresh", path.display());
            None
        };

        let fresh = loaded.is_none();
        let mut engine = Self::new(action_count, config);
        if let Some(table) = loaded {
            engine.table = table;
        }
        engine.store = Some(BrainStore { repository, path });
        if fresh {
            engine.persist();
        }
        engine
    }

    /// Attach persistence without loading anything.
    pub fn with_store(
        mut self,
        repository: Arc<dyn QTableRepository>,
        path: impl Into<PathBuf>,
    ) -> Self {
        self.store = Some(BrainStore {
            repository,
            path: path.into(),
        });
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    /// Path the table is written to, if any.
    pub fn store_path(&self) -> Option<&Path> {
        self.store.as_ref().map(|store| store.path.as_path())
    }

    /// Host override for deployed play.
    pub fn set_exploration_enabled(&mut self, enabled: bool) {
        self.config.exploration_enabled = enabled;
    }

    /// ε-greedy selection with an explicit exploration rate.
    ///
    /// Creates the situation's row if it is new.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyActionSet`] if the table has no action slots.
    pub fn select_with_rate(&mut self, situation: &Situation, exploration_rate: f64) -> Result<usize> {
        let key = situation.encode();
        let count = self.table.action_count();
        let row = self.table.ensure_row(&key)?;

        if exploration_rate > 0.0 && self.rng.random::<f64>() < exploration_rate {
            // Explore: any registered action, legal or not
            Ok(self.rng.random_range(0..count))
        } else {
            Ok(QTable::argmax(row).unwrap_or(0))
        }
    }

    /// Apply a signed reward to the situation's row and persist.
    ///
    /// Returns the index of the slot that moved.
    pub fn apply_reward(&mut self, situation: &Situation, reward: f64) -> Result<usize> {
        let key = situation.encode();
        let slot = self
            .table
            .update_greedy(&key, reward, self.config.learning_rate)?;
        debug!("{}: {key}[{slot}] <- {reward:+.2}", self.name);
        self.persist();
        Ok(slot)
    }

    /// Write the table to its store now.
    ///
    /// # Errors
    ///
    /// Returns the repository error; does nothing without a store.
    pub fn save(&self) -> Result<()> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        let saved = SavedQTable::from_table(&self.table, Situation::DIMENSIONS);
        store.repository.save(&saved, &store.path)
    }

    fn persist(&self) {
        if let Err(err) = self.save() {
            warn!("{}: failed to save brain: {err}", self.name);
        }
    }
}

impl Learner for DecisionEngine {
    fn select_action(&mut self, situation: &Situation, action_count: usize) -> Result<usize> {
        if action_count == 0 {
            return Err(Error::EmptyActionSet);
        }
        if action_count != self.table.action_count() {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "engine has {} action slots but {action_count} actions are registered",
                    self.table.action_count()
                ),
            });
        }
        let rate = self.config.effective_exploration_rate();
        self.select_with_rate(situation, rate)
    }

    fn reward(&mut self, situation: &Situation, value: f64) -> Result<()> {
        self.apply_reward(situation, value).map(|_| ())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_learning(&self) -> bool {
        true
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.config.seed = Some(seed);
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{adapters::InMemoryRepository, types::SituationKey};

    fn situation() -> Situation {
        Situation {
            distance: 2,
            sufficient_mana: true,
            has_ammo: true,
            hp_bucket: 5,
        }
    }

    fn greedy_engine() -> DecisionEngine {
        DecisionEngine::new(6, EngineConfig::default().with_seed(3).without_exploration())
    }

    #[test]
    fn test_fresh_row_picks_first_action() {
        let mut engine = greedy_engine();
        assert_eq!(engine.select_action(&situation(), 6).unwrap(), 0);
        assert_eq!(engine.table().len(), 1);
    }

    #[test]
    fn test_reward_moves_best_slot_halfway() {
        let mut engine = greedy_engine();
        engine.reward(&situation(), 10.0).unwrap();
        let row = engine.table().row(&situation().encode()).unwrap();
        assert_eq!(row, &[5.0, 0.0, 0.0, 0.0, 0.0, 0.0]);

        engine.punish(&situation(), 10.0).unwrap();
        let row = engine.table().row(&situation().encode()).unwrap();
        // 5 + 0.5 * (-10 - 5)
        assert_eq!(row[0], -2.5);
    }

    #[test]
    fn test_punish_shifts_greedy_choice() {
        let mut engine = greedy_engine();
        engine.punish(&situation(), 4.0).unwrap();
        assert_eq!(engine.select_action(&situation(), 6).unwrap(), 1);
    }

    #[test]
    fn test_empty_action_set_fails_fast() {
        let mut engine = DecisionEngine::new(0, EngineConfig::default());
        assert!(matches!(
            engine.select_action(&situation(), 0),
            Err(Error::EmptyActionSet)
        ));
        assert!(matches!(
            engine.reward(&situation(), 1.0),
            Err(Error::EmptyActionSet)
        ));
    }

    #[test]
    fn test_every_reward_is_persisted() {
        let repo = InMemoryRepository::new();
        let mut engine = greedy_engine().with_store(Arc::new(repo.clone()), "brain");
        assert_eq!(repo.count(), 0);

        engine.reward(&situation(), 2.0).unwrap();
        let saved = repo.load(Path::new("brain")).unwrap();
        assert_eq!(saved.input_count, 4);
        let table = saved.into_table(6).unwrap();
        assert_eq!(table.row(&SituationKey::from("2_1_1_5")).unwrap()[0], 1.0);
    }

    #[test]
    fn test_load_or_create_falls_back_on_corruption() {
        let repo = InMemoryRepository::new();
        repo.insert_raw(Path::new("brain"), b"garbage".to_vec());

        let engine =
            DecisionEngine::load_or_create(6, EngineConfig::default(), Arc::new(repo.clone()), "brain");
        assert!(engine.table().is_empty());
        // The fresh table replaced the corrupt one
        assert!(repo.load(Path::new("brain")).is_ok());
    }

    #[test]
    fn test_load_or_create_rejects_action_count_mismatch() {
        let repo = InMemoryRepository::new();
        let mut old = QTable::new(4);
        old.insert_row(SituationKey::from("k"), vec![1.0; 4]).unwrap();
        repo.save(&SavedQTable::from_table(&old, 4), Path::new("brain"))
            .unwrap();

        let engine =
            DecisionEngine::load_or_create(6, EngineConfig::default(), Arc::new(repo), "brain");
        assert!(engine.table().is_empty());
        assert_eq!(engine.table().action_count(), 6);
    }

    #[test]
    fn test_load_or_create_restores_saved_rows() {
        let repo = InMemoryRepository::new();
        let mut first = greedy_engine().with_store(Arc::new(repo.clone()), "brain");
        first.reward(&situation(), 8.0).unwrap();

        let second =
            DecisionEngine::load_or_create(6, EngineConfig::default(), Arc::new(repo), "brain");
        assert_eq!(second.table(), first.table());
        assert_eq!(second.store_path(), Some(Path::new("brain")));
    }
}
