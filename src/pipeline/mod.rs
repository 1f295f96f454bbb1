//! Self-play training pipeline
//!
//! This module provides:
//! - The match loop that pits two learners against each other
//! - Baseline controllers (random, scripted)
//! - Observers that record or render what happens

pub mod learners;
pub mod observers;
pub mod training;

// Re-export learner implementations (adapters)
pub use learners::{RandomLearner, ScriptedLearner};
// Re-export observer implementations (adapters)
pub use observers::{
    BattleLogObserver, JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver,
    TurnObservation,
};
pub use training::{MatchOutcome, TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::{Learner, Observer};
