//! Tabular Q-learning
//!
//! This module implements the decision engine that controls a fighter. The
//! engine keeps a sparse table of action values per sensed situation, picks
//! actions ε-greedily and moves values toward each reward it receives.
//!
//! ## Update Rule
//!
//! Single step, no bootstrap from the next situation:
//!
//! ```text
//! a* = argmax Q(s, ·)          (ties -> lowest index)
//! Q(s, a*) += α (r − Q(s, a*))
//! ```
//!
//! ## Usage Example
//!
//! ```no_run
//! use gladiator::arena::Situation;
//! use gladiator::ports::Learner;
//! use gladiator::q_learning::{DecisionEngine, EngineConfig};
//!
//! let mut engine = DecisionEngine::new(6, EngineConfig::default().with_seed(7));
//! let situation = Situation { distance: 2, sufficient_mana: true, has_ammo: true, hp_bucket: 5 };
//!
//! let action = engine.select_action(&situation, 6)?;
//! engine.reward(&situation, 1.5)?;
//! # Ok::<(), gladiator::Error>(())
//! ```

pub mod agent;
pub mod q_table;
pub mod serialization;

// Public re-exports
pub use agent::{DecisionEngine, EngineConfig};
pub use q_table::QTable;
pub use serialization::{SavedQTable, SavedRow};
