//! Combat arena
//!
//! This module provides the two fighters, the one-dimensional battlefield,
//! the action catalogue and the turn arbiter that ties them together.

pub mod actions;
pub mod arbiter;
pub mod combatant;
pub mod field;
pub mod legality;
pub mod reward;
pub mod sensors;

// Re-export main types
pub use actions::{
    ActionContext, ActionDefinition, ActionHandler, ActionKind, ActionRegistry, CombatRules,
    DamageRange, TurnEffects,
};
pub use arbiter::{
    MatchRules, MatchSession, Pacing, PendingSettle, TurnContext, TurnReport, TurnState,
};
pub use combatant::{Combatant, FighterStats};
pub use field::{Battlefield, DistanceRegime, FieldGeometry};
pub use legality::{LegalityFilter, kind_is_legal};
pub use reward::{RewardShaper, RewardSignal, RewardWeights, ShapedReward, TurnDelta};
pub use sensors::{SensorConfig, Situation};
