//! Turns an HP delta into a scalar learning signal

use serde::{Deserialize, Serialize};

use crate::{Result, arena::sensors::Situation, ports::Learner};

/// Weights of the reward function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardWeights {
    /// Magnitude of the win/loss signal
    pub terminal: f64,
    pub damage_dealt: f64,
    /// Damage-taken weight while the actor is below `low_health_hp`
    pub damage_taken_low: f64,
    /// Damage-taken weight otherwise
    pub damage_taken: f64,
    pub low_health_hp: i32,
    pub healing: f64,
    pub hp_gap: f64,
    /// Punishment for a turn that scores exactly zero
    pub idle_penalty: f64,
    /// Punishment for choosing an illegal action
    pub legality_penalty: f64,
    /// Forward the per-action hints emitted by action handlers
    pub action_shaping: bool,
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            terminal: 150.0,
            damage_dealt: 3.0,
            damage_taken_low: 4.0,
            damage_taken: 2.0,
            low_health_hp: 30,
            healing: 1.5,
            hp_gap: 0.2,
            idle_penalty: 0.5,
            legality_penalty: 10.0,
            action_shaping: true,
        }
    }
}

/// Both fighters' HP at the start and end of one turn, from the actor's view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnDelta {
    pub actor_hp_start: i32,
    pub actor_hp_end: i32,
    pub opponent_hp_start: i32,
    pub opponent_hp_end: i32,
}

impl TurnDelta {
    pub fn damage_dealt(&self) -> i32 {
        self.opponent_hp_start - self.opponent_hp_end
    }

    /// Negative when the actor healed.
    pub fn damage_taken(&self) -> i32 {
        self.actor_hp_start - self.actor_hp_end
    }
}

/// A learning signal, already split into the two public entry points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RewardSignal {
    Reward(f64),
    Punish(f64),
}

impl RewardSignal {
    /// Classify a signed hint: positive rewards, anything else punishes.
    pub fn from_signed(value: f64) -> Self {
        if value > 0.0 {
            RewardSignal::Reward(value)
        } else {
            RewardSignal::Punish(value.abs())
        }
    }

    /// Signed value as seen by the learner.
    pub fn signed(&self) -> f64 {
        match *self {
            RewardSignal::Reward(v) => v,
            RewardSignal::Punish(v) => -v.abs(),
        }
    }

    /// Deliver to a learner for the given situation.
    pub fn deliver(&self, learner: &mut dyn Learner, situation: &Situation) -> Result<()> {
        match *self {
            RewardSignal::Reward(v) => learner.reward(situation, v),
            RewardSignal::Punish(v) => learner.punish(situation, v),
        }
    }
}

/// Outcome of scoring a turn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapedReward {
    pub signal: RewardSignal,
    pub terminal: bool,
}

/// Stateless scorer for settled turns.
#[derive(Debug, Clone, Default)]
pub struct RewardShaper {
    weights: RewardWeights,
}

impl RewardShaper {
    pub fn new(weights: RewardWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &RewardWeights {
        &self.weights
    }

    /// Score a turn. A knock-out short-circuits to the terminal signal.
    pub fn score(&self, delta: &TurnDelta) -> ShapedReward {
        if delta.opponent_hp_end <= 0 {
            return ShapedReward {
                signal: RewardSignal::Reward(self.weights.terminal),
                terminal: true,
            };
        }
        if delta.actor_hp_end <= 0 {
            return ShapedReward {
                signal: RewardSignal::Punish(self.weights.terminal),
                terminal: true,
            };
        }

        let turn_reward = self.turn_reward(delta);
        let signal = if turn_reward > 0.0 {
            RewardSignal::Reward(turn_reward)
        } else if turn_reward == 0.0 {
            RewardSignal::Punish(self.weights.idle_penalty)
        } else {
            RewardSignal::Punish(turn_reward.abs())
        };
        ShapedReward {
            signal,
            terminal: false,
        }
    }

    /// Raw non-terminal turn reward before it is split into reward/punish.
    pub fn turn_reward(&self, delta: &TurnDelta) -> f64 {
        let w = &self.weights;
        let mut total = 0.0;

        let dealt = delta.damage_dealt();
        if dealt > 0 {
            total += f64::from(dealt) * w.damage_dealt;
        }

        let taken = delta.damage_taken();
        if taken > 0 {
            let factor = if delta.actor_hp_end < w.low_health_hp {
                w.damage_taken_low
            } else {
                w.damage_taken
            };
            total -= f64::from(taken) * factor;
        } else if taken < 0 {
            total += f64::from(-taken) * w.healing;
        }

        total += f64::from(delta.actor_hp_end - delta.opponent_hp_end) * w.hp_gap;
        total
    }
}
