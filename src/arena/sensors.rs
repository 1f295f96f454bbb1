//! Sensor contract between the arena and the learner

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{combatant::Combatant, field::DistanceRegime};
use crate::types::SituationKey;

/// Bucketing applied to raw fighter state before it reaches the learner.
///
/// The bucket widths bound how many distinct situations the Q-table can
/// grow to; they are tuning knobs, not correctness requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Mana strictly above this counts as "sufficient"
    pub mana_threshold: i32,
    /// HP is reported as `round(hp / hp_bucket_size)`
    pub hp_bucket_size: i32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            mana_threshold: 20,
            hp_bucket_size: 20,
        }
    }
}

/// The four scalars sensed at the start of every decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Situation {
    /// Distance regime ordinal (Close=0, Mid=1, Far=2)
    pub distance: u8,
    pub sufficient_mana: bool,
    pub has_ammo: bool,
    pub hp_bucket: i32,
}

impl Situation {
    /// Number of sensor scalars.
    pub const DIMENSIONS: usize = 4;

    /// Read the sensors for `combatant`.
    pub fn sense(combatant: &Combatant, regime: DistanceRegime, config: &SensorConfig) -> Self {
        let bucket = config.hp_bucket_size.max(1);
        Self {
            distance: regime.ordinal(),
            sufficient_mana: combatant.mana() > config.mana_threshold,
            has_ammo: combatant.ammo() > 0,
            hp_bucket: (f64::from(combatant.hp()) / f64::from(bucket)).round_ties_even() as i32,
        }
    }

    /// Sensor values in their fixed order.
    pub fn scalars(&self) -> [i32; Self::DIMENSIONS] {
        [
            i32::from(self.distance),
            i32::from(self.sufficient_mana),
            i32::from(self.has_ammo),
            self.hp_bucket,
        ]
    }

    /// Canonical Q-table key, e.g. `2_1_1_5`.
    pub fn encode(&self) -> SituationKey {
        let parts: Vec<String> = self.scalars().iter().map(i32::to_string).collect();
        SituationKey::new(parts.join(SituationKey::DELIMITER))
    }
}

impl fmt::Display for Situation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}
