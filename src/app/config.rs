//! Configuration types for matches and decision engines.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    arena::{DamageRange, MatchRules, Pacing},
    q_learning::EngineConfig,
};

/// Complete, file-loadable configuration.
///
/// Missing sections fall back to their defaults, so a config file only needs
/// to mention what it changes.
///
/// # Examples
///
/// ```
/// use gladiator::app::ArenaConfig;
///
/// let config = ArenaConfig::default()
///     .with_seed(42)
///     .with_exploration(0.1)
///     .with_self_play(true);
/// config.validate()?;
/// # Ok::<(), gladiator::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Fighters, actions, geometry, rewards, sensors and pacing
    pub rules: MatchRules,
    /// Learning hyperparameters shared by every engine created from this config
    pub engine: EngineConfig,
}

impl ArenaConfig {
    /// Read and validate a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open config {path:?}"),
            source,
        })?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create config {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.engine.seed = Some(seed);
        self
    }

    pub fn with_exploration(mut self, rate: f64) -> Self {
        self.engine = self.engine.with_exploration(rate);
        self
    }

    /// Greedy play for deployed engines.
    pub fn without_exploration(mut self) -> Self {
        self.engine = self.engine.without_exploration();
        self
    }

    pub fn with_self_play(mut self, self_play: bool) -> Self {
        self.rules.self_play = self_play;
        self
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.rules.pacing = pacing;
        self
    }

    /// Reject values the simulation cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first offending
    /// field.
    pub fn validate(&self) -> Result<()> {
        let engine = &self.engine;
        check(
            engine.learning_rate > 0.0 && engine.learning_rate <= 1.0,
            "engine.learning_rate must be in (0, 1]",
        )?;
        check(
            (0.0..=1.0).contains(&engine.discount_factor),
            "engine.discount_factor must be in [0, 1]",
        )?;
        check(
            (0.0..=1.0).contains(&engine.exploration_rate),
            "engine.exploration_rate must be in [0, 1]",
        )?;

        let stats = &self.rules.stats;
        check(stats.max_hp > 0, "rules.stats.max_hp must be positive")?;
        check(stats.max_mana >= 0, "rules.stats.max_mana must not be negative")?;
        check(
            (0..=stats.max_mana).contains(&stats.start_mana),
            "rules.stats.start_mana must be within [0, max_mana]",
        )?;

        let combat = &self.rules.combat;
        for (name, cost) in [
            ("move_cost", combat.move_cost),
            ("ranged_cost", combat.ranged_cost),
            ("melee_cost", combat.melee_cost),
            ("guard_cost", combat.guard_cost),
            ("recover_mana", combat.recover_mana),
            ("recover_hp", combat.recover_hp),
        ] {
            check(cost >= 0, &format!("rules.combat.{name} must not be negative"))?;
        }
        check_range("ranged_damage", combat.ranged_damage)?;
        check_range("melee_damage", combat.melee_damage)?;
        check(
            (0.0..=1.0).contains(&combat.armor_factor),
            "rules.combat.armor_factor must be in [0, 1]",
        )?;
        check(
            (0.0..=1.0).contains(&combat.low_health_fraction),
            "rules.combat.low_health_fraction must be in [0, 1]",
        )?;

        let geometry = &self.rules.geometry;
        check(
            geometry.map_boundary.is_finite() && geometry.map_boundary > 0.0,
            "rules.geometry.map_boundary must be positive",
        )?;
        check(
            geometry.step_size.is_finite() && geometry.step_size > 0.0,
            "rules.geometry.step_size must be positive",
        )?;
        check(
            geometry.min_separation >= 0.0,
            "rules.geometry.min_separation must not be negative",
        )?;
        check(
            geometry.close_threshold < geometry.mid_threshold,
            "rules.geometry.close_threshold must be below mid_threshold",
        )?;

        let rewards = &self.rules.rewards;
        for (name, weight) in [
            ("terminal", rewards.terminal),
            ("damage_dealt", rewards.damage_dealt),
            ("damage_taken_low", rewards.damage_taken_low),
            ("damage_taken", rewards.damage_taken),
            ("healing", rewards.healing),
            ("hp_gap", rewards.hp_gap),
            ("idle_penalty", rewards.idle_penalty),
            ("legality_penalty", rewards.legality_penalty),
        ] {
            check(
                weight.is_finite() && weight >= 0.0,
                &format!("rules.rewards.{name} must be finite and non-negative"),
            )?;
        }

        check(
            self.rules.sensors.hp_bucket_size > 0,
            "rules.sensors.hp_bucket_size must be positive",
        )?;

        let pacing = &self.rules.pacing;
        for (name, secs) in [
            ("decision_delay_secs", pacing.decision_delay_secs),
            ("settle_delay_secs", pacing.settle_delay_secs),
            ("reset_delay_secs", pacing.reset_delay_secs),
        ] {
            check(
                secs.is_finite() && secs >= 0.0,
                &format!("rules.pacing.{name} must be finite and non-negative"),
            )?;
        }

        Ok(())
    }
}

fn check(condition: bool, message: &str) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(Error::InvalidConfiguration {
            message: message.to_string(),
        })
    }
}

fn check_range(name: &str, range: DamageRange) -> Result<()> {
    check(
        range.min >= 0 && range.min < range.max,
        &format!("rules.combat.{name} must be a non-empty range of non-negative damage"),
    )
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        ArenaConfig::default().validate().unwrap();
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("arena.json");

        let config = ArenaConfig::default().with_seed(7).with_self_play(true);
        config.save(&path).unwrap();
        assert_eq!(ArenaConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("arena.json");
        std::fs::write(
            &path,
            r#"{ "engine": { "learning_rate": 0.2, "discount_factor": 0.9,
                 "exploration_rate": 0.0, "exploration_enabled": false, "seed": 3 } }"#,
        )
        .unwrap();

        let config = ArenaConfig::load(&path).unwrap();
        assert_eq!(config.engine.learning_rate, 0.2);
        assert_eq!(config.rules, MatchRules::default());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = ArenaConfig::default();
        config.engine.learning_rate = 0.0;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration { .. })
        ));

        let mut config = ArenaConfig::default();
        config.rules.stats.start_mana = 500;
        assert!(config.validate().is_err());

        let mut config = ArenaConfig::default();
        config.rules.geometry.close_threshold = 8.0;
        assert!(config.validate().is_err());

        let mut config = ArenaConfig::default();
        config.rules.rewards.hp_gap = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = ArenaConfig::default();
        config.rules.combat.melee_damage = DamageRange::new(10, 10);
        assert!(config.validate().is_err());
    }
}
