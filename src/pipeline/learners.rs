//! Non-learning controllers
//!
//! Baselines for self-play and the stand-in for a human at the keyboard.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{Error, Result, arena::Situation, ports::Learner};

/// Uniform random play over the full action set
///
/// Legality is not consulted; illegal picks go through the arbiter's
/// fallback like anyone else's.
pub struct RandomLearner {
    name: String,
    rng: StdRng,
}

impl RandomLearner {
    /// Create a new random learner
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Create a new random learner with a deterministic seed
    pub fn with_seed(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Learner for RandomLearner {
    fn select_action(&mut self, _situation: &Situation, action_count: usize) -> Result<usize> {
        if action_count == 0 {
            return Err(Error::EmptyActionSet);
        }
        Ok(self.rng.random_range(0..action_count))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Plays a fixed script of action indices, repeating it when exhausted
///
/// Every signal it receives is recorded with its sign, which makes it the
/// stand-in of choice in tests. Interactive hosts replace the script with the
/// human's choice before each turn.
#[derive(Debug, Clone)]
pub struct ScriptedLearner {
    name: String,
    script: Vec<usize>,
    cursor: usize,
    signals: Vec<f64>,
}

impl ScriptedLearner {
    pub fn new(name: impl Into<String>, script: impl IntoIterator<Item = usize>) -> Self {
        Self {
            name: name.into(),
            script: script.into_iter().collect(),
            cursor: 0,
            signals: Vec::new(),
        }
    }

    /// Replace the script and start from its beginning.
    pub fn set_script(&mut self, script: impl IntoIterator<Item = usize>) {
        self.script = script.into_iter().collect();
        self.cursor = 0;
    }

    /// Signed values of every reward and punishment received, in order.
    pub fn signals(&self) -> &[f64] {
        &self.signals
    }

    pub fn clear_signals(&mut self) {
        self.signals.clear();
    }
}

impl Learner for ScriptedLearner {
    fn select_action(&mut self, _situation: &Situation, action_count: usize) -> Result<usize> {
        if action_count == 0 {
            return Err(Error::EmptyActionSet);
        }
        if self.script.is_empty() {
            return Err(Error::InvalidConfiguration {
                message: format!("{} has an empty script", self.name),
            });
        }
        let index = self.script[self.cursor % self.script.len()];
        self.cursor += 1;
        Ok(index)
    }

    fn reward(&mut self, _situation: &Situation, value: f64) -> Result<()> {
        self.signals.push(value);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn situation() -> Situation {
        Situation {
            distance: 1,
            sufficient_mana: true,
            has_ammo: false,
            hp_bucket: 3,
        }
    }

    #[test]
    fn test_random_learner_stays_in_range() {
        let mut learner = RandomLearner::with_seed("random", 9);
        for _ in 0..200 {
            assert!(learner.select_action(&situation(), 6).unwrap() < 6);
        }
        assert!(matches!(
            learner.select_action(&situation(), 0),
            Err(Error::EmptyActionSet)
        ));
    }

    #[test]
    fn test_script_cycles() {
        let mut learner = ScriptedLearner::new("script", [2, 4]);
        let picks: Vec<_> = (0..5)
            .map(|_| learner.select_action(&situation(), 6).unwrap())
            .collect();
        assert_eq!(picks, vec![2, 4, 2, 4, 2]);

        learner.set_script([1]);
        assert_eq!(learner.select_action(&situation(), 6).unwrap(), 1);
    }

    #[test]
    fn test_signals_are_signed() {
        let mut learner = ScriptedLearner::new("script", [0]);
        learner.reward(&situation(), 0.3).unwrap();
        learner.punish(&situation(), 10.0).unwrap();
        learner.punish(&situation(), -0.5).unwrap();
        assert_eq!(learner.signals(), &[0.3, -10.0, -0.5]);
    }
}
