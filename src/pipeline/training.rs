//! Self-play training pipeline

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Result,
    arena::{MatchRules, MatchSession},
    ports::{Learner, Observer},
    types::{MatchResult, Side},
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of matches to play
    pub matches: usize,

    /// Turn cap per match; a match that reaches it is a stalemate
    pub max_turns: usize,

    /// Random seed
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            matches: 100,
            max_turns: 500,
            seed: None,
        }
    }
}

/// Summary of one finished match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub match_num: usize,
    pub result: MatchResult,
    pub turns: usize,
    pub player_hp: i32,
    pub enemy_hp: i32,
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Total matches played
    pub total_matches: usize,

    /// Matches won by the red fighter
    pub red_wins: usize,

    /// Matches won by the blue fighter
    pub blue_wins: usize,

    /// Matches that hit the turn cap
    pub stalemates: usize,

    pub red_win_rate: f64,
    pub blue_win_rate: f64,

    /// Mean settled turns per match
    pub avg_match_length: f64,
}

impl TrainingResult {
    /// Tally a run from its match outcomes
    pub fn from_outcomes(outcomes: &[MatchOutcome]) -> Self {
        let total_matches = outcomes.len();
        let count = |side| {
            outcomes
                .iter()
                .filter(|o| o.result.winner() == Some(side))
                .count()
        };
        let red_wins = count(Side::Player);
        let blue_wins = count(Side::Enemy);
        let rate = |n: usize| {
            if total_matches > 0 {
                n as f64 / total_matches as f64
            } else {
                0.0
            }
        };
        let avg_match_length = if total_matches > 0 {
            outcomes.iter().map(|o| o.turns).sum::<usize>() as f64 / total_matches as f64
        } else {
            0.0
        };

        Self {
            total_matches,
            red_wins,
            blue_wins,
            stalemates: total_matches - red_wins - blue_wins,
            red_win_rate: rate(red_wins),
            blue_win_rate: rate(blue_wins),
            avg_match_length,
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Runs repeated matches between two learners, resetting after each one
pub struct TrainingPipeline {
    config: TrainingConfig,
    rules: MatchRules,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig, rules: MatchRules) -> Self {
        Self {
            config,
            rules,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Play the configured number of matches. `player` controls red and
    /// always opens; `enemy` controls blue.
    pub fn run(
        &mut self,
        player: &mut dyn Learner,
        enemy: &mut dyn Learner,
    ) -> Result<TrainingResult> {
        let mut session = MatchSession::standard(self.rules.clone());
        if let Some(seed) = self.config.seed {
            player.set_rng_seed(seed)?;
            enemy.set_rng_seed(seed.wrapping_add(1))?;
            session = session.with_seed(seed.wrapping_add(2));
        }

        for observer in &mut self.observers {
            observer.on_training_start(self.config.matches)?;
        }

        let mut outcomes = Vec::with_capacity(self.config.matches);
        for match_num in 0..self.config.matches {
            let outcome = self.play_match(&mut session, match_num, player, enemy)?;

            for observer in &mut self.observers {
                observer.on_match_end(match_num, outcome.result, outcome.turns)?;
            }
            outcomes.push(outcome);
            session.reset();
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let result = TrainingResult::from_outcomes(&outcomes);
        info!(
            "training finished: {} matches, red {} / blue {} / stalemate {}",
            result.total_matches, result.red_wins, result.blue_wins, result.stalemates
        );
        Ok(result)
    }

    fn play_match(
        &mut self,
        session: &mut MatchSession,
        match_num: usize,
        player: &mut dyn Learner,
        enemy: &mut dyn Learner,
    ) -> Result<MatchOutcome> {
        for observer in &mut self.observers {
            observer.on_match_start(match_num)?;
        }

        while !session.is_over() && session.turn_number() < self.config.max_turns {
            let report = session.play_turn(player, enemy)?;
            for observer in &mut self.observers {
                for line in &report.log {
                    observer.on_battle_log(match_num, line)?;
                }
                observer.on_turn(match_num, &report)?;
            }
        }

        let result = match session.winner() {
            Some(winner) => MatchResult::Won(winner),
            None => {
                debug!("match {match_num} hit the {}-turn cap", self.config.max_turns);
                MatchResult::Stalemate
            }
        };

        Ok(MatchOutcome {
            match_num,
            result,
            turns: session.turn_number(),
            player_hp: session.combatant(Side::Player).hp(),
            enemy_hp: session.combatant(Side::Enemy).hp(),
        })
    }
}
