//! Observer implementations for training and interactive matches
//!
//! Observers allow composable data collection without coupling the match
//! loop to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    arena::TurnReport,
    ports::Observer,
    types::{MatchResult, Side},
};

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    red_wins: usize,
    blue_wins: usize,
    stalemates: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            red_wins: 0,
            blue_wins: 0,
            stalemates: 0,
        }
    }

    fn tally(&self) -> String {
        format!(
            "{} Blue:{} Stalemate:{}",
            self.red_wins, self.blue_wins, self.stalemates
        )
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_matches: usize) -> Result<()> {
        let pb = ProgressBar::new(total_matches as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.red/blue} {pos}/{len} matches (Red:{msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_match_end(&mut self, match_num: usize, result: MatchResult, _turns: usize) -> Result<()> {
        match result {
            MatchResult::Won(Side::Player) => self.red_wins += 1,
            MatchResult::Won(Side::Enemy) => self.blue_wins += 1,
            MatchResult::Stalemate => self.stalemates += 1,
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(match_num as u64 + 1);
            pb.set_message(self.tally());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.tally());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks outcomes and how turns were spent
#[derive(Debug, Default)]
pub struct MetricsObserver {
    red_wins: usize,
    blue_wins: usize,
    stalemates: usize,
    total_matches: usize,
    match_lengths: Vec<usize>,
    illegal_choices: usize,
    total_turns: usize,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Share of finished matches won by `side`
    pub fn win_rate(&self, side: Side) -> f64 {
        let wins = match side {
            Side::Player => self.red_wins,
            Side::Enemy => self.blue_wins,
        };
        if self.total_matches == 0 {
            0.0
        } else {
            wins as f64 / self.total_matches as f64
        }
    }

    /// Get average match length in turns
    pub fn avg_match_length(&self) -> f64 {
        if self.match_lengths.is_empty() {
            0.0
        } else {
            self.match_lengths.iter().sum::<usize>() as f64 / self.match_lengths.len() as f64
        }
    }

    /// Share of turns on which the chosen action was illegal
    pub fn illegal_rate(&self) -> f64 {
        if self.total_turns == 0 {
            0.0
        } else {
            self.illegal_choices as f64 / self.total_turns as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_matches: self.total_matches,
            red_wins: self.red_wins,
            blue_wins: self.blue_wins,
            stalemates: self.stalemates,
            red_win_rate: self.win_rate(Side::Player),
            blue_win_rate: self.win_rate(Side::Enemy),
            avg_match_length: self.avg_match_length(),
            illegal_rate: self.illegal_rate(),
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_matches: usize,
    pub red_wins: usize,
    pub blue_wins: usize,
    pub stalemates: usize,
    pub red_win_rate: f64,
    pub blue_win_rate: f64,
    pub avg_match_length: f64,
    pub illegal_rate: f64,
}

impl Observer for MetricsObserver {
    fn on_turn(&mut self, _match_num: usize, report: &TurnReport) -> Result<()> {
        self.total_turns += 1;
        if report.illegal_choice {
            self.illegal_choices += 1;
        }
        Ok(())
    }

    fn on_match_end(&mut self, _match_num: usize, result: MatchResult, turns: usize) -> Result<()> {
        self.total_matches += 1;
        self.match_lengths.push(turns);
        match result {
            MatchResult::Won(Side::Player) => self.red_wins += 1,
            MatchResult::Won(Side::Enemy) => self.blue_wins += 1,
            MatchResult::Stalemate => self.stalemates += 1,
        }
        Ok(())
    }
}

/// One line of the JSONL turn log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnObservation {
    pub match_num: usize,
    #[serde(flatten)]
    pub report: TurnReport,
}

/// JSONL observer - Writes one JSON object per settled turn
pub struct JsonlObserver {
    writer: BufWriter<File>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_turn(&mut self, match_num: usize, report: &TurnReport) -> Result<()> {
        let observation = TurnObservation {
            match_num,
            report: report.clone(),
        };
        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_match_end(&mut self, _match_num: usize, _result: MatchResult, _turns: usize) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Battle-log observer - Renders the human-readable log lines
///
/// This is the presentation side of the per-action log: the arbiter emits the
/// lines and never waits for anyone to read them.
pub struct BattleLogObserver<W: Write + Send> {
    writer: W,
    show_results: bool,
}

impl BattleLogObserver<std::io::Stdout> {
    /// Log to standard output
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> BattleLogObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            show_results: true,
        }
    }

    /// Suppress the per-match result line
    pub fn without_results(mut self) -> Self {
        self.show_results = false;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> Observer for BattleLogObserver<W> {
    fn on_battle_log(&mut self, _match_num: usize, line: &str) -> Result<()> {
        writeln!(self.writer, "{line}")?;
        Ok(())
    }

    fn on_match_end(&mut self, match_num: usize, result: MatchResult, turns: usize) -> Result<()> {
        if self.show_results {
            writeln!(
                self.writer,
                "Match {}: {result} after {turns} turns",
                match_num + 1
            )?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{
        arena::{DistanceRegime, RewardSignal, ShapedReward, TurnState},
        types::SituationKey,
    };

    fn report(illegal_choice: bool) -> TurnReport {
        TurnReport {
            turn: 1,
            actor: Side::Player,
            situation: SituationKey::from("2_1_1_5"),
            chosen: Some(3),
            executed: Some(2),
            action_name: Some("RangedAttack".to_string()),
            illegal_choice,
            log: vec!["Red looses an arrow".to_string()],
            reward: ShapedReward {
                signal: RewardSignal::Reward(57.6),
                terminal: false,
            },
            player_hp: 100,
            enemy_hp: 82,
            regime: DistanceRegime::Far,
            state: TurnState::EnemyTurn,
            reset_after: None,
        }
    }

    #[test]
    fn test_metrics_observer() {
        let mut observer = MetricsObserver::new();
        assert_eq!(observer.win_rate(Side::Player), 0.0);

        observer.on_turn(0, &report(true)).unwrap();
        observer.on_turn(0, &report(false)).unwrap();
        observer
            .on_match_end(0, MatchResult::Won(Side::Player), 2)
            .unwrap();
        observer.on_match_end(1, MatchResult::Stalemate, 4).unwrap();
        observer
            .on_match_end(2, MatchResult::Won(Side::Player), 6)
            .unwrap();

        let summary = observer.summary();
        assert_eq!(summary.total_matches, 3);
        assert_eq!(summary.red_wins, 2);
        assert_eq!(summary.stalemates, 1);
        assert!((summary.red_win_rate - 0.666).abs() < 0.01);
        assert_eq!(summary.avg_match_length, 4.0);
        assert_eq!(summary.illegal_rate, 0.5);
    }

    #[test]
    fn test_jsonl_observer_writes_one_line_per_turn() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("turns.jsonl");

        let mut observer = JsonlObserver::new(&path).unwrap();
        observer.on_turn(0, &report(false)).unwrap();
        observer.on_turn(0, &report(true)).unwrap();
        observer.on_training_end().unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = raw.lines().collect();
        assert_eq!(lines.len(), 2);

        let value: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(value["match_num"], 0);
        assert_eq!(value["illegal_choice"], true);
        assert_eq!(value["situation"], "2_1_1_5");
    }

    #[test]
    fn test_battle_log_observer() {
        let mut observer = BattleLogObserver::new(Vec::new());
        observer.on_battle_log(0, "Blue raises the guard").unwrap();
        observer
            .on_match_end(0, MatchResult::Won(Side::Enemy), 12)
            .unwrap();

        let text = String::from_utf8(observer.into_inner()).unwrap();
        assert_eq!(
            text,
            "Blue raises the guard\nMatch 1: Blue wins after 12 turns\n"
        );
    }
}
