//! Observer port - abstraction for match observation and data collection
//!
//! This port defines the interface for observing self-play training and
//! interactive matches, allowing composable data collection without
//! coupling the arbiter or the training loop to specific output formats.

use crate::{Result, arena::TurnReport, types::MatchResult};

/// Observer trait for monitoring matches
///
/// Observers can be composed to collect different types of data:
/// - Progress bars for user feedback
/// - JSONL turn logs for analysis
/// - Win/loss metrics
/// - Battle-log rendering for a presentation layer
///
/// # Event Sequence
///
/// 1. `on_training_start(total_matches)` - Once at the beginning
/// 2. For each match:
///    - `on_match_start(match_num)`
///    - For each settled turn: `on_battle_log(...)` per log line, then `on_turn(...)`
///    - `on_match_end(match_num, result, turns)`
/// 3. `on_training_end()` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use gladiator::{ports::Observer, types::MatchResult};
///
/// struct WinCounter {
///     red_wins: usize,
/// }
///
/// impl Observer for WinCounter {
///     fn on_match_end(
///         &mut self,
///         _match_num: usize,
///         result: MatchResult,
///         _turns: usize,
///     ) -> gladiator::Result<()> {
///         if result.winner() == Some(gladiator::types::Side::Player) {
///             self.red_wins += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called once before the first match.
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to initialize observation state.
    fn on_training_start(&mut self, _total_matches: usize) -> Result<()> {
        Ok(())
    }

    /// Called when a match starts (0-based index).
    fn on_match_start(&mut self, _match_num: usize) -> Result<()> {
        Ok(())
    }

    /// Called for every human-readable line a turn produced.
    ///
    /// Notification only; nothing in the arbiter depends on it.
    fn on_battle_log(&mut self, _match_num: usize, _line: &str) -> Result<()> {
        Ok(())
    }

    /// Called after each settled turn.
    fn on_turn(&mut self, _match_num: usize, _report: &TurnReport) -> Result<()> {
        Ok(())
    }

    /// Called when a match ends by knock-out or by hitting the turn cap.
    fn on_match_end(&mut self, _match_num: usize, _result: MatchResult, _turns: usize) -> Result<()> {
        Ok(())
    }

    /// Called once after the last match. Use this to flush files or print
    /// summaries.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
