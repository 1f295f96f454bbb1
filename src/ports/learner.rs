//! Learner port - abstraction over whoever picks a fighter's moves
//!
//! This port is implemented by:
//! - The Q-learning decision engine
//! - Uniform random play (the non-learning fallback)
//! - Scripted play (human input, tests, replays)

use crate::{Result, arena::sensors::Situation};

/// Learner trait - unified interface for every controller of a fighter
///
/// The turn arbiter drives any learner through the same pipeline: it asks
/// for an action index, then feeds back reward and punishment signals for
/// the situation sensed at the start of that turn.
///
/// # Examples
///
/// ```
/// use gladiator::arena::Situation;
/// use gladiator::ports::Learner;
///
/// struct AlwaysGuard;
///
/// impl Learner for AlwaysGuard {
///     fn select_action(&mut self, _s: &Situation, _count: usize) -> gladiator::Result<usize> {
///         Ok(5)
///     }
///
///     fn name(&self) -> &str {
///         "always-guard"
///     }
///
///     fn as_any(&self) -> &dyn std::any::Any {
///         self
///     }
/// }
/// ```
pub trait Learner: Send {
    /// Choose an action index in `[0, action_count)` for the sensed situation.
    ///
    /// The index may still be illegal; the arbiter validates it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::EmptyActionSet`] if there is nothing to choose.
    fn select_action(&mut self, situation: &Situation, action_count: usize) -> Result<usize>;

    /// Positive feedback for `situation`.
    ///
    /// # Default Implementation
    ///
    /// Does nothing, suitable for non-adaptive controllers.
    fn reward(&mut self, _situation: &Situation, _value: f64) -> Result<()> {
        Ok(())
    }

    /// Negative feedback for `situation`; always delivered as `reward(-|value|)`.
    fn punish(&mut self, situation: &Situation, value: f64) -> Result<()> {
        self.reward(situation, -value.abs())
    }

    /// Name used in logs and summaries.
    fn name(&self) -> &str;

    /// Whether this learner adapts to feedback.
    fn is_learning(&self) -> bool {
        false
    }

    /// Reseed the learner's random source for reproducible runs.
    ///
    /// # Default Implementation
    ///
    /// Does nothing, for controllers without randomness.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }

    /// Enable downcasting to concrete types.
    fn as_any(&self) -> &dyn std::any::Any;
}
