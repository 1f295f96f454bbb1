//! Turn arbiter - the combat state machine
//!
//! A [`MatchSession`] owns both fighters and the battlefield and is the only
//! source of state transitions and rewards. Every turn runs the same strictly
//! ordered pipeline regardless of who controls the acting fighter:
//!
//! ```text
//! begin_turn:  snapshot -> sense -> decide -> validate -> execute
//!              (returns the settle delay; state holds a pending settle)
//! settle:      impacts -> reward -> armor decay -> end-of-match check
//! ```
//!
//! The pause between the two halves models animation and projectile travel.
//! The session never sleeps itself; hosts that render may wait for the
//! returned delay, headless hosts call [`MatchSession::play_turn`].

use std::{fmt, time::Duration};

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{
    actions::{ActionContext, ActionRegistry, CombatRules, TurnEffects},
    combatant::{Combatant, FighterStats},
    field::{Battlefield, DistanceRegime, FieldGeometry},
    legality::LegalityFilter,
    reward::{RewardShaper, RewardSignal, RewardWeights, ShapedReward, TurnDelta},
    sensors::{SensorConfig, Situation},
};
use crate::{
    Error, Result,
    ports::Learner,
    types::{Side, SituationKey},
};

/// Wall-clock pauses a rendering host should insert. Game logic never waits
/// on them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pacing {
    /// Pause before the acting fighter senses and decides
    pub decision_delay_secs: f64,
    /// Pause between executing an action and settling its outcome
    pub settle_delay_secs: f64,
    /// Pause between a self-play match ending and the next one starting
    pub reset_delay_secs: f64,
}

impl Pacing {
    /// No pauses at all, for headless training.
    pub const fn instant() -> Self {
        Self {
            decision_delay_secs: 0.0,
            settle_delay_secs: 0.0,
            reset_delay_secs: 0.0,
        }
    }

    pub fn decision_delay(&self) -> Duration {
        seconds(self.decision_delay_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        seconds(self.settle_delay_secs)
    }

    pub fn reset_delay(&self) -> Duration {
        seconds(self.reset_delay_secs)
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            decision_delay_secs: 0.1,
            settle_delay_secs: 1.5,
            reset_delay_secs: 2.0,
        }
    }
}

fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or_default()
}

/// Everything that parameterises a match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchRules {
    pub stats: FighterStats,
    pub combat: CombatRules,
    pub geometry: FieldGeometry,
    pub rewards: RewardWeights,
    pub sensors: SensorConfig,
    pub pacing: Pacing,
    /// Automated self-play: finished matches request a reset
    pub self_play: bool,
}

/// Arbiter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnState {
    PlayerTurn,
    EnemyTurn,
    GameOver { winner: Side },
}

impl TurnState {
    /// Side whose turn it is, if the match is still running.
    pub fn actor(&self) -> Option<Side> {
        match self {
            TurnState::PlayerTurn => Some(Side::Player),
            TurnState::EnemyTurn => Some(Side::Enemy),
            TurnState::GameOver { .. } => None,
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self, TurnState::GameOver { .. })
    }

    fn turn_of(side: Side) -> Self {
        match side {
            Side::Player => TurnState::PlayerTurn,
            Side::Enemy => TurnState::EnemyTurn,
        }
    }
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnState::PlayerTurn => write!(f, "{}'s turn", Side::Player),
            TurnState::EnemyTurn => write!(f, "{}'s turn", Side::Enemy),
            TurnState::GameOver { winner } => write!(f, "{winner} wins"),
        }
    }
}

/// Per-turn record taken before the actor decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnContext {
    pub actor: Side,
    pub player_hp: i32,
    pub enemy_hp: i32,
    pub situation: Situation,
}

impl TurnContext {
    pub fn hp_at_start(&self, side: Side) -> i32 {
        match side {
            Side::Player => self.player_hp,
            Side::Enemy => self.enemy_hp,
        }
    }
}

/// A turn that has been executed but not yet scored.
#[derive(Debug, Clone)]
pub struct PendingSettle {
    context: TurnContext,
    chosen: Option<usize>,
    executed: Option<usize>,
    illegal_choice: bool,
    effects: TurnEffects,
    delay: Duration,
}

impl PendingSettle {
    pub fn context(&self) -> &TurnContext {
        &self.context
    }

    /// Index the learner asked for.
    pub fn chosen(&self) -> Option<usize> {
        self.chosen
    }

    /// Index that actually ran; `None` for a no-op turn.
    pub fn executed(&self) -> Option<usize> {
        self.executed
    }

    pub fn illegal_choice(&self) -> bool {
        self.illegal_choice
    }

    /// How long a rendering host should wait before settling.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Everything that happened during one settled turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnReport {
    /// 1-based turn number within the match
    pub turn: usize,
    pub actor: Side,
    pub situation: SituationKey,
    pub chosen: Option<usize>,
    pub executed: Option<usize>,
    pub action_name: Option<String>,
    pub illegal_choice: bool,
    pub log: Vec<String>,
    pub reward: ShapedReward,
    pub player_hp: i32,
    pub enemy_hp: i32,
    pub regime: DistanceRegime,
    pub state: TurnState,
    /// Set when a self-play match ended and should be reset after this pause
    pub reset_after: Option<Duration>,
}

/// One match between two fighters.
#[derive(Debug)]
pub struct MatchSession {
    rules: MatchRules,
    registry: ActionRegistry,
    legality: LegalityFilter,
    shaper: RewardShaper,
    player: Combatant,
    enemy: Combatant,
    field: Battlefield,
    state: TurnState,
    turn: usize,
    pending: Option<PendingSettle>,
    rng: StdRng,
}

impl MatchSession {
    /// Start a match with the given rules and action catalogue.
    pub fn new(rules: MatchRules, registry: ActionRegistry) -> Self {
        let legality = LegalityFilter::new(&registry, &rules.combat);
        let shaper = RewardShaper::new(rules.rewards.clone());
        Self {
            player: Combatant::new(&rules.stats),
            enemy: Combatant::new(&rules.stats),
            field: Battlefield::new(rules.geometry),
            state: TurnState::PlayerTurn,
            turn: 0,
            pending: None,
            rng: StdRng::from_rng(&mut rand::rng()),
            rules,
            registry,
            legality,
            shaper,
        }
    }

    /// Start a match with the standard six actions.
    pub fn standard(rules: MatchRules) -> Self {
        Self::new(rules, ActionRegistry::standard())
    }

    /// Make damage rolls and fallback picks reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn legality(&self) -> &LegalityFilter {
        &self.legality
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    pub fn winner(&self) -> Option<Side> {
        match self.state {
            TurnState::GameOver { winner } => Some(winner),
            _ => None,
        }
    }

    pub fn current_actor(&self) -> Option<Side> {
        self.state.actor()
    }

    /// Number of settled turns in this match.
    pub fn turn_number(&self) -> usize {
        self.turn
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    /// Direct access for staging scenarios between turns.
    pub fn combatant_mut(&mut self, side: Side) -> &mut Combatant {
        match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        }
    }

    pub fn field(&self) -> &Battlefield {
        &self.field
    }

    /// Direct access for staging scenarios between turns.
    pub fn field_mut(&mut self) -> &mut Battlefield {
        &mut self.field
    }

    pub fn regime(&self) -> DistanceRegime {
        self.field.regime()
    }

    pub fn pending(&self) -> Option<&PendingSettle> {
        self.pending.as_ref()
    }

    pub fn decision_delay(&self) -> Duration {
        self.rules.pacing.decision_delay()
    }

    /// Read the four sensors for `side`.
    pub fn sense(&self, side: Side) -> Situation {
        Situation::sense(self.combatant(side), self.regime(), &self.rules.sensors)
    }

    /// First half of a turn: snapshot, sense, decide, validate and execute.
    ///
    /// Returns the delay a rendering host should wait before calling
    /// [`settle`](Self::settle) with the same learner.
    ///
    /// # Errors
    ///
    /// - [`Error::MatchOver`] once the match has ended
    /// - [`Error::SettlePending`] if the previous turn was not settled
    /// - [`Error::EmptyActionSet`] if the learner has nothing to choose from
    pub fn begin_turn(&mut self, learner: &mut dyn Learner) -> Result<Duration> {
        let actor = self.state.actor().ok_or(Error::MatchOver)?;
        if self.pending.is_some() {
            return Err(Error::SettlePending);
        }

        let context = TurnContext {
            actor,
            player_hp: self.player.hp(),
            enemy_hp: self.enemy.hp(),
            situation: self.sense(actor),
        };
        let regime = self.regime();

        let chosen = match learner.select_action(&context.situation, self.registry.count()) {
            Ok(index) => Some(index),
            Err(Error::EmptyActionSet) => return Err(Error::EmptyActionSet),
            Err(err) => {
                warn!("{} failed to choose an action: {err}", learner.name());
                None
            }
        };

        let legal = chosen.is_some_and(|index| {
            self.legality
                .is_legal(index, self.combatant(actor), regime)
        });
        let executed = if legal {
            chosen
        } else {
            debug!(
                "{actor} chose illegal action {chosen:?} in {}",
                context.situation
            );
            learner.punish(&context.situation, self.rules.rewards.legality_penalty)?;
            let options = self.legality.legal_actions(self.combatant(actor), regime);
            options.choose(&mut self.rng).copied()
        };

        let mut effects = TurnEffects::default();
        match executed {
            Some(index) => self.execute(actor, index, &mut effects),
            None => effects.log.push(format!("{actor} passes")),
        }
        for line in &effects.log {
            debug!("{line}");
        }

        if self.rules.rewards.action_shaping {
            for &hint in &effects.shaping {
                RewardSignal::from_signed(hint).deliver(learner, &context.situation)?;
            }
        }

        let delay = self.rules.pacing.settle_delay();
        self.pending = Some(PendingSettle {
            context,
            chosen,
            executed,
            illegal_choice: !legal,
            effects,
            delay,
        });
        Ok(delay)
    }

    /// Second half of a turn: land projectiles, score, decay armor and check
    /// for the end of the match.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoPendingSettle`] if no turn has begun.
    pub fn settle(&mut self, learner: &mut dyn Learner) -> Result<TurnReport> {
        let PendingSettle {
            context,
            chosen,
            executed,
            illegal_choice,
            mut effects,
            ..
        } = self.pending.take().ok_or(Error::NoPendingSettle)?;
        let actor = context.actor;
        let target = actor.opponent();

        let armor_factor = self.rules.combat.armor_factor;
        for &impact in &effects.pending_impacts {
            let dealt = self.combatant_mut(target).take_damage(impact, armor_factor);
            let line = format!("Arrow hits {target} for {dealt}");
            debug!("{line}");
            effects.log.push(line);
        }

        let delta = TurnDelta {
            actor_hp_start: context.hp_at_start(actor),
            actor_hp_end: self.combatant(actor).hp(),
            opponent_hp_start: context.hp_at_start(target),
            opponent_hp_end: self.combatant(target).hp(),
        };
        let reward = self.shaper.score(&delta);
        debug!(
            "{actor} scored {:+.2} in {}",
            reward.signal.signed(),
            context.situation
        );
        reward.signal.deliver(learner, &context.situation)?;

        self.combatant_mut(actor).on_turn_end();
        self.turn += 1;

        let winner = if self.player.is_defeated() {
            Some(Side::Enemy)
        } else if self.enemy.is_defeated() {
            Some(Side::Player)
        } else {
            None
        };
        let reset_after = match winner {
            Some(winner) => {
                self.state = TurnState::GameOver { winner };
                let line = format!("{winner} wins!");
                info!("{line}");
                effects.log.push(line);
                self.rules
                    .self_play
                    .then(|| self.rules.pacing.reset_delay())
            }
            None => {
                self.state = TurnState::turn_of(target);
                None
            }
        };

        Ok(TurnReport {
            turn: self.turn,
            actor,
            situation: context.situation.encode(),
            chosen,
            executed,
            action_name: executed
                .and_then(|index| self.registry.name(index))
                .map(str::to_string),
            illegal_choice,
            log: effects.log,
            reward,
            player_hp: self.player.hp(),
            enemy_hp: self.enemy.hp(),
            regime: self.regime(),
            state: self.state,
            reset_after,
        })
    }

    /// Run a whole turn without pausing, dispatching to whichever learner
    /// controls the acting side.
    pub fn play_turn<'a>(
        &mut self,
        player: &'a mut dyn Learner,
        enemy: &'a mut dyn Learner,
    ) -> Result<TurnReport> {
        let learner = match self.state.actor() {
            Some(Side::Player) => player,
            Some(Side::Enemy) => enemy,
            None => return Err(Error::MatchOver),
        };
        self.begin_turn(&mut *learner)?;
        self.settle(learner)
    }

    /// Start a fresh match with the same rules, catalogue and RNG stream.
    pub fn reset(&mut self) {
        self.player = Combatant::new(&self.rules.stats);
        self.enemy = Combatant::new(&self.rules.stats);
        self.field.reset();
        self.state = TurnState::PlayerTurn;
        self.turn = 0;
        self.pending = None;
        debug!("match reset");
    }

    fn execute(&mut self, actor: Side, index: usize, effects: &mut TurnEffects) {
        let (me, them) = match actor {
            Side::Player => (&mut self.player, &mut self.enemy),
            Side::Enemy => (&mut self.enemy, &mut self.player),
        };
        let mut ctx = ActionContext {
            side: actor,
            actor: me,
            opponent: them,
            field: &mut self.field,
            rules: &self.rules.combat,
            rng: &mut self.rng,
            effects,
        };
        if let Err(err) = self.registry.invoke(index, &mut ctx, &[]) {
            warn!("{actor} could not perform action {index}: {err}");
        }
    }
}
