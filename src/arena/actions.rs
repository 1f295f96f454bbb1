//! Action catalogue and dispatch
//!
//! Every move a fighter can make is an [`ActionKind`]. The [`ActionRegistry`]
//! assigns each registered action a stable integer index; the learner, the
//! legality filter and the Q-table all refer to actions by that index.

use std::fmt;

use rand::{Rng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::{combatant::Combatant, field::Battlefield};
use crate::{Error, Result, types::Side};

/// Half-open integer damage interval `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRange {
    pub min: i32,
    pub max: i32,
}

impl DamageRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Roll a damage value. An empty range yields `min`.
    pub fn roll(&self, rng: &mut StdRng) -> i32 {
        if self.max <= self.min {
            self.min
        } else {
            rng.random_range(self.min..self.max)
        }
    }

    pub fn contains(&self, value: i32) -> bool {
        (self.min..self.max).contains(&value)
    }
}

/// Costs and magnitudes of every action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatRules {
    pub move_cost: i32,
    pub ranged_cost: i32,
    pub melee_cost: i32,
    pub guard_cost: i32,
    pub ranged_damage: DamageRange,
    pub melee_damage: DamageRange,
    pub recover_mana: i32,
    pub recover_hp: i32,
    pub guard_turns: u32,
    /// Incoming damage multiplier while armor is active
    pub armor_factor: f64,
    /// Fraction of max HP under which a fighter counts as low on health
    pub low_health_fraction: f64,
    /// Mana under which resting is considered worthwhile
    pub low_mana: i32,
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            move_cost: 4,
            ranged_cost: 20,
            melee_cost: 10,
            guard_cost: 25,
            ranged_damage: DamageRange::new(15, 21),
            melee_damage: DamageRange::new(10, 16),
            recover_mana: 20,
            recover_hp: 5,
            guard_turns: 2,
            armor_factor: 0.8,
            low_health_fraction: 0.4,
            low_mana: 20,
        }
    }
}

/// The fixed set of moves a gladiator knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Advance,
    Retreat,
    RangedAttack,
    MeleeAttack,
    Recover,
    Guard,
}

impl ActionKind {
    /// Registration order of the standard registry.
    pub const ALL: [ActionKind; 6] = [
        ActionKind::Advance,
        ActionKind::Retreat,
        ActionKind::RangedAttack,
        ActionKind::MeleeAttack,
        ActionKind::Recover,
        ActionKind::Guard,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ActionKind::Advance => "Advance",
            ActionKind::Retreat => "Retreat",
            ActionKind::RangedAttack => "RangedAttack",
            ActionKind::MeleeAttack => "MeleeAttack",
            ActionKind::Recover => "Recover",
            ActionKind::Guard => "Guard",
        }
    }

    /// Built-in handler for this kind.
    pub fn handler(self) -> ActionHandler {
        match self {
            ActionKind::Advance => advance,
            ActionKind::Retreat => retreat,
            ActionKind::RangedAttack => ranged_attack,
            ActionKind::MeleeAttack => melee_attack,
            ActionKind::Recover => recover,
            ActionKind::Guard => guard,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Side effects collected while an action runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnEffects {
    /// Human-readable battle-log lines
    pub log: Vec<String>,
    /// Signed per-action learning hints (positive rewards, negative punishes)
    pub shaping: Vec<f64>,
    /// Projectile damage that lands on the opponent when the turn settles
    pub pending_impacts: Vec<i32>,
}

/// Everything an action handler is allowed to touch.
pub struct ActionContext<'a> {
    pub side: Side,
    pub actor: &'a mut Combatant,
    pub opponent: &'a mut Combatant,
    pub field: &'a mut Battlefield,
    pub rules: &'a CombatRules,
    pub rng: &'a mut StdRng,
    pub effects: &'a mut TurnEffects,
}

impl ActionContext<'_> {
    fn log(&mut self, line: String) {
        self.effects.log.push(line);
    }

    fn actor_is_low(&self) -> bool {
        self.actor.is_low_health(self.rules.low_health_fraction)
    }
}

/// Handler signature: mutate the context, return nothing.
pub type ActionHandler = fn(&mut ActionContext<'_>, &[f64]);

/// A registered action.
#[derive(Clone)]
pub struct ActionDefinition {
    pub kind: ActionKind,
    pub name: String,
    pub arity: usize,
    handler: ActionHandler,
}

impl fmt::Debug for ActionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDefinition")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Ordered catalogue of invocable actions.
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    actions: Vec<ActionDefinition>,
}

impl ActionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every [`ActionKind`] in [`ActionKind::ALL`] order.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for kind in ActionKind::ALL {
            registry.register(kind, kind.name(), kind.handler(), 0);
        }
        registry
    }

    /// Append an action and return its index.
    pub fn register(
        &mut self,
        kind: ActionKind,
        name: impl Into<String>,
        handler: ActionHandler,
        arity: usize,
    ) -> usize {
        self.actions.push(ActionDefinition {
            kind,
            name: name.into(),
            arity,
            handler,
        });
        self.actions.len() - 1
    }

    /// Run the handler registered at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ActionOutOfRange`] if nothing is registered at `index`.
    pub fn invoke(&self, index: usize, ctx: &mut ActionContext<'_>, args: &[f64]) -> Result<()> {
        let definition = self.get(index)?;
        (definition.handler)(ctx, args);
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&ActionDefinition> {
        self.actions.get(index).ok_or(Error::ActionOutOfRange {
            index,
            count: self.actions.len(),
        })
    }

    pub fn kind(&self, index: usize) -> Option<ActionKind> {
        self.actions.get(index).map(|a| a.kind)
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.actions.get(index).map(|a| a.name.as_str())
    }

    /// Index of the first action of the given kind.
    pub fn index_of(&self, kind: ActionKind) -> Option<usize> {
        self.actions.iter().position(|a| a.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionDefinition> {
        self.actions.iter()
    }
}

fn advance(ctx: &mut ActionContext<'_>, _args: &[f64]) {
    if !ctx.actor.spend_mana(ctx.rules.move_cost) {
        return;
    }
    ctx.field.advance(ctx.side);
    let hint = if ctx.actor_is_low() { -0.2 } else { 0.2 };
    ctx.effects.shaping.push(hint);
    ctx.log(format!("{} advances", ctx.side));
}

fn retreat(ctx: &mut ActionContext<'_>, _args: &[f64]) {
    if !ctx.actor.spend_mana(ctx.rules.move_cost) {
        return;
    }
    ctx.field.retreat(ctx.side);
    let hint = if ctx.actor_is_low() { 0.5 } else { -0.2 };
    ctx.effects.shaping.push(hint);
    ctx.log(format!("{} falls back", ctx.side));
}

fn ranged_attack(ctx: &mut ActionContext<'_>, _args: &[f64]) {
    if ctx.actor.ammo() == 0 || ctx.actor.mana() < ctx.rules.ranged_cost {
        return;
    }
    ctx.actor.use_ammo();
    ctx.actor.spend_mana(ctx.rules.ranged_cost);
    let damage = ctx.rules.ranged_damage.roll(ctx.rng);
    ctx.effects.pending_impacts.push(damage);
    ctx.effects.shaping.push(0.1);
    ctx.log(format!("{} looses an arrow", ctx.side));
}

fn melee_attack(ctx: &mut ActionContext<'_>, _args: &[f64]) {
    if !ctx.actor.spend_mana(ctx.rules.melee_cost) {
        return;
    }
    let damage = ctx.rules.melee_damage.roll(ctx.rng);
    let dealt = ctx.opponent.take_damage(damage, ctx.rules.armor_factor);
    ctx.effects.shaping.push(0.2);
    ctx.log(format!("{} strikes with the sword for {dealt}", ctx.side));
}

fn recover(ctx: &mut ActionContext<'_>, _args: &[f64]) {
    // Health is judged before resting, mana after
    let was_low = ctx.actor_is_low();
    ctx.actor.restore_mana(ctx.rules.recover_mana);
    ctx.actor.restore_hp(ctx.rules.recover_hp);
    let worthwhile = was_low || ctx.actor.mana() < ctx.rules.low_mana;
    ctx.effects.shaping.push(if worthwhile { 0.5 } else { -0.1 });
    ctx.log(format!("{} rests", ctx.side));
}

fn guard(ctx: &mut ActionContext<'_>, _args: &[f64]) {
    if !ctx.actor.spend_mana(ctx.rules.guard_cost) {
        return;
    }
    ctx.actor.activate_armor(ctx.rules.guard_turns);
    if ctx.actor_is_low() {
        ctx.effects.shaping.push(0.3);
    }
    ctx.log(format!("{} raises the guard", ctx.side));
}
