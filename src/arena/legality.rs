//! Precondition checks for actions

use super::{
    actions::{ActionKind, ActionRegistry, CombatRules},
    combatant::Combatant,
    field::DistanceRegime,
};

/// Whether `kind` may be performed by `combatant` at the given range.
pub fn kind_is_legal(
    kind: ActionKind,
    combatant: &Combatant,
    regime: DistanceRegime,
    rules: &CombatRules,
) -> bool {
    match kind {
        ActionKind::Advance => {
            regime != DistanceRegime::Close && combatant.mana() >= rules.move_cost
        }
        ActionKind::Retreat => regime != DistanceRegime::Far && combatant.mana() >= rules.move_cost,
        ActionKind::RangedAttack => {
            regime != DistanceRegime::Close
                && combatant.ammo() > 0
                && combatant.mana() >= rules.ranged_cost
        }
        ActionKind::MeleeAttack => {
            regime == DistanceRegime::Close && combatant.mana() >= rules.melee_cost
        }
        ActionKind::Recover => {
            combatant.hp() < combatant.max_hp() || combatant.mana() < combatant.max_mana()
        }
        ActionKind::Guard => combatant.mana() >= rules.guard_cost,
    }
}

/// Index-based legality predicate bound to one registry's ordering.
#[derive(Debug, Clone)]
pub struct LegalityFilter {
    kinds: Vec<ActionKind>,
    rules: CombatRules,
}

impl LegalityFilter {
    pub fn new(registry: &ActionRegistry, rules: &CombatRules) -> Self {
        Self {
            kinds: registry.iter().map(|a| a.kind).collect(),
            rules: rules.clone(),
        }
    }

    /// Unknown indices are never legal.
    pub fn is_legal(&self, index: usize, combatant: &Combatant, regime: DistanceRegime) -> bool {
        self.kinds
            .get(index)
            .is_some_and(|&kind| kind_is_legal(kind, combatant, regime, &self.rules))
    }

    /// All legal indices in registry order.
    pub fn legal_actions(&self, combatant: &Combatant, regime: DistanceRegime) -> Vec<usize> {
        (0..self.kinds.len())
            .filter(|&index| self.is_legal(index, combatant, regime))
            .collect()
    }
}
