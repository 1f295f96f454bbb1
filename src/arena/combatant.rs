//! Resource state of a single fighter

use serde::{Deserialize, Serialize};

/// Starting and maximum resources for a fighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FighterStats {
    pub max_hp: i32,
    pub max_mana: i32,
    /// Mana at match start, clamped to `max_mana`
    pub start_mana: i32,
    pub max_ammo: u32,
}

impl Default for FighterStats {
    fn default() -> Self {
        Self {
            max_hp: 100,
            max_mana: 120,
            start_mana: 80,
            max_ammo: 10,
        }
    }
}

/// Mutable resource state for one fighter.
///
/// HP and mana always stay within `[0, max]`. Armor is active exactly while
/// `armor_turns_remaining > 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    hp: i32,
    max_hp: i32,
    mana: i32,
    max_mana: i32,
    ammo: u32,
    armor_turns_remaining: u32,
}

impl Combatant {
    /// Create a fighter at full health with starting mana and a full quiver.
    pub fn new(stats: &FighterStats) -> Self {
        let max_hp = stats.max_hp.max(0);
        let max_mana = stats.max_mana.max(0);
        Self {
            hp: max_hp,
            max_hp,
            mana: stats.start_mana.clamp(0, max_mana),
            max_mana,
            ammo: stats.max_ammo,
            armor_turns_remaining: 0,
        }
    }

    /// Override current HP (clamped). Used to stage scenarios.
    pub fn with_hp(mut self, hp: i32) -> Self {
        self.hp = hp.clamp(0, self.max_hp);
        self
    }

    /// Override current mana (clamped). Used to stage scenarios.
    pub fn with_mana(mut self, mana: i32) -> Self {
        self.mana = mana.clamp(0, self.max_mana);
        self
    }

    /// Override remaining ammunition. Used to stage scenarios.
    pub fn with_ammo(mut self, ammo: u32) -> Self {
        self.ammo = ammo;
        self
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    pub fn mana(&self) -> i32 {
        self.mana
    }

    pub fn max_mana(&self) -> i32 {
        self.max_mana
    }

    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn armor_active(&self) -> bool {
        self.armor_turns_remaining > 0
    }

    pub fn armor_turns_remaining(&self) -> u32 {
        self.armor_turns_remaining
    }

    pub fn is_defeated(&self) -> bool {
        self.hp <= 0
    }

    /// True when HP is strictly below `fraction` of max HP.
    pub fn is_low_health(&self, fraction: f64) -> bool {
        f64::from(self.hp) < f64::from(self.max_hp) * fraction
    }

    /// Spend mana if enough is available.
    ///
    /// Returns `false` and leaves the fighter untouched when `amount` exceeds
    /// the current mana.
    pub fn spend_mana(&mut self, amount: i32) -> bool {
        if amount < 0 || self.mana < amount {
            return false;
        }
        self.mana -= amount;
        true
    }

    /// Consume one arrow. Returns `false` when the quiver is empty.
    pub fn use_ammo(&mut self) -> bool {
        if self.ammo == 0 {
            return false;
        }
        self.ammo -= 1;
        true
    }

    pub fn restore_mana(&mut self, amount: i32) {
        self.mana = self.mana.saturating_add(amount.max(0)).min(self.max_mana);
    }

    pub fn restore_hp(&mut self, amount: i32) {
        self.hp = self.hp.saturating_add(amount.max(0)).min(self.max_hp);
    }

    /// Apply incoming damage and return the HP actually lost.
    ///
    /// Active armor scales the hit by `armor_factor`, rounded half-to-even.
    /// A fighter already at zero HP ignores further hits.
    pub fn take_damage(&mut self, amount: i32, armor_factor: f64) -> i32 {
        if self.hp <= 0 || amount <= 0 {
            return 0;
        }
        let effective = if self.armor_active() {
            (f64::from(amount) * armor_factor).round_ties_even() as i32
        } else {
            amount
        };
        let before = self.hp;
        self.hp = (self.hp - effective).max(0);
        before - self.hp
    }

    /// Raise the guard for `turns` of the owner's turns.
    pub fn activate_armor(&mut self, turns: u32) {
        self.armor_turns_remaining = turns;
    }

    /// End-of-turn decay of the armor timer.
    pub fn on_turn_end(&mut self) {
        self.armor_turns_remaining = self.armor_turns_remaining.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fighter() -> Combatant {
        Combatant::new(&FighterStats::default())
    }

    #[test]
    fn test_new_fighter_resources() {
        let c = fighter();
        assert_eq!(c.hp(), 100);
        assert_eq!(c.mana(), 80);
        assert_eq!(c.ammo(), 10);
        assert!(!c.armor_active());
    }

    #[test]
    fn test_start_mana_clamped_to_max() {
        let stats = FighterStats {
            start_mana: 500,
            ..FighterStats::default()
        };
        assert_eq!(Combatant::new(&stats).mana(), 120);
    }

    #[test]
    fn test_spend_mana_rejects_overdraft() {
        let mut c = fighter().with_mana(5);
        assert!(!c.spend_mana(10));
        assert_eq!(c.mana(), 5);
        assert!(c.spend_mana(5));
        assert_eq!(c.mana(), 0);
    }

    #[test]
    fn test_restore_is_clamped() {
        let mut c = fighter().with_hp(98).with_mana(110);
        c.restore_hp(5);
        c.restore_mana(20);
        assert_eq!(c.hp(), 100);
        assert_eq!(c.mana(), 120);
    }

    #[test]
    fn test_restore_huge_amount_saturates() {
        let mut c = fighter().with_hp(10).with_mana(0);
        c.restore_hp(i32::MAX);
        c.restore_mana(i32::MAX);
        assert_eq!(c.hp(), 100);
        assert_eq!(c.mana(), 120);
    }

    #[test]
    fn test_armor_reduces_damage() {
        let mut c = fighter();
        c.activate_armor(2);
        // 15 * 0.8 = 12
        assert_eq!(c.take_damage(15, 0.8), 12);
        assert_eq!(c.hp(), 88);
    }

    #[test]
    fn test_damage_clamps_at_zero_and_ignores_dead() {
        let mut c = fighter().with_hp(7);
        assert_eq!(c.take_damage(20, 0.8), 7);
        assert_eq!(c.hp(), 0);
        assert!(c.is_defeated());
        assert_eq!(c.take_damage(20, 0.8), 0);
    }

    #[test]
    fn test_armor_timer_decays() {
        let mut c = fighter();
        c.activate_armor(2);
        c.on_turn_end();
        assert!(c.armor_active());
        c.on_turn_end();
        assert!(!c.armor_active());
        c.on_turn_end();
        assert_eq!(c.armor_turns_remaining(), 0);
    }

    #[test]
    fn test_low_health_threshold() {
        assert!(fighter().with_hp(39).is_low_health(0.4));
        assert!(!fighter().with_hp(40).is_low_health(0.4));
    }
}
