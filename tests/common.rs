//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use gladiator::{
    arena::{Combatant, MatchRules, MatchSession, Pacing, Situation},
    types::Side,
};

/// Session with default rules, no pacing and a fixed seed.
pub fn seeded_session(seed: u64) -> MatchSession {
    let rules = MatchRules {
        pacing: Pacing::instant(),
        ..MatchRules::default()
    };
    MatchSession::standard(rules).with_seed(seed)
}

/// Replace a fighter's HP, keeping everything else.
pub fn set_hp(session: &mut MatchSession, side: Side, hp: i32) {
    let weakened = session.combatant(side).clone().with_hp(hp);
    *session.combatant_mut(side) = weakened;
}

/// Build a situation directly from sensor values.
pub fn situation(distance: u8, sufficient_mana: bool, has_ammo: bool, hp_bucket: i32) -> Situation {
    Situation {
        distance,
        sufficient_mana,
        has_ammo,
        hp_bucket,
    }
}

/// Full-health fighter as the default stats create it.
pub fn fresh_fighter() -> Combatant {
    Combatant::new(&MatchRules::default().stats)
}
