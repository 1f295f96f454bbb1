//! End-to-end turn scenarios driven through the public arbiter API

mod common;

use common::{seeded_session, set_hp};
use gladiator::{
    Error,
    arena::{DistanceRegime, MatchSession, RewardSignal, TurnState},
    pipeline::ScriptedLearner,
    types::Side,
};
use statrs::distribution::{ChiSquared, ContinuousCDF};

const ADVANCE: usize = 0;
const RANGED: usize = 2;
const MELEE: usize = 3;
const GUARD: usize = 5;

#[test]
fn test_ranged_shot_from_far() {
    let mut session = seeded_session(11);
    assert_eq!(session.regime(), DistanceRegime::Far);
    let mut red = ScriptedLearner::new("red", [RANGED]);

    session.begin_turn(&mut red).unwrap();
    // The arrow is still in flight until the turn settles
    assert_eq!(session.combatant(Side::Enemy).hp(), 100);
    assert_eq!(session.combatant(Side::Player).ammo(), 9);
    assert_eq!(session.combatant(Side::Player).mana(), 60);

    let report = session.settle(&mut red).unwrap();
    let dealt = 100 - report.enemy_hp;
    assert!((15..21).contains(&dealt), "dealt {dealt}");
    assert_eq!(report.executed, Some(RANGED));
    assert!(!report.illegal_choice);
    assert_eq!(report.situation.as_str(), "2_1_1_5");
    assert!(report.log.iter().any(|line| line.starts_with("Arrow hits Blue")));

    // Shaping hint first, then the turn reward: 3 per point dealt plus the HP gap
    let signals = red.signals();
    assert_eq!(signals.len(), 2);
    assert!((signals[0] - 0.1).abs() < 1e-9);
    assert!((signals[1] - 3.2 * f64::from(dealt)).abs() < 1e-9);
    assert_eq!(report.state, TurnState::EnemyTurn);
}

#[test]
fn test_killing_blow_ends_the_match() {
    let mut session = seeded_session(5);
    set_hp(&mut session, Side::Enemy, 5);
    let mut red = ScriptedLearner::new("red", [RANGED]);

    let report = session.play_turn(&mut red, &mut ScriptedLearner::new("blue", [GUARD])).unwrap();
    assert_eq!(report.reward.signal, RewardSignal::Reward(150.0));
    assert!(report.reward.terminal);
    assert_eq!(
        report.state,
        TurnState::GameOver {
            winner: Side::Player
        }
    );
    assert_eq!(session.winner(), Some(Side::Player));
    assert!(report.log.last().unwrap().contains("Red wins"));
    assert_eq!(report.reset_after, None);

    assert!(matches!(session.begin_turn(&mut red), Err(Error::MatchOver)));
}

#[test]
fn test_illegal_melee_is_punished_then_replaced() {
    let mut session = seeded_session(3);
    let mut red = ScriptedLearner::new("red", [MELEE]);

    let report = session.play_turn(&mut red, &mut ScriptedLearner::new("blue", [GUARD])).unwrap();
    assert!(report.illegal_choice);
    assert_eq!(report.chosen, Some(MELEE));
    assert!(report.executed.is_some_and(|index| index != MELEE));

    let signals = red.signals();
    assert_eq!(signals[0], -10.0);
    assert_eq!(signals.iter().filter(|&&s| s == -10.0).count(), 1);
    // Swords never reach across the arena
    assert_eq!(session.combatant(Side::Enemy).hp(), 100);
}

#[test]
fn test_closing_in_enables_melee() {
    let mut session = seeded_session(8);
    let mut red = ScriptedLearner::new("red", [ADVANCE, ADVANCE, ADVANCE, ADVANCE, MELEE]);
    let mut blue = ScriptedLearner::new("blue", [ADVANCE, ADVANCE, ADVANCE, GUARD]);

    let mut regimes = Vec::new();
    for _ in 0..8 {
        let report = session.play_turn(&mut red, &mut blue).unwrap();
        regimes.push(report.regime);
    }
    assert_eq!(regimes[0], DistanceRegime::Far);
    assert_eq!(regimes[5], DistanceRegime::Mid);
    assert_eq!(session.regime(), DistanceRegime::Close);
    assert!(session.combatant(Side::Enemy).armor_active());
    assert!(session.field().separation() >= session.field().geometry().min_separation);

    // Red's fifth action is the sword at close range
    let report = session.play_turn(&mut red, &mut blue).unwrap();
    assert_eq!(report.actor, Side::Player);
    assert_eq!(report.executed, Some(MELEE));
    assert!(!report.illegal_choice);
    assert!(report.enemy_hp < 100);
}

#[test]
fn test_self_play_requests_reset_and_reset_restores() {
    let mut rules = seeded_session(21).rules().clone();
    rules.self_play = true;
    let mut session = MatchSession::standard(rules).with_seed(21);
    set_hp(&mut session, Side::Enemy, 1);

    let mut red = ScriptedLearner::new("red", [RANGED]);
    let mut blue = ScriptedLearner::new("blue", [GUARD]);
    let report = session.play_turn(&mut red, &mut blue).unwrap();
    assert!(report.reset_after.is_some());

    session.reset();
    assert_eq!(session.state(), TurnState::PlayerTurn);
    assert_eq!(session.turn_number(), 0);
    assert_eq!(session.combatant(Side::Enemy).hp(), 100);
    assert_eq!(session.combatant(Side::Player).ammo(), 10);
    assert_eq!(session.regime(), DistanceRegime::Far);
}

#[test]
fn test_illegal_choice_replacement_is_uniform() {
    const TRIALS: usize = 4000;
    // Legal from Far with full HP: Advance, RangedAttack, Recover, Guard
    let legal = [ADVANCE, RANGED, 4, GUARD];
    let mut session = seeded_session(29);
    let mut red = ScriptedLearner::new("red", [MELEE]);
    let mut counts = [0usize; 6];

    for _ in 0..TRIALS {
        session.begin_turn(&mut red).unwrap();
        let executed = session.pending().unwrap().executed().unwrap();
        assert!(legal.contains(&executed), "executed {executed}");
        counts[executed] += 1;
        session.reset();
    }

    let expected = TRIALS as f64 / legal.len() as f64;
    let statistic: f64 = legal
        .iter()
        .map(|&index| {
            let diff = counts[index] as f64 - expected;
            diff * diff / expected
        })
        .sum();
    let critical = ChiSquared::new((legal.len() - 1) as f64)
        .unwrap()
        .inverse_cdf(0.999);
    assert!(
        statistic < critical,
        "chi-square {statistic:.2} >= {critical:.2}, counts {counts:?}"
    );
}
