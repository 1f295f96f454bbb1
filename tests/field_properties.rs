//! Battlefield movement invariants under arbitrary move sequences

use gladiator::{
    arena::{Battlefield, DistanceRegime, FieldGeometry},
    types::Side,
};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Step {
    Advance(Side),
    Retreat(Side),
}

fn side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Player), Just(Side::Enemy)]
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![side().prop_map(Step::Advance), side().prop_map(Step::Retreat)]
}

proptest! {
    #[test]
    fn prop_regime_always_matches_separation(steps in prop::collection::vec(step(), 0..60)) {
        let geometry = FieldGeometry::default();
        let mut field = Battlefield::new(geometry);

        for step in steps {
            match step {
                Step::Advance(side) => field.advance(side),
                Step::Retreat(side) => field.retreat(side),
            }

            let separation = field.separation();
            prop_assert_eq!(field.regime(), DistanceRegime::from_separation(separation));
            prop_assert!(separation >= geometry.min_separation - 1e-9);
            prop_assert!(field.position(Side::Player) < field.position(Side::Enemy));
            prop_assert!(field.position(Side::Player) >= -geometry.map_boundary);
            prop_assert!(field.position(Side::Enemy) <= geometry.map_boundary);
        }
    }

    #[test]
    fn prop_reset_returns_to_the_edges(steps in prop::collection::vec(step(), 1..30)) {
        let mut field = Battlefield::new(FieldGeometry::default());
        for step in steps {
            match step {
                Step::Advance(side) => field.advance(side),
                Step::Retreat(side) => field.retreat(side),
            }
        }
        field.reset();
        prop_assert_eq!(&field, &Battlefield::new(FieldGeometry::default()));
        prop_assert_eq!(field.regime(), DistanceRegime::Far);
    }
}

#[test]
fn test_boundaries_fall_into_the_closer_regime() {
    assert_eq!(DistanceRegime::from_separation(2.5), DistanceRegime::Close);
    assert_eq!(DistanceRegime::from_separation(2.6), DistanceRegime::Mid);
    assert_eq!(DistanceRegime::from_separation(7.0), DistanceRegime::Mid);
    assert_eq!(DistanceRegime::from_separation(7.01), DistanceRegime::Far);
}
