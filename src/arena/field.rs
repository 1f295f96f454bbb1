//! Battlefield geometry and the Close/Mid/Far distance regime

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Side;

/// Fixed geometry of the arena floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldGeometry {
    /// Fighters start at `-map_boundary` and `+map_boundary`
    pub map_boundary: f64,
    /// Distance covered by one Advance or Retreat
    pub step_size: f64,
    /// Advancing never brings the fighters closer than this
    pub min_separation: f64,
    /// Separations up to and including this value are Close
    pub close_threshold: f64,
    /// Separations up to and including this value (and above Close) are Mid
    pub mid_threshold: f64,
}

impl Default for FieldGeometry {
    fn default() -> Self {
        Self {
            map_boundary: 7.5,
            step_size: 2.0,
            min_separation: 1.5,
            close_threshold: DistanceRegime::CLOSE_THRESHOLD,
            mid_threshold: DistanceRegime::MID_THRESHOLD,
        }
    }
}

/// Coarse classification of the separation between the fighters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceRegime {
    Close,
    Mid,
    Far,
}

impl DistanceRegime {
    pub const CLOSE_THRESHOLD: f64 = 2.5;
    pub const MID_THRESHOLD: f64 = 7.0;

    /// Classify with the default thresholds. Boundary values fall into the
    /// closer regime.
    pub fn from_separation(separation: f64) -> Self {
        Self::classify(separation, Self::CLOSE_THRESHOLD, Self::MID_THRESHOLD)
    }

    /// Classify against explicit thresholds.
    pub fn classify(separation: f64, close_threshold: f64, mid_threshold: f64) -> Self {
        if separation <= close_threshold {
            DistanceRegime::Close
        } else if separation <= mid_threshold {
            DistanceRegime::Mid
        } else {
            DistanceRegime::Far
        }
    }

    /// Ordinal fed to the sensors: Close=0, Mid=1, Far=2.
    pub fn ordinal(self) -> u8 {
        match self {
            DistanceRegime::Close => 0,
            DistanceRegime::Mid => 1,
            DistanceRegime::Far => 2,
        }
    }
}

impl fmt::Display for DistanceRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DistanceRegime::Close => "close",
            DistanceRegime::Mid => "mid",
            DistanceRegime::Far => "far",
        };
        f.write_str(name)
    }
}

/// Positions of both fighters on a one-dimensional arena floor.
///
/// The player always stands to the left of the enemy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Battlefield {
    geometry: FieldGeometry,
    player_x: f64,
    enemy_x: f64,
    regime: DistanceRegime,
}

impl Battlefield {
    /// Place both fighters at the arena edges.
    pub fn new(geometry: FieldGeometry) -> Self {
        let mut field = Self {
            geometry,
            player_x: -geometry.map_boundary,
            enemy_x: geometry.map_boundary,
            regime: DistanceRegime::Far,
        };
        field.update_regime();
        field
    }

    /// Place the fighters at explicit coordinates. Used to stage scenarios.
    pub fn with_positions(geometry: FieldGeometry, player_x: f64, enemy_x: f64) -> Self {
        let mut field = Self {
            geometry,
            player_x,
            enemy_x,
            regime: DistanceRegime::Far,
        };
        field.update_regime();
        field
    }

    pub fn geometry(&self) -> &FieldGeometry {
        &self.geometry
    }

    pub fn position(&self, side: Side) -> f64 {
        match side {
            Side::Player => self.player_x,
            Side::Enemy => self.enemy_x,
        }
    }

    pub fn separation(&self) -> f64 {
        (self.enemy_x - self.player_x).abs()
    }

    pub fn regime(&self) -> DistanceRegime {
        self.regime
    }

    /// Step `side` toward its opponent, stopping at the minimum separation.
    pub fn advance(&mut self, side: Side) {
        let step = self.geometry.step_size;
        let gap = self.geometry.min_separation;
        match side {
            Side::Player => {
                let limit = self.enemy_x - gap;
                self.player_x = (self.player_x + step).min(limit);
            }
            Side::Enemy => {
                let limit = self.player_x + gap;
                self.enemy_x = (self.enemy_x - step).max(limit);
            }
        }
        self.update_regime();
    }

    /// Step `side` away from its opponent, stopping at the arena edge.
    pub fn retreat(&mut self, side: Side) {
        let step = self.geometry.step_size;
        let edge = self.geometry.map_boundary;
        match side {
            Side::Player => self.player_x = (self.player_x - step).max(-edge),
            Side::Enemy => self.enemy_x = (self.enemy_x + step).min(edge),
        }
        self.update_regime();
    }

    /// Return both fighters to their starting edges.
    pub fn reset(&mut self) {
        *self = Self::new(self.geometry);
    }

    fn update_regime(&mut self) {
        self.regime = DistanceRegime::classify(
            self.separation(),
            self.geometry.close_threshold,
            self.geometry.mid_threshold,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regime_boundaries_resolve_to_closer() {
        assert_eq!(DistanceRegime::from_separation(0.0), DistanceRegime::Close);
        assert_eq!(DistanceRegime::from_separation(2.5), DistanceRegime::Close);
        assert_eq!(DistanceRegime::from_separation(2.51), DistanceRegime::Mid);
        assert_eq!(DistanceRegime::from_separation(7.0), DistanceRegime::Mid);
        assert_eq!(DistanceRegime::from_separation(7.01), DistanceRegime::Far);
    }

    #[test]
    fn test_new_field_is_far() {
        let field = Battlefield::new(FieldGeometry::default());
        assert_eq!(field.separation(), 15.0);
        assert_eq!(field.regime(), DistanceRegime::Far);
    }

    #[test]
    fn test_advance_stops_at_min_separation() {
        let mut field = Battlefield::with_positions(FieldGeometry::default(), 0.0, 2.5);
        field.advance(Side::Player);
        assert_eq!(field.position(Side::Player), 1.0);
        assert_eq!(field.separation(), 1.5);
        assert_eq!(field.regime(), DistanceRegime::Close);

        field.advance(Side::Enemy);
        assert_eq!(field.position(Side::Enemy), 2.5);
    }

    #[test]
    fn test_retreat_clamps_to_edge() {
        let mut field = Battlefield::new(FieldGeometry::default());
        field.retreat(Side::Player);
        field.retreat(Side::Enemy);
        assert_eq!(field.position(Side::Player), -7.5);
        assert_eq!(field.position(Side::Enemy), 7.5);
    }

    #[test]
    fn test_regime_tracks_movement() {
        let mut field = Battlefield::new(FieldGeometry::default());
        field.advance(Side::Player); // 13
        field.advance(Side::Enemy); // 11
        field.advance(Side::Player); // 9
        assert_eq!(field.regime(), DistanceRegime::Far);
        field.advance(Side::Enemy); // 7
        assert_eq!(field.regime(), DistanceRegime::Mid);
        field.advance(Side::Player); // 5
        field.advance(Side::Enemy); // 3
        assert_eq!(field.regime(), DistanceRegime::Mid);
        field.advance(Side::Player); // 1.5
        assert_eq!(field.regime(), DistanceRegime::Close);

        field.reset();
        assert_eq!(field.regime(), DistanceRegime::Far);
    }
}
