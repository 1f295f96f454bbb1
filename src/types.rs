//! Newtype wrappers for improved type safety and domain modeling.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two fighters in a match.
///
/// `Player` is the red gladiator on the left edge of the arena and always
/// opens the match; `Enemy` is the blue gladiator on the right edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    /// The other fighter.
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }

    /// Display colour used in battle-log lines.
    pub fn colour(self) -> &'static str {
        match self {
            Side::Player => "Red",
            Side::Enemy => "Blue",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.colour())
    }
}

/// How a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "result", content = "winner", rename_all = "snake_case")]
pub enum MatchResult {
    Won(Side),
    /// Turn cap reached with both fighters standing
    Stalemate,
}

impl MatchResult {
    pub fn winner(self) -> Option<Side> {
        match self {
            MatchResult::Won(side) => Some(side),
            MatchResult::Stalemate => None,
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchResult::Won(side) => write!(f, "{side} wins"),
            MatchResult::Stalemate => f.write_str("stalemate"),
        }
    }
}

/// Canonical string encoding of a sensed situation.
///
/// Two situations are the same learning state iff their keys are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SituationKey(String);

impl SituationKey {
    /// Separator placed between sensor scalars.
    pub const DELIMITER: &'static str = "_";

    /// Wrap an already encoded key.
    pub fn new(key: impl Into<String>) -> Self {
        SituationKey(key.into())
    }

    /// Borrow the raw key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwrap into the raw key.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for SituationKey {
    fn from(value: String) -> Self {
        SituationKey(value)
    }
}

impl From<&str> for SituationKey {
    fn from(value: &str) -> Self {
        SituationKey(value.to_string())
    }
}

impl fmt::Display for SituationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_is_involution() {
        assert_eq!(Side::Player.opponent(), Side::Enemy);
        assert_eq!(Side::Enemy.opponent().opponent(), Side::Enemy);
    }

    #[test]
    fn test_match_result_winner() {
        assert_eq!(MatchResult::Won(Side::Enemy).winner(), Some(Side::Enemy));
        assert_eq!(MatchResult::Stalemate.winner(), None);
        assert_eq!(MatchResult::Won(Side::Player).to_string(), "Red wins");
    }

    #[test]
    fn test_situation_key_display_matches_raw() {
        let key = SituationKey::from("2_1_1_5");
        assert_eq!(key.to_string(), "2_1_1_5");
        assert_eq!(key.clone().into_string(), key.as_str());
    }
}
