//! Team identity
//!
//! A game is always played by exactly two teams. This module defines the
//! [`TeamSide`] key used to address per-team values and the [`Team`] itself.
//! Points are not stored on the team; they are derived from the rounds
//! recorded in [`crate::game_state::GameState`].

use enum_map::{Enum, EnumMap};
use serde::{Deserialize, Serialize};

/// One of the two sides of a game
///
/// Used as the key of [`EnumMap`]s holding per-team values such as answer
/// slots and correct-answer tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
pub enum TeamSide {
    /// The team whose name was entered first
    One,
    /// The team whose name was entered second
    Two,
}

impl TeamSide {
    /// Both sides in entry order
    pub const ALL: [TeamSide; 2] = [TeamSide::One, TeamSide::Two];
}

/// A competing team
///
/// The name is fixed once the game is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    name: String,
}

impl Team {
    /// Creates a team with an already validated name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The display name of the team
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Builds the pair of teams for a new game
pub fn pair(team_one: Team, team_two: Team) -> EnumMap<TeamSide, Team> {
    EnumMap::from_array([team_one, team_two])
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_pair_keeps_entry_order() {
        let teams = pair(Team::new("Red"), Team::new("Blue"));
        assert_eq!(teams[TeamSide::One].name(), "Red");
        assert_eq!(teams[TeamSide::Two].name(), "Blue");
    }

    #[test]
    fn test_team_side_serialization() {
        let json = serde_json::to_string(&TeamSide::Two).unwrap();
        assert_eq!(json, "\"Two\"");
    }
}
