//! Hall of fame
//!
//! Finished games append one entry per team. Entries are read back ranked
//! by score, best first; teams with equal scores keep the order in which
//! they were recorded.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{TruncatedVec, constants::hall_of_fame::DISPLAY_LIMIT, teams::Team};

/// A single recorded result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Name of the team
    pub team: String,
    /// Correct answers over the whole game
    pub score: usize,
    /// Where the game was played
    pub location: String,
    /// When the entry was recorded
    pub recorded_at: web_time::SystemTime,
}

/// An entry together with its rank
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    /// Rank, starting at 1
    pub position: usize,
    /// The recorded entry
    pub entry: Entry,
}

/// Append-only store of game results
pub trait HallOfFame {
    /// Records the final score of `team`
    fn add_entry(&mut self, team: &Team, score: usize, location: &str);

    /// All entries, best score first
    fn entries(&self) -> Vec<Entry>;
}

/// Ranks and truncates `hall_of_fame` for display
pub fn standings<H: HallOfFame + ?Sized>(hall_of_fame: &H) -> TruncatedVec<Standing> {
    let entries = hall_of_fame.entries();
    let count = entries.len();
    TruncatedVec::new(
        entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| Standing {
                position: i + 1,
                entry,
            }),
        DISPLAY_LIMIT,
        count,
    )
}

/// A hall of fame held in memory
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MemoryHallOfFame {
    /// Entries in the order they were recorded
    recorded: Vec<Entry>,
}

impl MemoryHallOfFame {
    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.recorded.len()
    }

    /// Whether nothing was recorded yet
    pub fn is_empty(&self) -> bool {
        self.recorded.is_empty()
    }
}

impl HallOfFame for MemoryHallOfFame {
    fn add_entry(&mut self, team: &Team, score: usize, location: &str) {
        self.recorded.push(Entry {
            team: team.name().to_owned(),
            score,
            location: location.to_owned(),
            recorded_at: web_time::SystemTime::now(),
        });
    }

    fn entries(&self) -> Vec<Entry> {
        self.recorded
            .iter()
            .sorted_by(|a, b| b.score.cmp(&a.score))
            .cloned()
            .collect_vec()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn names(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.team.as_str()).collect()
    }

    #[test]
    fn test_entries_ranked_by_score() {
        let mut hall = MemoryHallOfFame::default();
        hall.add_entry(&Team::new("Red"), 2, "Library");
        hall.add_entry(&Team::new("Blue"), 5, "Library");
        hall.add_entry(&Team::new("Green"), 3, "Pub");

        assert_eq!(names(&hall.entries()), vec!["Blue", "Green", "Red"]);
        assert_eq!(hall.len(), 3);
    }

    #[test]
    fn test_ties_keep_recording_order() {
        let mut hall = MemoryHallOfFame::default();
        hall.add_entry(&Team::new("First"), 4, "");
        hall.add_entry(&Team::new("Second"), 4, "");
        hall.add_entry(&Team::new("Third"), 4, "");

        assert_eq!(names(&hall.entries()), vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_entry_keeps_location() {
        let mut hall = MemoryHallOfFame::default();
        hall.add_entry(&Team::new("Red"), 1, "Town hall");
        let entries = hall.entries();
        assert_eq!(entries[0].location, "Town hall");
        assert_eq!(entries[0].score, 1);
    }

    #[test]
    fn test_standings_positions_and_truncation() {
        let mut hall = MemoryHallOfFame::default();
        for i in 0..DISPLAY_LIMIT + 5 {
            hall.add_entry(&Team::new(format!("Team {i}")), i, "");
        }

        let standings = standings(&hall);
        assert_eq!(standings.exact_count(), DISPLAY_LIMIT + 5);
        assert_eq!(standings.items().len(), DISPLAY_LIMIT);
        assert_eq!(standings.items()[0].position, 1);
        assert_eq!(standings.items()[0].entry.score, DISPLAY_LIMIT + 4);
    }

    #[test]
    fn test_empty_standings() {
        let hall = MemoryHallOfFame::default();
        assert!(hall.is_empty());
        let standings = standings(&hall);
        assert_eq!(standings.exact_count(), 0);
        assert!(standings.items().is_empty());
    }
}
