//! Game-wide state
//!
//! [`GameState`] holds the two teams, the categories that may still be
//! offered and every round played so far. Team scores are never stored;
//! they are summed from the round tallies on demand.

use std::sync::Arc;

use enum_map::EnumMap;
use itertools::Itertools;
use thiserror::Error;

use crate::{
    catalog::Category,
    round::{PoolError, RoundState},
    teams::{Team, TeamSide},
};

/// Raised when a round is begun after the last configured round
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("all {limit} rounds have been played")]
pub struct RoundLimitReached {
    /// The configured number of rounds
    pub limit: usize,
}

/// State of one game, from team names to the winner
#[derive(Debug)]
pub struct GameState {
    /// The competing teams
    teams: EnumMap<TeamSide, Team>,
    /// Categories that may still be offered
    categories: Vec<Arc<Category>>,
    /// Rounds played so far, the last one being the current round
    rounds: Vec<RoundState>,
    /// Maximum number of rounds
    round_limit: usize,
    /// Source of randomness for category offers
    rng: fastrand::Rng,
}

impl GameState {
    /// Creates a game between `teams` over the given categories
    pub fn new(
        teams: EnumMap<TeamSide, Team>,
        categories: Vec<Arc<Category>>,
        round_limit: usize,
        rng: fastrand::Rng,
    ) -> Self {
        Self {
            teams,
            categories,
            rounds: Vec::new(),
            round_limit,
            rng,
        }
    }

    /// Picks up to `count` distinct category indices at random
    ///
    /// Fewer indices are returned when fewer categories remain.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::Categories` if no category is left.
    pub fn select_random_categories(&mut self, count: usize) -> Result<Vec<usize>, PoolError> {
        if self.categories.is_empty() {
            return Err(PoolError::Categories);
        }

        let mut indices = (0..self.categories.len()).collect_vec();
        self.rng.shuffle(&mut indices);
        indices.truncate(count);
        Ok(indices)
    }

    /// The selectable category at `index`
    pub fn category(&self, index: usize) -> Option<&Arc<Category>> {
        self.categories.get(index)
    }

    /// Categories that may still be offered
    pub fn categories(&self) -> &[Arc<Category>] {
        &self.categories
    }

    /// Removes a category from the selectable pool
    pub fn remove_category(&mut self, index: usize) -> Option<Arc<Category>> {
        (index < self.categories.len()).then(|| self.categories.remove(index))
    }

    /// Starts a new round which becomes the current round
    ///
    /// # Errors
    ///
    /// Returns `RoundLimitReached` if every configured round was already begun.
    pub fn begin_new_round(
        &mut self,
        category: Arc<Category>,
        question_pool: Vec<usize>,
        reuse_questions: bool,
    ) -> Result<(), RoundLimitReached> {
        if self.rounds.len() >= self.round_limit {
            return Err(RoundLimitReached {
                limit: self.round_limit,
            });
        }

        self.rounds
            .push(RoundState::new(category, question_pool, reuse_questions));
        Ok(())
    }

    /// Total correct answers of `team` across all rounds
    pub fn team_points(&self, team: TeamSide) -> usize {
        self.rounds.iter().map(|round| round.team_points(team)).sum()
    }

    /// The most recently begun round
    pub fn current_round(&self) -> Option<&RoundState> {
        self.rounds.last()
    }

    /// The most recently begun round, mutably
    pub fn current_round_mut(&mut self) -> Option<&mut RoundState> {
        self.rounds.last_mut()
    }

    /// Every round begun so far
    pub fn rounds(&self) -> &[RoundState] {
        &self.rounds
    }

    /// Number of rounds begun so far
    pub fn rounds_played(&self) -> usize {
        self.rounds.len()
    }

    /// The configured number of rounds
    pub fn round_limit(&self) -> usize {
        self.round_limit
    }

    /// Whether every configured round was begun
    pub fn all_rounds_begun(&self) -> bool {
        self.rounds.len() >= self.round_limit
    }

    /// The team on `side`
    pub fn team(&self, side: TeamSide) -> &Team {
        &self.teams[side]
    }

    /// Both teams
    pub fn teams(&self) -> &EnumMap<TeamSide, Team> {
        &self.teams
    }

    /// The side with more points, or `None` on a tie
    pub fn leader(&self) -> Option<TeamSide> {
        let one = self.team_points(TeamSide::One);
        let two = self.team_points(TeamSide::Two);
        match one.cmp(&two) {
            std::cmp::Ordering::Greater => Some(TeamSide::One),
            std::cmp::Ordering::Less => Some(TeamSide::Two),
            std::cmp::Ordering::Equal => None,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::{catalog::tests::create_test_catalog, teams};

    fn create_game(category_count: usize, round_limit: usize) -> GameState {
        let names = ["History", "Science", "Art", "Sports", "Music", "Film"];
        GameState::new(
            teams::pair(Team::new("Red"), Team::new("Blue")),
            create_test_catalog(&names[..category_count], 3).into_shared(),
            round_limit,
            fastrand::Rng::with_seed(11),
        )
    }

    #[test]
    fn test_select_random_categories_distinct() {
        let mut game = create_game(6, 3);
        for _ in 0..50 {
            let picked = game.select_random_categories(4).unwrap();
            assert_eq!(picked.len(), 4);
            assert_eq!(picked.iter().unique().count(), 4);
            assert!(picked.iter().all(|&i| i < 6));
        }
    }

    #[test]
    fn test_select_random_categories_fewer_available() {
        let mut game = create_game(2, 3);
        let picked = game.select_random_categories(4).unwrap();
        assert_eq!(picked.iter().sorted().copied().collect_vec(), vec![0, 1]);
    }

    #[test]
    fn test_select_random_categories_empty() {
        let mut game = create_game(1, 3);
        game.remove_category(0);
        assert_eq!(
            game.select_random_categories(4),
            Err(PoolError::Categories)
        );
    }

    #[test]
    fn test_select_random_categories_deterministic() {
        let mut a = create_game(6, 3);
        let mut b = create_game(6, 3);
        assert_eq!(
            a.select_random_categories(4).unwrap(),
            b.select_random_categories(4).unwrap()
        );
    }

    #[test]
    fn test_remove_category_never_offered_again() {
        let mut game = create_game(5, 3);
        let removed = game.remove_category(2).unwrap();
        assert_eq!(game.categories().len(), 4);
        for _ in 0..50 {
            let picked = game.select_random_categories(4).unwrap();
            assert!(
                picked
                    .iter()
                    .all(|&i| game.category(i).unwrap().name() != removed.name())
            );
        }
        assert!(game.remove_category(10).is_none());
    }

    #[test]
    fn test_begin_new_round_becomes_current() {
        let mut game = create_game(2, 2);
        assert!(game.current_round().is_none());

        let category = game.category(1).unwrap().clone();
        game.begin_new_round(category, vec![0, 1, 2], false).unwrap();

        assert_eq!(game.rounds_played(), 1);
        assert_eq!(game.current_round().unwrap().category().name(), "Science");
    }

    #[test]
    fn test_begin_new_round_respects_limit() {
        let mut game = create_game(2, 1);
        let category = game.category(0).unwrap().clone();
        game.begin_new_round(category.clone(), vec![0], false).unwrap();
        assert!(game.all_rounds_begun());
        assert_eq!(
            game.begin_new_round(category, vec![0], false).err(),
            Some(RoundLimitReached { limit: 1 })
        );
        assert_eq!(game.rounds_played(), 1);
    }

    #[test]
    fn test_team_points_sum_rounds() {
        let mut game = create_game(2, 3);
        for (round, (one, two)) in [(2, 1), (0, 3), (1, 1)].into_iter().enumerate() {
            let category = game.category(round % 2).unwrap().clone();
            game.begin_new_round(category, vec![0, 1, 2], false).unwrap();
            let state = game.current_round_mut().unwrap();
            for i in 0..3 {
                state.enter_team_answer(TeamSide::One, i < one);
                state.enter_team_answer(TeamSide::Two, i < two);
            }
        }

        assert_eq!(game.team_points(TeamSide::One), 3);
        assert_eq!(game.team_points(TeamSide::Two), 5);
        assert_eq!(game.leader(), Some(TeamSide::Two));
    }

    #[test]
    fn test_leader_tie() {
        let game = create_game(1, 1);
        assert_eq!(game.leader(), None);
        assert_eq!(game.team(TeamSide::One).name(), "Red");
    }
}
