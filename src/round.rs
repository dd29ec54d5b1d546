//! Round bookkeeping
//!
//! A round plays questions from one category. [`RoundState`] keeps the
//! questions that can still be drawn and a tally of answers per team.

use std::sync::Arc;

use enum_map::EnumMap;
use thiserror::Error;

use crate::{
    catalog::{Category, Question},
    teams::TeamSide,
};

/// Errors raised when a pool cannot supply what the settings ask for
///
/// These signal that the catalog is too small for the configured game and
/// are fatal to the running game.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// The round ran out of questions before reaching its quota
    #[error("category \"{category}\" has no questions left for this round")]
    Questions {
        /// Name of the exhausted category
        category: String,
    },
    /// No category is left to offer for a new round
    #[error("no categories left to offer")]
    Categories,
}

/// Answer counts for one team within a round
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Tally {
    /// Questions answered correctly
    correct: usize,
    /// Questions answered at all, including missed ones
    answered: usize,
}

/// State of a single round
#[derive(Debug, Clone)]
pub struct RoundState {
    /// The category played this round
    category: Arc<Category>,
    /// Stored indices (into the category) of questions that may still be drawn
    pool: Vec<usize>,
    /// Keep drawn questions in the pool
    reuse_questions: bool,
    /// Per-team answer counts
    tallies: EnumMap<TeamSide, Tally>,
}

impl RoundState {
    /// Starts a round on `category` drawing from the stored question indices in `pool`
    pub fn new(category: Arc<Category>, pool: Vec<usize>, reuse_questions: bool) -> Self {
        Self {
            category,
            pool,
            reuse_questions,
            tallies: EnumMap::default(),
        }
    }

    /// The category played this round
    pub fn category(&self) -> &Arc<Category> {
        &self.category
    }

    /// Stored indices of the questions still in the pool
    pub fn pool(&self) -> &[usize] {
        &self.pool
    }

    /// Picks a position in the pool uniformly at random
    ///
    /// # Errors
    ///
    /// Returns `PoolError::Questions` if the pool is empty.
    pub fn select_question_index(&self, rng: &mut fastrand::Rng) -> Result<usize, PoolError> {
        if self.pool.is_empty() {
            return Err(PoolError::Questions {
                category: self.category.name().to_owned(),
            });
        }
        Ok(rng.usize(..self.pool.len()))
    }

    /// The question at position `index` of the pool
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.pool
            .get(index)
            .and_then(|&stored| self.category.question(stored))
    }

    /// Drops position `index` from the pool unless questions are reused
    pub fn remove_question(&mut self, index: usize) {
        if !self.reuse_questions && index < self.pool.len() {
            self.pool.remove(index);
        }
    }

    /// Records the outcome of one question for `team`
    ///
    /// The controller calls this exactly once per team per question.
    pub fn enter_team_answer(&mut self, team: TeamSide, was_correct: bool) {
        let tally = &mut self.tallies[team];
        tally.answered += 1;
        if was_correct {
            tally.correct += 1;
        }
    }

    /// Number of questions `team` has answered this round
    pub fn team_answer_count(&self, team: TeamSide) -> usize {
        self.tallies[team].answered
    }

    /// Number of questions `team` answered correctly this round
    pub fn team_points(&self, team: TeamSide) -> usize {
        self.tallies[team].correct
    }

    /// Number of questions played this round
    pub fn answered_count(&self) -> usize {
        debug_assert_eq!(
            self.tallies[TeamSide::One].answered,
            self.tallies[TeamSide::Two].answered
        );
        self.tallies[TeamSide::One].answered
    }

    /// Whether the round has reached `quota` questions
    pub fn is_complete(&self, quota: usize) -> bool {
        self.answered_count() >= quota
    }
}
