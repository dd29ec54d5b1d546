//! Multiple choice questions and their presentation order
//!
//! A question owns a fixed list of answers, exactly one of which is
//! correct. Every time a question is shown its answers are shuffled into a
//! fresh [`Presentation`]; answer indices entered by teams refer to that
//! presentation, never to the stored order.

use garde::Validate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// A single answer option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Answer {
    /// Text shown to the teams
    #[garde(length(chars, max = crate::constants::catalog::MAX_ANSWER_LENGTH))]
    pub text: String,
    /// Whether this is the correct answer
    #[garde(skip)]
    pub correct: bool,
}

impl Answer {
    /// Creates a correct answer
    pub fn correct(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            correct: true,
        }
    }

    /// Creates a wrong answer
    pub fn wrong(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            correct: false,
        }
    }
}

fn validate_single_correct(answers: &[Answer]) -> garde::Result {
    match answers.iter().filter(|answer| answer.correct).count() {
        1 => Ok(()),
        count => Err(garde::Error::new(format!(
            "exactly one answer must be correct, found {count}"
        ))),
    }
}

/// A multiple choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Question {
    /// The question text
    #[garde(length(chars, min = 1, max = crate::constants::catalog::MAX_PROMPT_LENGTH))]
    prompt: String,
    /// Answers in stored order
    #[garde(
        length(
            min = crate::constants::catalog::MIN_ANSWER_COUNT,
            max = crate::constants::catalog::MAX_ANSWER_COUNT
        ),
        custom(|v, _| validate_single_correct(v)),
        dive
    )]
    answers: Vec<Answer>,
}

impl Question {
    /// Creates a question; call [`Validate::validate`] before use in a catalog
    pub fn new(prompt: impl Into<String>, answers: Vec<Answer>) -> Self {
        Self {
            prompt: prompt.into(),
            answers,
        }
    }

    /// The question text
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Answers in stored order
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    /// Produces a fresh random presentation order for this question
    pub fn shuffled_answers(&self, rng: &mut fastrand::Rng) -> Presentation {
        let mut order = (0..self.answers.len()).collect_vec();
        rng.shuffle(&mut order);
        Presentation { order }
    }
}

/// The order in which a question's answers are displayed
///
/// `order[shown_index]` is the index of the answer in stored order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Presentation {
    order: Vec<usize>,
}

impl Presentation {
    /// Number of answers shown
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no answers are shown
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Maps a shown index back to the stored index
    pub fn stored_index(&self, shown_index: usize) -> Option<usize> {
        self.order.get(shown_index).copied()
    }

    /// Answers of `question` in presentation order
    pub fn answers<'a>(&'a self, question: &'a Question) -> impl Iterator<Item = &'a Answer> + 'a {
        self.order.iter().filter_map(|&i| question.answers.get(i))
    }

    /// Whether the answer shown at `shown_index` is the correct one
    ///
    /// Indices outside the presentation are never correct.
    pub fn is_correct(&self, question: &Question, shown_index: usize) -> bool {
        self.stored_index(shown_index)
            .and_then(|i| question.answers.get(i))
            .is_some_and(|answer| answer.correct)
    }
}
