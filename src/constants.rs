//! Configuration constants for the quiz game
//!
//! This module contains the limits and fixed parameters used throughout
//! the game to keep settings, catalogs and team names within sane
//! boundaries and to provide consistent defaults.

/// Game flow constants
pub mod game {
    /// Number of categories offered to the choosing team each round
    pub const SIMULTANEOUS_CATEGORIES: usize = 4;
    /// Whether a question may be drawn twice within the same round
    pub const REUSE_QUESTIONS_WITHIN_ROUND: bool = false;
}

/// Settings bounds
pub mod settings {
    /// Minimum number of rounds in a game
    pub const MIN_ROUNDS: usize = 1;
    /// Maximum number of rounds in a game
    pub const MAX_ROUNDS: usize = 20;
    /// Minimum number of questions asked per round
    pub const MIN_QUESTIONS_PER_ROUND: usize = 1;
    /// Maximum number of questions asked per round
    pub const MAX_QUESTIONS_PER_ROUND: usize = 50;
    /// Minimum time limit in seconds for answering a question
    pub const MIN_TIME_LIMIT: u64 = 5;
    /// Maximum time limit in seconds for answering a question
    pub const MAX_TIME_LIMIT: u64 = 240;
    /// Maximum length of the location label stored with leaderboard entries
    pub const MAX_LOCATION_LENGTH: usize = 100;
}

/// Question timer constants
pub mod timer {
    /// Interval in milliseconds between two "time remaining" notifications
    pub const PERIOD_MILLIS: u64 = 20;
}

/// Catalog constants
pub mod catalog {
    /// Maximum length of a category name
    pub const MAX_CATEGORY_NAME_LENGTH: usize = 100;
    /// Maximum length of a question prompt
    pub const MAX_PROMPT_LENGTH: usize = 500;
    /// Maximum length of an answer text
    pub const MAX_ANSWER_LENGTH: usize = 200;
    /// Minimum number of answers a question offers
    pub const MIN_ANSWER_COUNT: usize = 2;
    /// Maximum number of answers a question offers
    pub const MAX_ANSWER_COUNT: usize = 8;
}

/// Team name constants
pub mod teams {
    /// Maximum length of a team name in characters
    pub const MAX_NAME_LENGTH: usize = 30;
}

/// Hall of fame constants
pub mod hall_of_fame {
    /// Number of entries shown on the hall of fame screen
    pub const DISPLAY_LIMIT: usize = 50;
}
