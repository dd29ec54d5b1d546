//! Game settings
//!
//! Settings are owned by an external store; the controller only reads them
//! and hands edited copies back through [`SettingsStore::update`]. A game
//! takes a snapshot of the settings when the team names are confirmed, so
//! nothing changes under a running game.

use std::time::Duration;

use garde::Validate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::settings::{
    MAX_LOCATION_LENGTH, MAX_QUESTIONS_PER_ROUND, MAX_ROUNDS, MAX_TIME_LIMIT,
    MIN_QUESTIONS_PER_ROUND, MIN_ROUNDS, MIN_TIME_LIMIT,
};

/// Validates that a duration falls within specified bounds.
///
/// # Generics
///
/// * `MIN_SECONDS` - The minimum allowed duration in seconds (inclusive).
/// * `MAX_SECONDS` - The maximum allowed duration in seconds (inclusive).
///
/// # Errors
///
/// Returns a `garde::Error` if the duration is outside the specified bounds.
pub fn validate_duration<const MIN_SECONDS: u64, const MAX_SECONDS: u64>(
    val: &Duration,
    _ctx: &(),
) -> garde::Result {
    if (MIN_SECONDS..=MAX_SECONDS).contains(&val.as_secs()) {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "outside of bounds [{MIN_SECONDS},{MAX_SECONDS}]",
        )))
    }
}

/// Everything configurable about a game
#[serde_with::serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Settings {
    /// Number of rounds in a game
    #[garde(range(min = MIN_ROUNDS, max = MAX_ROUNDS))]
    pub rounds: usize,
    /// Number of questions each team answers per round
    #[garde(range(min = MIN_QUESTIONS_PER_ROUND, max = MAX_QUESTIONS_PER_ROUND))]
    pub questions_per_round: usize,
    /// Time the teams have for each question
    #[garde(custom(validate_duration::<MIN_TIME_LIMIT, MAX_TIME_LIMIT>))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    pub time_limit: Duration,
    /// Remove asked questions from their category until it runs dry
    #[garde(skip)]
    pub consume_questions: bool,
    /// Offer a category again after it was played
    #[garde(skip)]
    pub reuse_categories: bool,
    /// Close the question as soon as the timer runs out
    #[garde(skip)]
    pub strict_timeout: bool,
    /// Label stored with every hall of fame entry
    #[garde(length(chars, max = MAX_LOCATION_LENGTH))]
    pub location: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rounds: 3,
            questions_per_round: 3,
            time_limit: Duration::from_secs(30),
            consume_questions: true,
            reuse_categories: true,
            strict_timeout: true,
            location: String::new(),
        }
    }
}

impl Settings {
    /// Checks the settings against the configured bounds
    ///
    /// # Errors
    ///
    /// Returns `Error::Invalid` with the validation report if any field is
    /// out of bounds.
    pub fn check(&self) -> Result<(), Error> {
        self.validate()?;
        Ok(())
    }
}

/// Errors raised while changing settings
#[derive(Error, Debug)]
pub enum Error {
    /// The edited settings failed validation
    #[error("settings are invalid: {0}")]
    Invalid(#[from] garde::Report),
    /// The store could not save the settings
    #[error("failed to persist settings: {0}")]
    Persist(String),
}

/// Read and write access to the persisted settings
pub trait SettingsStore {
    /// The current settings
    fn settings(&self) -> &Settings;

    /// Replaces and persists the settings
    ///
    /// The new settings must take effect even if persisting them fails.
    ///
    /// # Errors
    ///
    /// Returns `Error::Persist` if the settings could not be saved.
    fn update(&mut self, settings: Settings) -> Result<(), Error>;
}

/// A settings store that keeps everything in memory
#[derive(Debug, Default, Clone)]
pub struct MemorySettings {
    settings: Settings,
    saves: usize,
}

impl MemorySettings {
    /// Creates a store holding `settings`
    pub fn new(settings: Settings) -> Self {
        Self { settings, saves: 0 }
    }

    /// How many times the settings were saved
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl SettingsStore for MemorySettings {
    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn update(&mut self, settings: Settings) -> Result<(), Error> {
        self.settings = settings;
        self.saves += 1;
        Ok(())
    }
}
