//! Team name validation and suggestions
//!
//! Team names are entered by hand on the name prompt. This module cleans
//! and checks them before a game is created, and generates a couple of
//! suggestions the prompt can offer.

use heck::ToTitleCase;
use rustrict::CensorStr;
use serde::Serialize;
use thiserror::Error;

use crate::teams::{Team, TeamSide};

/// Errors that can occur during team name validation
#[derive(Error, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The name is empty or contains only whitespace
    #[error("team name cannot be empty")]
    Empty,
    /// The name exceeds the maximum allowed length
    #[error("team name is too long")]
    TooLong,
    /// The name contains inappropriate content
    #[error("team name is inappropriate")]
    Sinful,
    /// Both teams entered the same name
    #[error("both teams cannot share a name")]
    Duplicate,
}

/// A rejected team name together with the side that entered it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rejection {
    /// The side whose name was rejected
    pub team: TeamSide,
    /// Why it was rejected
    pub error: Error,
}

/// Cleans and validates a single team name
///
/// # Errors
///
/// * `Error::TooLong` - Name exceeds the configured number of characters
/// * `Error::Empty` - Name is empty after trimming whitespace
/// * `Error::Sinful` - Name contains inappropriate content
pub fn clean(name: &str) -> Result<String, Error> {
    let name = rustrict::trim_whitespace(name);
    if name.chars().count() > crate::constants::teams::MAX_NAME_LENGTH {
        return Err(Error::TooLong);
    }
    if name.is_empty() {
        return Err(Error::Empty);
    }
    if name.is_inappropriate() {
        return Err(Error::Sinful);
    }
    Ok(name.to_owned())
}

/// Validates both names entered on the prompt and builds the teams
///
/// Names are compared case-insensitively for uniqueness.
///
/// # Errors
///
/// Returns the first [`Rejection`] found, checking team one before team two.
pub fn validate_pair(team_one: &str, team_two: &str) -> Result<(Team, Team), Rejection> {
    let reject = |team| move |error| Rejection { team, error };

    let one = clean(team_one).map_err(reject(TeamSide::One))?;
    let two = clean(team_two).map_err(reject(TeamSide::Two))?;

    if one.to_lowercase() == two.to_lowercase() {
        return Err(Rejection {
            team: TeamSide::Two,
            error: Error::Duplicate,
        });
    }

    Ok((Team::new(one), Team::new(two)))
}

/// Generates two distinct name suggestions for the name prompt
pub fn suggestions() -> [String; 2] {
    let one = suggestion();
    let mut two = suggestion();
    while two == one {
        two = suggestion();
    }
    [one, two]
}

fn suggestion() -> String {
    loop {
        if let Some(name) = petname::petname(2, " ") {
            let name = name.to_title_case();
            if clean(&name).is_ok() {
                return name;
            }
        }
    }
}
