//! Utility functions for the rating league

use crate::error::{LeagueError, Result};
use crate::types::PlayerId;
use chrono::{Local, NaiveDateTime};

/// Width of the name column in ranking output
pub const NAME_COLUMN_WIDTH: usize = 15;

/// Get the current local timestamp
pub fn current_timestamp() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Lookup key for a player name: trimmed and lower-cased.
///
/// Internal whitespace is kept, so "John Smith" and "johnsmith" are
/// different players.
pub fn identity_key(name: &str) -> PlayerId {
    name.trim().to_lowercase()
}

/// Normalize a player name into its identity, rejecting names that would
/// not make a valid log file name
pub fn normalize_identity(name: &str) -> Result<PlayerId> {
    let identity = identity_key(name);

    if identity.is_empty() {
        return Err(LeagueError::InvalidName {
            name: name.to_string(),
            reason: "name is empty".to_string(),
        }
        .into());
    }
    if identity.contains(['/', '\\']) || identity == "." || identity == ".." {
        return Err(LeagueError::InvalidName {
            name: name.to_string(),
            reason: "name cannot contain path separators".to_string(),
        }
        .into());
    }
    if identity.chars().any(char::is_control) {
        return Err(LeagueError::InvalidName {
            name: name.to_string(),
            reason: "name cannot contain control characters".to_string(),
        }
        .into());
    }

    Ok(identity)
}

/// Round a rating to the given number of decimal places
pub fn round_to_places(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}
