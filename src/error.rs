//! Error types for the rating league
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the crate. Domain failures are raised as [`LeagueError`] and can be
//! recovered from an `anyhow::Error` with `downcast_ref`.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific league scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LeagueError {
    #[error("A player named '{identity}' already exists. Pick a different name")]
    DuplicateIdentity { identity: String },

    #[error("Player(s) not found: {}", missing.join(", "))]
    PlayerNotFound { missing: Vec<String> },

    #[error("Invalid player name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Invalid rating {rating}: ratings must be finite")]
    InvalidRating { rating: f64 },

    #[error("Invalid match: {reason}")]
    InvalidMatch { reason: String },

    #[error("Rating log for '{identity}' is corrupt: {reason}")]
    CorruptLog { identity: String, reason: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },
}

impl LeagueError {
    /// Find the league error behind an `anyhow::Error`, if there is one
    pub fn from_anyhow(err: &anyhow::Error) -> Option<&LeagueError> {
        err.chain().find_map(|cause| cause.downcast_ref::<LeagueError>())
    }
}
