//! Elo League - Elo ratings for a league of named players
//!
//! This crate maintains competitive skill ratings with the Elo formula. Every
//! rating change is appended to the player's persisted rating log, and the
//! league produces ranked standings on demand.

pub mod config;
pub mod error;
pub mod league;
pub mod rating;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{LeagueError, Result};
pub use types::*;

// Re-export key components
pub use league::{PlayerRecord, RatingLeague, Standing};
pub use rating::{CsvRatingStore, EloCalculator, EloConfig, InMemoryRatingStore, RatingStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
