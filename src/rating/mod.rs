//! Elo rating system and rating log storage
//!
//! This module provides the Elo formula and update rule, and the storage
//! interface that persists every player's rating history.

pub mod elo;
pub mod storage;

// Re-export commonly used types
pub use elo::{expected_score, EloCalculator, EloConfig};
pub use storage::{CsvRatingStore, InMemoryRatingStore, RatingStore};
