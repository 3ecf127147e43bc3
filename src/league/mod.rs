//! Player registry, match reporting and standings
//!
//! This module holds the per-player records and the league that applies Elo
//! updates to them.

pub mod rating_league;
pub mod record;
pub mod standings;

// Re-export commonly used types
pub use rating_league::RatingLeague;
pub use record::PlayerRecord;
pub use standings::Standing;
