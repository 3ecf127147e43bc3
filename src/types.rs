//! Common types used throughout the rating league

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Normalized player name, used as the unique key of a player
pub type PlayerId = String;

/// One persisted row of a player's rating log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingSnapshot {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub rating: f64,
}

impl RatingSnapshot {
    /// Snapshot taken at the given moment, truncated to whole seconds
    pub fn at(moment: NaiveDateTime, rating: f64) -> Self {
        let time = moment.time();
        Self {
            date: moment.date(),
            time: time.with_nanosecond(0).unwrap_or(time),
            rating,
        }
    }

    /// Snapshot of `rating` stamped with the local clock
    pub fn now(rating: f64) -> Self {
        Self::at(crate::utils::current_timestamp(), rating)
    }
}

/// Rating change information for one side of a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingChange {
    pub player_id: PlayerId,
    pub old_rating: f64,
    pub new_rating: f64,
}

impl RatingChange {
    /// Signed rating movement
    pub fn delta(&self) -> f64 {
        self.new_rating - self.old_rating
    }
}

/// Outcome of a reported match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub winner: RatingChange,
    pub loser: RatingChange,
    /// Probability the winner had of winning before the match
    pub expected_winner: f64,
}

impl MatchResult {
    /// Rating points created or destroyed by rounding the two new ratings
    pub fn rounding_drift(&self) -> f64 {
        self.winner.delta() + self.loser.delta()
    }
}
