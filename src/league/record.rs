//! A single player's rating and its persisted history

use crate::error::{LeagueError, Result};
use crate::rating::RatingStore;
use crate::types::{PlayerId, RatingSnapshot};
use crate::utils::{normalize_identity, NAME_COLUMN_WIDTH};
use anyhow::Context;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// One player's identity, current rating and rating history.
///
/// The rating only changes through [`PlayerRecord::set_rating`], which
/// persists the new value before it becomes visible, so the in-memory rating
/// always equals the last snapshot in the player's log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRecord {
    identity: PlayerId,
    rating: f64,
    history: Vec<RatingSnapshot>,
}

impl PlayerRecord {
    /// Register a new player and allocate their log in `store`
    pub fn create(name: &str, initial_rating: f64, store: &dyn RatingStore) -> Result<Self> {
        if !initial_rating.is_finite() {
            return Err(LeagueError::InvalidRating {
                rating: initial_rating,
            }
            .into());
        }

        let identity = normalize_identity(name)?;
        let first = RatingSnapshot::now(initial_rating);
        store.create_log(&identity, &first)?;

        Ok(Self {
            identity,
            rating: initial_rating,
            history: vec![first],
        })
    }

    /// Rebuild a record from a previously persisted log
    pub fn from_history(identity: PlayerId, history: Vec<RatingSnapshot>) -> Result<Self> {
        let rating = match history.last() {
            Some(last) => last.rating,
            None => {
                return Err(LeagueError::CorruptLog {
                    identity,
                    reason: "log has no rating rows".to_string(),
                }
                .into());
            }
        };

        Ok(Self {
            identity,
            rating,
            history,
        })
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    /// Every snapshot recorded for this player, oldest first
    pub fn history(&self) -> &[RatingSnapshot] {
        &self.history
    }

    /// Number of rating changes since registration
    pub fn games_played(&self) -> usize {
        self.history.len().saturating_sub(1)
    }

    /// Append the current rating to the player's log
    pub fn record_snapshot(&mut self, store: &dyn RatingStore) -> Result<()> {
        self.persist(RatingSnapshot::now(self.rating), store)
    }

    /// Change the rating, appending the new value to the player's log
    pub fn set_rating(&mut self, new_rating: f64, store: &dyn RatingStore) -> Result<()> {
        if !new_rating.is_finite() {
            return Err(LeagueError::InvalidRating { rating: new_rating }.into());
        }

        self.persist(RatingSnapshot::now(new_rating), store)
    }

    fn persist(&mut self, snapshot: RatingSnapshot, store: &dyn RatingStore) -> Result<()> {
        debug!("Writing {} rating data...", self.identity);
        store
            .append(&self.identity, &snapshot)
            .with_context(|| format!("Failed to record rating for {}", self.identity))?;

        self.rating = snapshot.rating;
        self.history.push(snapshot);
        Ok(())
    }
}

impl fmt::Display for PlayerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<width$}| {}",
            self.identity,
            self.rating,
            width = NAME_COLUMN_WIDTH
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::InMemoryRatingStore;

    #[test]
    fn test_create_normalizes_and_persists() {
        let store = InMemoryRatingStore::new();
        let record = PlayerRecord::create("  Alice ", 1500.0, &store).unwrap();

        assert_eq!(record.identity(), "alice");
        assert_eq!(record.rating(), 1500.0);
        assert_eq!(record.history().len(), 1);
        assert_eq!(record.games_played(), 0);
        assert_eq!(store.history("alice").unwrap(), record.history());
    }

    #[test]
    fn test_create_duplicate_identity() {
        let store = InMemoryRatingStore::new();
        PlayerRecord::create("alice", 1500.0, &store).unwrap();

        let err = PlayerRecord::create("ALICE", 1700.0, &store).unwrap_err();
        assert_eq!(
            LeagueError::from_anyhow(&err),
            Some(&LeagueError::DuplicateIdentity {
                identity: "alice".to_string()
            })
        );
        assert_eq!(store.history("alice").unwrap().len(), 1);
        assert_eq!(store.history("alice").unwrap()[0].rating, 1500.0);
    }

    #[test]
    fn test_set_rating_appends_snapshot() {
        let store = InMemoryRatingStore::new();
        let mut record = PlayerRecord::create("bob", 1500.0, &store).unwrap();

        record.set_rating(1485.0, &store).unwrap();

        assert_eq!(record.rating(), 1485.0);
        assert_eq!(record.games_played(), 1);
        let log = store.history("bob").unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[1].rating, 1485.0);
    }

    #[test]
    fn test_set_rating_rejects_non_finite() {
        let store = InMemoryRatingStore::new();
        let mut record = PlayerRecord::create("bob", 1500.0, &store).unwrap();

        assert!(record.set_rating(f64::NAN, &store).is_err());
        assert!(record.set_rating(f64::INFINITY, &store).is_err());
        assert_eq!(record.rating(), 1500.0);
        assert_eq!(store.history("bob").unwrap().len(), 1);
    }

    #[test]
    fn test_record_snapshot_repeats_current_rating() {
        let store = InMemoryRatingStore::new();
        let mut record = PlayerRecord::create("carol", 1450.0, &store).unwrap();

        record.record_snapshot(&store).unwrap();

        let log = store.history("carol").unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[1].rating, 1450.0);
    }

    #[test]
    fn test_from_history() {
        let store = InMemoryRatingStore::new();
        let mut record = PlayerRecord::create("dave", 1500.0, &store).unwrap();
        record.set_rating(1515.0, &store).unwrap();

        let rebuilt =
            PlayerRecord::from_history("dave".to_string(), store.history("dave").unwrap()).unwrap();
        assert_eq!(rebuilt, record);

        assert!(PlayerRecord::from_history("empty".to_string(), Vec::new()).is_err());
    }

    #[test]
    fn test_display() {
        let store = InMemoryRatingStore::new();
        let record = PlayerRecord::create("Alice", 1607.2076, &store).unwrap();

        assert_eq!(record.to_string(), "alice          | 1607.2076");
    }
}
