//! Storage doubles for integration testing

#![allow(dead_code)]

use elo_league::error::Result;
use elo_league::types::{PlayerId, RatingSnapshot};
use elo_league::{InMemoryRatingStore, RatingStore};
use std::sync::Mutex;

/// Store whose appends fail for chosen players, simulating a full disk
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: InMemoryRatingStore,
    failing: Mutex<Vec<PlayerId>>,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later append for `identity` fail
    pub fn fail_appends_for(&self, identity: &str) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.push(identity.to_string());
        }
    }

    fn should_fail(&self, identity: &str) -> bool {
        self.failing
            .lock()
            .map(|failing| failing.iter().any(|id| id == identity))
            .unwrap_or(false)
    }
}

impl RatingStore for FailingStore {
    fn contains(&self, identity: &str) -> Result<bool> {
        self.inner.contains(identity)
    }

    fn create_log(&self, identity: &str, first: &RatingSnapshot) -> Result<()> {
        self.inner.create_log(identity, first)
    }

    fn append(&self, identity: &str, snapshot: &RatingSnapshot) -> Result<()> {
        if self.should_fail(identity) {
            return Err(std::io::Error::other(format!("no space left for {}", identity)).into());
        }
        self.inner.append(identity, snapshot)
    }

    fn history(&self, identity: &str) -> Result<Vec<RatingSnapshot>> {
        self.inner.history(identity)
    }

    fn identities(&self) -> Result<Vec<PlayerId>> {
        self.inner.identities()
    }
}
