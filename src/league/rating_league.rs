//! Rating league
//!
//! The league keeps the roster of registered players, applies the Elo update
//! rule to reported results, and produces ranked standings. Every rating change
//! is persisted through the league's [`RatingStore`] before it is visible.

use crate::error::{LeagueError, Result};
use crate::league::standings::{self, Standing};
use crate::league::PlayerRecord;
use crate::rating::{EloCalculator, EloConfig, RatingStore};
use crate::types::{MatchResult, PlayerId, RatingChange};
use crate::utils::{identity_key, normalize_identity};
use anyhow::Context;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, warn};

/// In-memory registry of players backed by persisted rating logs
pub struct RatingLeague {
    calculator: EloCalculator,
    roster: HashMap<PlayerId, PlayerRecord>,
    store: Arc<dyn RatingStore>,
}

impl RatingLeague {
    /// Create an empty league.
    ///
    /// Logs already present in `store` are not loaded; registering one of
    /// those names fails with [`LeagueError::DuplicateIdentity`].
    pub fn new(store: Arc<dyn RatingStore>, config: EloConfig) -> Result<Self> {
        Ok(Self {
            calculator: EloCalculator::new(config)?,
            roster: HashMap::new(),
            store,
        })
    }

    /// Create a league and rehydrate its roster from every log in `store`.
    ///
    /// Logs whose key is not already a normalized player name (`Bob.csv`,
    /// say) are skipped, since no name could ever be looked up under it.
    pub fn load(store: Arc<dyn RatingStore>, config: EloConfig) -> Result<Self> {
        let mut league = Self::new(store, config)?;

        for identity in league.store.identities()? {
            if normalize_identity(&identity).ok().as_deref() != Some(identity.as_str()) {
                warn!(
                    "Skipping rating log '{}': not a normalized player name",
                    identity
                );
                continue;
            }
            let history = league
                .store
                .history(&identity)
                .with_context(|| format!("Failed to load rating log for {}", identity))?;
            let record = PlayerRecord::from_history(identity.clone(), history)?;
            league.roster.insert(identity, record);
        }

        info!("Loaded {} players from storage", league.roster.len());
        Ok(league)
    }

    pub fn k_factor(&self) -> f64 {
        self.calculator.k_factor()
    }

    pub fn len(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    /// Look up a player by name
    pub fn player(&self, name: &str) -> Option<&PlayerRecord> {
        self.roster.get(&identity_key(name))
    }

    /// Register a player at the configured initial rating
    pub fn register(&mut self, name: &str) -> Result<()> {
        let initial_rating = self.calculator.initial_rating();
        self.register_with_rating(name, initial_rating)
    }

    /// Register a player at a specific starting rating
    pub fn register_with_rating(&mut self, name: &str, initial_rating: f64) -> Result<()> {
        let identity = normalize_identity(name)?;
        if self.roster.contains_key(&identity) {
            warn!("A player by the name {} already exists", identity);
            return Err(LeagueError::DuplicateIdentity { identity }.into());
        }

        let record = PlayerRecord::create(&identity, initial_rating, self.store.as_ref())
            .inspect_err(|e| warn!("Could not register {}: {}", identity, e))?;
        self.roster.insert(identity.clone(), record);

        info!(
            "Added {} to player's list. Rating is {}",
            identity, initial_rating
        );
        Ok(())
    }

    /// Probability that a player rated `rating_a` beats one rated `rating_b`
    pub fn expected_score(&self, rating_a: f64, rating_b: f64) -> f64 {
        self.calculator.expected_score(rating_a, rating_b)
    }

    /// Apply a win for `winner_name` over `loser_name` and persist both ratings
    pub fn report_result(&mut self, winner_name: &str, loser_name: &str) -> Result<MatchResult> {
        let winner_id = identity_key(winner_name);
        let loser_id = identity_key(loser_name);

        let mut missing: Vec<String> = [&winner_id, &loser_id]
            .into_iter()
            .filter(|id| !self.roster.contains_key(*id))
            .cloned()
            .collect();
        missing.dedup();
        if !missing.is_empty() {
            warn!(
                "{} does not exist. Add the player with register()",
                missing.join(", ")
            );
            return Err(LeagueError::PlayerNotFound { missing }.into());
        }

        if winner_id == loser_id {
            return Err(LeagueError::InvalidMatch {
                reason: format!("{} cannot play against themselves", winner_id),
            }
            .into());
        }

        let old_winner = self.rating_of(&winner_id)?;
        let old_loser = self.rating_of(&loser_id)?;
        let (new_winner, new_loser, expected_winner) =
            self.calculator.rate_match(old_winner, old_loser);

        let store = Arc::clone(&self.store);
        self.record_mut(&winner_id)?
            .set_rating(new_winner, store.as_ref())?;

        let loser_update = self
            .record_mut(&loser_id)
            .and_then(|loser| loser.set_rating(new_loser, store.as_ref()));

        if let Err(e) = loser_update {
            // Put the winner back so the pair is never half-applied
            let rollback = self
                .record_mut(&winner_id)
                .and_then(|winner| winner.set_rating(old_winner, store.as_ref()));
            if let Err(rollback) = rollback {
                error!(
                    "Failed to restore {} to {} after a failed update: {}",
                    winner_id, old_winner, rollback
                );
            }
            return Err(e);
        }

        info!(
            "New rating {}:{}, {}:{}",
            winner_id, new_winner, loser_id, new_loser
        );

        Ok(MatchResult {
            winner: RatingChange {
                player_id: winner_id,
                old_rating: old_winner,
                new_rating: new_winner,
            },
            loser: RatingChange {
                player_id: loser_id,
                old_rating: old_loser,
                new_rating: new_loser,
            },
            expected_winner,
        })
    }

    /// All players ordered by rating, highest first
    pub fn rankings(&self) -> Vec<&PlayerRecord> {
        standings::rank(self.roster.values())
    }

    /// Numbered ranking rows
    pub fn standings(&self) -> Vec<Standing> {
        standings::standings(&self.rankings())
    }

    /// Ranking table with a header row, one player per line
    pub fn render_rankings(&self) -> String {
        standings::render_table(&self.rankings())
    }

    fn rating_of(&self, identity: &str) -> Result<f64> {
        self.roster
            .get(identity)
            .map(PlayerRecord::rating)
            .ok_or_else(|| not_found(identity))
    }

    fn record_mut(&mut self, identity: &str) -> Result<&mut PlayerRecord> {
        self.roster
            .get_mut(identity)
            .ok_or_else(|| not_found(identity))
    }
}

fn not_found(identity: &str) -> anyhow::Error {
    LeagueError::PlayerNotFound {
        missing: vec![identity.to_string()],
    }
    .into()
}

impl std::fmt::Debug for RatingLeague {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RatingLeague")
            .field("calculator", &self.calculator)
            .field("players", &self.roster.len())
            .finish()
    }
}
