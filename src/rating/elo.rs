//! Elo rating calculator
//!
//! Expected score follows the logistic Elo curve on a 400 point scale, and
//! each match moves at most `k_factor` points from the loser to the winner.

use crate::error::{LeagueError, Result};
use crate::utils::round_to_places;
use serde::{Deserialize, Serialize};

/// Rating points per factor of ten in winning odds
const ELO_SCALE: f64 = 400.0;

/// Configuration for the Elo rating system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EloConfig {
    /// Maximum rating points transferred in a single match
    pub k_factor: f64,
    /// Rating given to newly registered players
    pub initial_rating: f64,
    /// Decimal places new ratings are rounded to
    pub decimal_places: u32,
}

impl Default for EloConfig {
    fn default() -> Self {
        Self {
            k_factor: 30.0,
            initial_rating: 1500.0,
            decimal_places: 4,
        }
    }
}

impl EloConfig {
    /// Default configuration with a different K-factor
    pub fn with_k_factor(k_factor: f64) -> Self {
        Self {
            k_factor,
            ..Self::default()
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if !self.k_factor.is_finite() || self.k_factor <= 0.0 {
            return Err(LeagueError::ConfigurationError {
                message: format!("K-factor must be positive, got {}", self.k_factor),
            }
            .into());
        }

        if !self.initial_rating.is_finite() {
            return Err(LeagueError::ConfigurationError {
                message: "Initial rating must be finite".to_string(),
            }
            .into());
        }

        if self.decimal_places > 10 {
            return Err(LeagueError::ConfigurationError {
                message: format!(
                    "Decimal places must be at most 10, got {}",
                    self.decimal_places
                ),
            }
            .into());
        }

        Ok(())
    }
}

/// Probability that a player rated `rating_a` beats one rated `rating_b`
pub fn expected_score(rating_a: f64, rating_b: f64) -> f64 {
    let exponent = (rating_b - rating_a) / ELO_SCALE;
    1.0 / (1.0 + 10f64.powf(exponent))
}

/// Elo rating calculator
#[derive(Debug, Clone)]
pub struct EloCalculator {
    config: EloConfig,
}

impl EloCalculator {
    /// Create a new Elo calculator
    pub fn new(config: EloConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self { config })
    }

    pub fn k_factor(&self) -> f64 {
        self.config.k_factor
    }

    pub fn initial_rating(&self) -> f64 {
        self.config.initial_rating
    }

    /// Probability that a player rated `rating_a` beats one rated `rating_b`
    pub fn expected_score(&self, rating_a: f64, rating_b: f64) -> f64 {
        expected_score(rating_a, rating_b)
    }

    /// Round a rating to the configured precision
    pub fn round_rating(&self, rating: f64) -> f64 {
        round_to_places(rating, self.config.decimal_places)
    }

    /// New `(winner, loser)` ratings after the winner beats the loser.
    ///
    /// Returns the winner's expected score alongside, which callers report.
    pub fn rate_match(&self, winner_rating: f64, loser_rating: f64) -> (f64, f64, f64) {
        let expected_winner = self.expected_score(winner_rating, loser_rating);
        let expected_loser = 1.0 - expected_winner;

        let k = self.k_factor();

        let new_winner = self.round_rating(winner_rating + k * (1.0 - expected_winner));
        let new_loser = self.round_rating(loser_rating + k * (0.0 - expected_loser));

        (new_winner, new_loser, expected_winner)
    }
}

impl Default for EloCalculator {
    fn default() -> Self {
        Self {
            config: EloConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_score_equal_ratings() {
        assert_eq!(expected_score(1500.0, 1500.0), 0.5);
        assert_eq!(expected_score(0.0, 0.0), 0.5);
    }

    #[test]
    fn test_expected_score_is_symmetric() {
        let pairs = [(1500.0, 1400.0), (2400.0, 800.0), (1000.5, 1000.25)];
        for (a, b) in pairs {
            let sum = expected_score(a, b) + expected_score(b, a);
            assert!((sum - 1.0).abs() < 1e-9, "sum was {} for {} vs {}", sum, a, b);
        }
    }

    #[test]
    fn test_expected_score_favours_higher_rating() {
        let expected = expected_score(1600.0, 1400.0);
        assert!((expected - 0.759_746_9).abs() < 1e-6);
        assert!(expected_score(1400.0, 1600.0) < 0.5);
    }

    #[test]
    fn test_rate_match_equal_ratings() {
        let calculator = EloCalculator::default();
        let (winner, loser, expected) = calculator.rate_match(1500.0, 1500.0);

        assert_eq!(expected, 0.5);
        assert_eq!(winner, 1515.0);
        assert_eq!(loser, 1485.0);
    }

    #[test]
    fn test_rate_match_favourite_wins() {
        let calculator = EloCalculator::default();
        let (winner, loser, _) = calculator.rate_match(1600.0, 1400.0);

        assert_eq!(winner, 1607.2076);
        assert_eq!(loser, 1392.7924);
    }

    #[test]
    fn test_rate_match_upset_pays_more() {
        let calculator = EloCalculator::default();
        let (favourite, _, _) = calculator.rate_match(1600.0, 1400.0);
        let (underdog, _, _) = calculator.rate_match(1400.0, 1600.0);

        assert!(underdog - 1400.0 > favourite - 1600.0);
        assert!(underdog - 1400.0 < calculator.k_factor());
    }

    #[test]
    fn test_custom_k_factor() {
        let calculator = EloCalculator::new(EloConfig::with_k_factor(16.0)).unwrap();
        let (winner, loser, _) = calculator.rate_match(1500.0, 1500.0);

        assert_eq!(winner, 1508.0);
        assert_eq!(loser, 1492.0);
    }

    #[test]
    fn test_config_validation() {
        assert!(EloConfig::default().validate().is_ok());
        assert!(EloConfig::with_k_factor(0.0).validate().is_err());
        assert!(EloConfig::with_k_factor(-5.0).validate().is_err());
        assert!(EloConfig::with_k_factor(f64::NAN).validate().is_err());

        let config = EloConfig {
            decimal_places: 11,
            ..EloConfig::default()
        };
        assert!(EloCalculator::new(config).is_err());
    }
}
