//! Main application configuration
//!
//! This module defines the configuration structures for the elo-league
//! binary, including environment variable and TOML file loading and validation.

use crate::rating::EloConfig;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub league: LeagueSettings,
    pub storage: StorageSettings,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Rating rules of the league
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueSettings {
    /// Maximum rating points transferred per match
    pub k_factor: f64,
    /// Rating given to newly registered players
    pub default_rating: f64,
    /// Decimal places new ratings are rounded to
    pub decimal_places: u32,
}

/// Rating log storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding one CSV rating log per player
    pub data_dir: PathBuf,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "elo-league".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for LeagueSettings {
    fn default() -> Self {
        let elo = EloConfig::default();
        Self {
            k_factor: elo.k_factor,
            default_rating: elo.initial_rating,
            decimal_places: elo.decimal_places,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("ratings"),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.apply_env()?;

        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // League settings
        if let Ok(k_factor) = env::var("ELO_K_FACTOR") {
            self.league.k_factor = k_factor
                .parse()
                .map_err(|_| anyhow!("Invalid ELO_K_FACTOR value: {}", k_factor))?;
        }
        if let Ok(rating) = env::var("ELO_DEFAULT_RATING") {
            self.league.default_rating = rating
                .parse()
                .map_err(|_| anyhow!("Invalid ELO_DEFAULT_RATING value: {}", rating))?;
        }
        if let Ok(places) = env::var("ELO_DECIMAL_PLACES") {
            self.league.decimal_places = places
                .parse()
                .map_err(|_| anyhow!("Invalid ELO_DECIMAL_PLACES value: {}", places))?;
        }

        // Storage settings
        if let Ok(dir) = env::var("ELO_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }

        Ok(())
    }

    /// Rating rules as an Elo calculator configuration
    pub fn elo_config(&self) -> EloConfig {
        EloConfig {
            k_factor: self.league.k_factor,
            initial_rating: self.league.default_rating,
            decimal_places: self.league.decimal_places,
        }
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    // Validate league settings
    config.elo_config().validate()?;

    // Validate storage settings
    if config.storage.data_dir.as_os_str().is_empty() {
        return Err(anyhow!("Data directory cannot be empty"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.league.k_factor, 30.0);
        assert_eq!(config.league.default_rating, 1500.0);
        assert_eq!(config.elo_config(), EloConfig::default());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [league]
            k_factor = 16.0

            [storage]
            data_dir = "/var/lib/elo"
            "#,
        )
        .unwrap();

        assert_eq!(config.league.k_factor, 16.0);
        assert_eq!(config.league.default_rating, 1500.0);
        assert_eq!(config.service.log_level, "info");
        assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/elo"));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.service.log_level = "loud".to_string();
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.league.k_factor = 0.0;
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.storage.data_dir = PathBuf::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_from_file_missing() {
        let err = AppConfig::from_file(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
