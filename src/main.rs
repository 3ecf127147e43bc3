//! Command line entry point for the Elo League
//!
//! Each invocation rehydrates the league from the data directory, performs a
//! single operation, and exits.

use anyhow::Result;
use clap::{Parser, Subcommand};
use elo_league::config::AppConfig;
use elo_league::league::standings;
use elo_league::{CsvRatingStore, LeagueError, RatingLeague};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Elo League - Elo ratings with per-player rating logs
#[derive(Parser)]
#[command(
    name = "elo-league",
    version,
    about = "Keep Elo ratings for a league of named players",
    long_about = "Elo League registers players, applies the Elo update rule to reported \
                 match results, and prints ranked standings. Every rating change is appended \
                 to the player's CSV rating log in the data directory."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Data directory override
    #[arg(long, value_name = "DIR", help = "Override the rating log directory")]
    data_dir: Option<PathBuf>,

    /// K-factor override
    #[arg(short, long, value_name = "K", help = "Override the league K-factor")]
    k_factor: Option<f64>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit without touching any logs")]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Register a new player
    Register {
        name: String,
        /// Starting rating (defaults to the configured default rating)
        #[arg(short, long)]
        rating: Option<f64>,
    },
    /// Report that WINNER beat LOSER
    Report { winner: String, loser: String },
    /// Print the standings, highest rated first
    Rankings {
        /// Print the standings as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a player's rating history
    History { name: String },
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Display startup information
fn display_startup_banner(config: &AppConfig) {
    info!("Elo League {}", elo_league::VERSION);
    info!("   Service: {}", config.service.name);
    info!("   Log level: {}", config.service.log_level);
    info!("   K-factor: {}", config.league.k_factor);
    info!("   Default rating: {}", config.league.default_rating);
    info!("   Data directory: {}", config.storage.data_dir.display());
}

/// Load and merge configuration from file or environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(data_dir) = &args.data_dir {
        config.storage.data_dir = data_dir.clone();
    }

    if let Some(k_factor) = args.k_factor {
        config.league.k_factor = k_factor;
    }

    elo_league::config::validate_config(&config)?;
    Ok(config)
}

fn run(command: Command, config: &AppConfig) -> Result<()> {
    let store = Arc::new(CsvRatingStore::open(&config.storage.data_dir)?);
    let mut league = RatingLeague::load(store, config.elo_config())?;

    match command {
        Command::Register { name, rating } => {
            match rating {
                Some(rating) => league.register_with_rating(&name, rating)?,
                None => league.register(&name)?,
            }
            if let Some(player) = league.player(&name) {
                println!("Registered {}", player);
            }
        }
        Command::Report { winner, loser } => {
            let result = league.report_result(&winner, &loser)?;
            debug!("Expected score of winner was {:.4}", result.expected_winner);
            println!(
                "{}: {} -> {} ({:+.4})",
                result.winner.player_id,
                result.winner.old_rating,
                result.winner.new_rating,
                result.winner.delta()
            );
            println!(
                "{}: {} -> {} ({:+.4})",
                result.loser.player_id,
                result.loser.old_rating,
                result.loser.new_rating,
                result.loser.delta()
            );
        }
        Command::Rankings { json } => {
            if json {
                println!("{}", standings::render_json(&league.standings())?);
            } else {
                println!("{}", league.render_rankings());
            }
        }
        Command::History { name } => {
            let player = league.player(&name).ok_or_else(|| LeagueError::PlayerNotFound {
                missing: vec![elo_league::utils::identity_key(&name)],
            })?;
            println!("date,time,rating");
            for snapshot in player.history() {
                println!("{},{},{}", snapshot.date, snapshot.time, snapshot.rating);
            }
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration (CLI args can override environment/config file)
    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    // Initialize logging early (before any other operations)
    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    display_startup_banner(&config);

    if args.dry_run {
        info!("Configuration validation successful");
        info!("Dry run completed - exiting without touching rating logs");
        return Ok(());
    }

    let Some(command) = args.command else {
        eprintln!("No command given. Run with --help for usage.");
        std::process::exit(2);
    };

    if let Err(e) = run(command, &config) {
        error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
