//! Rating log storage interface and implementations
//!
//! Every player owns one append-only log of rating snapshots. Logs are keyed by
//! the player's identity; the store is the only authority on whether a log exists.

use crate::error::{LeagueError, Result};
use crate::types::{PlayerId, RatingSnapshot};
use anyhow::Context;
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

/// Column names of a persisted rating log
pub const LOG_HEADER: [&str; 3] = ["date", "time", "rating"];

/// File extension of persisted rating logs
const LOG_EXTENSION: &str = "csv";

/// Trait for rating log storage operations
pub trait RatingStore: Send + Sync {
    /// Whether a log exists for the identity
    fn contains(&self, identity: &str) -> Result<bool>;

    /// Allocate a new log holding its first snapshot.
    ///
    /// Fails with [`LeagueError::DuplicateIdentity`] if the log already exists;
    /// an existing log is never touched.
    fn create_log(&self, identity: &str, first: &RatingSnapshot) -> Result<()>;

    /// Append one snapshot to an existing log
    fn append(&self, identity: &str, snapshot: &RatingSnapshot) -> Result<()>;

    /// Read back the full log, oldest snapshot first
    fn history(&self, identity: &str) -> Result<Vec<RatingSnapshot>>;

    /// All identities with a log, sorted
    fn identities(&self) -> Result<Vec<PlayerId>>;
}

/// Rating logs stored as one CSV file per player in a shared directory
#[derive(Debug, Clone)]
pub struct CsvRatingStore {
    dir: PathBuf,
}

impl CsvRatingStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;

        Ok(Self { dir })
    }

    /// Canonical log file for an identity
    pub fn log_path(&self, identity: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", identity, LOG_EXTENSION))
    }

    fn read_log(&self, identity: &str, path: &Path) -> Result<Vec<RatingSnapshot>> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Failed to open rating log {}", path.display()))?;

        let headers = reader
            .headers()
            .with_context(|| format!("Failed to read header of {}", path.display()))?;
        if headers.iter().ne(LOG_HEADER.iter().copied()) {
            let found: Vec<&str> = headers.iter().collect();
            return Err(LeagueError::CorruptLog {
                identity: identity.to_string(),
                reason: format!("unexpected header '{}'", found.join(",")),
            }
            .into());
        }

        let mut history = Vec::new();
        for (row, record) in reader.deserialize::<RatingSnapshot>().enumerate() {
            let snapshot = record.map_err(|e| LeagueError::CorruptLog {
                identity: identity.to_string(),
                reason: format!("row {}: {}", row + 1, e),
            })?;
            history.push(snapshot);
        }

        Ok(history)
    }

    /// Write a new log under a temporary name in the data directory, then move
    /// it to the canonical path without replacing an existing file.
    ///
    /// The canonical log only appears once it is fully written. On any failure
    /// the staged file is removed along with its handle.
    fn write_new_log<F>(&self, identity: &str, write: F) -> Result<()>
    where
        F: FnOnce(&mut csv::Writer<&mut File>) -> Result<()>,
    {
        let path = self.log_path(identity);
        let mut staged = tempfile::Builder::new()
            .prefix(".")
            .suffix(".tmp")
            .tempfile_in(&self.dir)
            .with_context(|| format!("Failed to create rating log {}", path.display()))?;

        let mut writer = csv::Writer::from_writer(staged.as_file_mut());
        write(&mut writer)
            .with_context(|| format!("Failed to write rating log {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush rating log {}", path.display()))?;
        drop(writer);

        match staged.persist_noclobber(&path) {
            Ok(_) => Ok(()),
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                Err(LeagueError::DuplicateIdentity {
                    identity: identity.to_string(),
                }
                .into())
            }
            Err(e) => Err(e.error)
                .with_context(|| format!("Failed to create rating log {}", path.display())),
        }
    }
}

impl RatingStore for CsvRatingStore {
    fn contains(&self, identity: &str) -> Result<bool> {
        Ok(self.log_path(identity).is_file())
    }

    fn create_log(&self, identity: &str, first: &RatingSnapshot) -> Result<()> {
        debug!("Writing headers to {}", self.log_path(identity).display());
        self.write_new_log(identity, |writer| writer.serialize(first).map_err(Into::into))
    }

    fn append(&self, identity: &str, snapshot: &RatingSnapshot) -> Result<()> {
        let path = self.log_path(identity);
        if !path.is_file() {
            return Err(LeagueError::PlayerNotFound {
                missing: vec![identity.to_string()],
            }
            .into());
        }

        let file = OpenOptions::new()
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open rating log {}", path.display()))?;

        debug!("Writing {} rating data to {}", identity, path.display());
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer
            .serialize(snapshot)
            .with_context(|| format!("Failed to append to rating log {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush rating log {}", path.display()))?;

        Ok(())
    }

    fn history(&self, identity: &str) -> Result<Vec<RatingSnapshot>> {
        let path = self.log_path(identity);
        if !path.is_file() {
            return Err(LeagueError::PlayerNotFound {
                missing: vec![identity.to_string()],
            }
            .into());
        }

        self.read_log(identity, &path)
    }

    fn identities(&self) -> Result<Vec<PlayerId>> {
        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to list data directory {}", self.dir.display()))?;

        let mut identities = Vec::new();
        for entry in entries {
            let path = entry
                .with_context(|| format!("Failed to list data directory {}", self.dir.display()))?
                .path();

            let is_log = path.extension().and_then(|ext| ext.to_str()) == Some(LOG_EXTENSION);
            if !is_log || !path.is_file() {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                identities.push(stem.to_string());
            }
        }

        identities.sort();
        Ok(identities)
    }
}

/// In-memory rating log storage
#[derive(Debug, Default)]
pub struct InMemoryRatingStore {
    logs: RwLock<BTreeMap<PlayerId, Vec<RatingSnapshot>>>,
}

impl InMemoryRatingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RatingStore for InMemoryRatingStore {
    fn contains(&self, identity: &str) -> Result<bool> {
        let logs = self.logs.read().map_err(|_| LeagueError::StorageError {
            message: "Failed to acquire rating logs read lock".to_string(),
        })?;

        Ok(logs.contains_key(identity))
    }

    fn create_log(&self, identity: &str, first: &RatingSnapshot) -> Result<()> {
        let mut logs = self.logs.write().map_err(|_| LeagueError::StorageError {
            message: "Failed to acquire rating logs write lock".to_string(),
        })?;

        if logs.contains_key(identity) {
            return Err(LeagueError::DuplicateIdentity {
                identity: identity.to_string(),
            }
            .into());
        }

        logs.insert(identity.to_string(), vec![first.clone()]);
        Ok(())
    }

    fn append(&self, identity: &str, snapshot: &RatingSnapshot) -> Result<()> {
        let mut logs = self.logs.write().map_err(|_| LeagueError::StorageError {
            message: "Failed to acquire rating logs write lock".to_string(),
        })?;

        let log = logs
            .get_mut(identity)
            .ok_or_else(|| LeagueError::PlayerNotFound {
                missing: vec![identity.to_string()],
            })?;

        log.push(snapshot.clone());
        Ok(())
    }

    fn history(&self, identity: &str) -> Result<Vec<RatingSnapshot>> {
        let logs = self.logs.read().map_err(|_| LeagueError::StorageError {
            message: "Failed to acquire rating logs read lock".to_string(),
        })?;

        logs.get(identity).cloned().ok_or_else(|| {
            LeagueError::PlayerNotFound {
                missing: vec![identity.to_string()],
            }
            .into()
        })
    }

    fn identities(&self) -> Result<Vec<PlayerId>> {
        let logs = self.logs.read().map_err(|_| LeagueError::StorageError {
            message: "Failed to acquire rating logs read lock".to_string(),
        })?;

        Ok(logs.keys().cloned().collect())
    }
}
