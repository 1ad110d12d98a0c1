//! High score persistence
//!
//! A single `{ "high_score": N }` record in a JSON file. A missing or
//! malformed file reads as 0; writes only ever happen when the score rose.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to write high score file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize high score: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The persisted record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    #[serde(default)]
    pub high_score: u64,
}

/// Where the high score lives
pub trait HighScoreStore {
    /// Read the stored high score, defaulting to 0
    fn load(&mut self) -> u64;

    /// Overwrite the stored high score
    fn save(&mut self, high_score: u64) -> Result<(), PersistenceError>;
}

/// JSON file store
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data-local-dir>/brick-breaker/stats.json`, or `./stats.json` when the
    /// platform has no data directory
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .map(|dir| dir.join("brick-breaker").join("stats.json"))
            .unwrap_or_else(|| PathBuf::from("stats.json"))
    }
}

impl HighScoreStore for FileStore {
    fn load(&mut self) -> u64 {
        if !self.path.exists() {
            log::info!("No high score file at {:?}, starting from 0", self.path);
            return 0;
        }

        match fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str::<HighScoreRecord>(&contents) {
                Ok(record) => {
                    log::info!(
                        "Loaded high score {} from {:?}",
                        record.high_score,
                        self.path
                    );
                    record.high_score
                }
                Err(e) => {
                    log::warn!("Malformed high score file {:?}: {}", self.path, e);
                    0
                }
            },
            Err(e) => {
                log::warn!("Failed to read high score file {:?}: {}", self.path, e);
                0
            }
        }
    }

    fn save(&mut self, high_score: u64) -> Result<(), PersistenceError> {
        let io_err = |source| PersistenceError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string(&HighScoreRecord { high_score })?;
        fs::write(&self.path, json).map_err(io_err)?;
        log::info!("Saved high score {} to {:?}", high_score, self.path);
        Ok(())
    }
}

/// In-memory store that counts writes
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub high_score: u64,
    pub writes: u32,
}

impl MemoryStore {
    pub fn with_score(high_score: u64) -> Self {
        Self {
            high_score,
            writes: 0,
        }
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&mut self) -> u64 {
        self.high_score
    }

    fn save(&mut self, high_score: u64) -> Result<(), PersistenceError> {
        self.high_score = high_score;
        self.writes += 1;
        Ok(())
    }
}
