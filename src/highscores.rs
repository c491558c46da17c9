//! Best score persistence
//!
//! Stored as a small JSON file next to the executable. Read once at startup,
//! written only when a finished run beats the stored value.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default file name for the best score
pub const BEST_SCORE_FILE: &str = "best_score.json";

/// Failure reading or writing one of the JSON side files
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to read/write file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("file {path} is not valid JSON for this type: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, PersistError> {
    let text = fs::read_to_string(path).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| PersistError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| PersistError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// The single best score ever reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BestScore {
    pub score: u64,
}

impl BestScore {
    pub fn new(score: u64) -> Self {
        Self { score }
    }

    /// Record a finished run. Returns true if it set a new best.
    pub fn record(&mut self, score: u64) -> bool {
        if score > self.score {
            self.score = score;
            true
        } else {
            false
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, PersistError> {
        read_json(path)
    }

    /// Load the stored best, starting fresh if the file is missing or unreadable
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(best) => {
                log::info!("Loaded best score {}", best.score);
                best
            }
            Err(PersistError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                log::info!("No best score found, starting fresh");
                Self::default()
            }
            Err(err) => {
                log::warn!("Could not load best score: {err}");
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PersistError> {
        write_json(path, self)?;
        log::info!("Best score {} saved", self.score);
        Ok(())
    }
}
