//! Calculation history.
//!
//! An ordered list of the most recent accepted expressions. Appending the
//! same expression twice in a row records it once, and only the newest
//! [`MAX_ENTRIES`] are kept.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Number of expressions kept.
pub const MAX_ENTRIES: usize = 50;

/// Somewhere successful expressions are recorded.
pub trait HistorySink {
    /// Record an expression.
    fn append(&mut self, expression: &str);

    /// All recorded expressions, oldest first.
    fn read_all(&self) -> &[String];
}

/// In-memory history.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct History {
    entries: Vec<String>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a history from stored entries, keeping the newest ones.
    pub fn from_entries(mut entries: Vec<String>) -> Self {
        if entries.len() > MAX_ENTRIES {
            entries.drain(..entries.len() - MAX_ENTRIES);
        }
        Self { entries }
    }

    /// Append unless `expression` equals the newest entry.
    ///
    /// Returns whether the history changed.
    fn push(&mut self, expression: &str) -> bool {
        if self.entries.last().is_some_and(|last| last == expression) {
            return false;
        }
        self.entries.push(expression.to_string());
        if self.entries.len() > MAX_ENTRIES {
            self.entries.remove(0);
        }
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl HistorySink for History {
    fn append(&mut self, expression: &str) {
        self.push(expression);
    }

    fn read_all(&self) -> &[String] {
        &self.entries
    }
}

/// Errors reading or writing the history file.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to access history file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed history file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// On-disk layout of the store. Keys other than the history are carried
/// through untouched.
#[derive(Debug, Default, Deserialize, Serialize)]
struct StoreFile {
    #[serde(default)]
    calc_history: StoredHistory,
    #[serde(flatten)]
    other: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct StoredHistory {
    #[serde(default)]
    data: Vec<String>,
}

/// History persisted to a JSON file after every change.
#[derive(Debug)]
pub struct FileHistory {
    path: PathBuf,
    history: History,
    other: serde_json::Map<String, serde_json::Value>,
}

impl FileHistory {
    /// Load the history at `path`. A missing file is an empty history.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, HistoryError> {
        let path = path.into();

        let store = match fs::read_to_string(&path) {
            Ok(contents) => {
                serde_json::from_str::<StoreFile>(&contents).map_err(|source| {
                    HistoryError::Json {
                        path: path.clone(),
                        source,
                    }
                })?
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => StoreFile::default(),
            Err(source) => return Err(HistoryError::Io { path, source }),
        };

        debug!(path = %path.display(), entries = store.calc_history.data.len(), "Loaded history");

        Ok(Self {
            history: History::from_entries(store.calc_history.data),
            other: store.other,
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), HistoryError> {
        let io_error = |source| HistoryError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let store = StoreFile {
            calc_history: StoredHistory {
                data: self.history.read_all().to_vec(),
            },
            other: self.other.clone(),
        };
        let json = serde_json::to_string_pretty(&store).map_err(|source| HistoryError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(io_error)
    }
}

impl HistorySink for FileHistory {
    /// Append and persist. A failed write is logged; the in-memory
    /// history still changes.
    fn append(&mut self, expression: &str) {
        if !self.history.push(expression) {
            return;
        }
        if let Err(e) = self.save() {
            warn!("Failed to save history: {}", e);
        }
    }

    fn read_all(&self) -> &[String] {
        self.history.read_all()
    }
}
