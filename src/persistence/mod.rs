//! Best-time persistence
//!
//! The simulation only ever sees a single optional duration. Backends:
//! - `MemoryStore`: in-process (tests, headless runs)
//! - `FileStore`: JSON record on disk (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm32)

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Malformed best time record: {0}")]
    Malformed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the best time lives
pub trait BestTimeStore {
    /// `Ok(None)` when no record exists yet
    fn load_best_time(&self) -> Result<Option<Duration>, PersistenceError>;
    fn save_best_time(&mut self, time: Duration) -> Result<(), PersistenceError>;
}

/// On-disk / serialized shape of the record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestTimeRecord {
    pub best_time_ms: u64,
}

impl BestTimeRecord {
    pub fn new(time: Duration) -> Self {
        Self {
            best_time_ms: time.as_millis().min(u64::MAX as u128) as u64,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.best_time_ms)
    }
}

/// Does `time` beat the current best?
pub fn beats(best: Option<Duration>, time: Duration) -> bool {
    best.is_none_or(|b| time < b)
}

/// Best time kept in memory only
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best: Option<Duration>,
    /// Number of successful saves
    pub saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best(time: Duration) -> Self {
        Self {
            best: Some(time),
            saves: 0,
        }
    }
}

impl BestTimeStore for MemoryStore {
    fn load_best_time(&self) -> Result<Option<Duration>, PersistenceError> {
        Ok(self.best)
    }

    fn save_best_time(&mut self, time: Duration) -> Result<(), PersistenceError> {
        self.best = Some(time);
        self.saves += 1;
        Ok(())
    }
}

/// A store that is never available (private browsing, read-only disks, ...)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

impl BestTimeStore for NullStore {
    fn load_best_time(&self) -> Result<Option<Duration>, PersistenceError> {
        Err(PersistenceError::Unavailable("no storage backend".into()))
    }

    fn save_best_time(&mut self, _time: Duration) -> Result<(), PersistenceError> {
        Err(PersistenceError::Unavailable("no storage backend".into()))
    }
}
