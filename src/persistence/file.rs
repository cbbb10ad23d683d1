//! JSON file backend (native)

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{BestTimeRecord, BestTimeStore, PersistenceError};

/// Default file name, relative to the working directory
pub const DEFAULT_FILE: &str = "dirt_dash_best.json";

/// Best time stored as a small JSON document
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(DEFAULT_FILE)
    }
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BestTimeStore for FileStore {
    fn load_best_time(&self) -> Result<Option<Duration>, PersistenceError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path)?;
        let record: BestTimeRecord = serde_json::from_str(&json)
            .map_err(|e| PersistenceError::Malformed(e.to_string()))?;
        log::info!("Loaded best time {}ms", record.best_time_ms);
        Ok(Some(record.duration()))
    }

    fn save_best_time(&mut self, time: Duration) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(&BestTimeRecord::new(time))?;
        // Write aside then rename so a crash never leaves a torn record
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        log::info!("Best time saved to {}", self.path.display());
        Ok(())
    }
}
