//! Browser LocalStorage backend (wasm32)

use std::time::Duration;

use super::{BestTimeStore, PersistenceError};

/// Best time stored as integer milliseconds under a single key
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    const STORAGE_KEY: &'static str = "dirt_dash_best";

    pub fn new() -> Self {
        Self
    }

    fn storage() -> Result<web_sys::Storage, PersistenceError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| PersistenceError::Unavailable("LocalStorage".into()))
    }
}

impl BestTimeStore for LocalStorageStore {
    fn load_best_time(&self) -> Result<Option<Duration>, PersistenceError> {
        let storage = Self::storage()?;
        let Ok(Some(value)) = storage.get_item(Self::STORAGE_KEY) else {
            return Ok(None);
        };
        let ms: u64 = value
            .trim()
            .parse()
            .map_err(|_| PersistenceError::Malformed(value.clone()))?;
        log::info!("Loaded best time {}ms", ms);
        Ok(Some(Duration::from_millis(ms)))
    }

    fn save_best_time(&mut self, time: Duration) -> Result<(), PersistenceError> {
        let storage = Self::storage()?;
        storage
            .set_item(Self::STORAGE_KEY, &time.as_millis().to_string())
            .map_err(|_| PersistenceError::Unavailable("LocalStorage write".into()))?;
        log::info!("Best time saved");
        Ok(())
    }
}
