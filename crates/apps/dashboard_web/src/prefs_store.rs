//! Preferences persistence backed by browser localStorage.

use telemetry::prefs::{Preferences, PrefsError, PrefsStore};
use web_sys::Storage;

const PREFS_KEY: &str = "traffic-dashboard.prefs";

#[derive(Debug, Default)]
pub struct LocalStoragePrefsStore;

fn storage() -> Result<Storage, PrefsError> {
    web_sys::window()
        .ok_or(PrefsError::StorageUnavailable)?
        .local_storage()
        .map_err(|_| PrefsError::StorageUnavailable)?
        .ok_or(PrefsError::StorageUnavailable)
}

impl PrefsStore for LocalStoragePrefsStore {
    fn load(&self) -> Result<Preferences, PrefsError> {
        let raw = storage()?
            .get_item(PREFS_KEY)
            .map_err(|_| PrefsError::Io("localStorage read failed".to_string()))?
            .ok_or(PrefsError::NotFound)?;
        serde_json::from_str(&raw).map_err(|e| PrefsError::Corrupt(e.to_string()))
    }

    fn save(&mut self, prefs: Preferences) -> Result<(), PrefsError> {
        let raw = serde_json::to_string(&prefs).map_err(|e| PrefsError::Io(e.to_string()))?;
        storage()?
            .set_item(PREFS_KEY, &raw)
            .map_err(|_| PrefsError::Io("localStorage write failed".to_string()))
    }
}
