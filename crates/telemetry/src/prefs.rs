//! Flat user-preferences record and its storage seam.
//!
//! Persistence itself belongs to the host (the web app keeps this in
//! localStorage); the engine only defines the record and the trait.

use serde::{Deserialize, Serialize};

use crate::route::RouteKind;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub theme: Theme,
    pub route_kind: RouteKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefsError {
    NotFound,
    StorageUnavailable,
    Corrupt(String),
    Io(String),
}

impl std::fmt::Display for PrefsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrefsError::NotFound => write!(f, "preferences not found"),
            PrefsError::StorageUnavailable => write!(f, "preference storage unavailable"),
            PrefsError::Corrupt(msg) => write!(f, "preference storage corrupt: {msg}"),
            PrefsError::Io(msg) => write!(f, "preference storage error: {msg}"),
        }
    }
}

impl std::error::Error for PrefsError {}

pub trait PrefsStore {
    fn load(&self) -> Result<Preferences, PrefsError>;
    fn save(&mut self, prefs: Preferences) -> Result<(), PrefsError>;
}

/// Loads preferences, falling back to defaults when the record is missing
/// or unreadable. Preference loss is never fatal to the dashboard.
pub fn load_or_default(store: &dyn PrefsStore) -> Preferences {
    store.load().unwrap_or_default()
}

/// In-memory store. Keeps the serialized form so the serde path is the one
/// exercised, exactly as a browser-storage implementation would.
#[derive(Debug, Default)]
pub struct MemoryPrefsStore {
    raw: Option<String>,
}

impl MemoryPrefsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the raw record, for driving the corrupt-storage path.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
        }
    }
}

impl PrefsStore for MemoryPrefsStore {
    fn load(&self) -> Result<Preferences, PrefsError> {
        let raw = self.raw.as_ref().ok_or(PrefsError::NotFound)?;
        serde_json::from_str(raw).map_err(|e| PrefsError::Corrupt(e.to_string()))
    }

    fn save(&mut self, prefs: Preferences) -> Result<(), PrefsError> {
        let raw = serde_json::to_string(&prefs).map_err(|e| PrefsError::Io(e.to_string()))?;
        self.raw = Some(raw);
        Ok(())
    }
}
