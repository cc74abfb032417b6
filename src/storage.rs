//! Persistence of timer state and alarms in a string key-value store.
//!
//! Records are JSON encoded with serde. The browser build uses
//! `window.localStorage`; tests and non-wasm targets use [`MemoryStore`].

use crate::alarms::Alarm;
use crate::config::{ALARMS_KEY, STATE_KEY};
use crate::engine::{Mode, TimerState};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug)]
pub enum StorageError {
    /// No storage backend is available (e.g. private browsing).
    Unavailable,
    /// The backend rejected the operation.
    Backend(String),
    Serde(serde_json::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable => write!(f, "Storage is unavailable"),
            StorageError::Backend(msg) => write!(f, "Storage backend error: {}", msg),
            StorageError::Serde(e) => write!(f, "Failed to encode/decode stored data: {}", e),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Serde(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serde(e)
    }
}

/// Snapshot of the engine written after every state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub mode: Mode,
    pub elapsed_seconds: u32,
    pub target_seconds: u32,
    pub paused: bool,
    pub running: bool,
    /// Wall-clock time of the save in milliseconds since the Unix epoch.
    pub saved_at_ms: f64,
}

impl PersistedState {
    pub fn capture(state: &TimerState, saved_at_ms: f64) -> Self {
        Self {
            mode: state.mode,
            elapsed_seconds: state.elapsed_seconds,
            target_seconds: state.target_seconds,
            paused: state.paused,
            running: state.running,
            saved_at_ms,
        }
    }

    pub fn to_timer_state(&self) -> TimerState {
        TimerState {
            mode: self.mode,
            elapsed_seconds: self.elapsed_seconds,
            target_seconds: self.target_seconds,
            running: self.running,
            paused: self.paused,
            expired: false,
        }
    }
}

/// A string key-value store.
///
/// Implementors provide the three raw operations; the typed load/save helpers
/// are built on top of them.
pub trait StateStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;

    fn load_state(&self) -> Result<Option<PersistedState>, StorageError> {
        match self.get(STATE_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn save_state(&mut self, state: &PersistedState) -> Result<(), StorageError> {
        let json = serde_json::to_string(state)?;
        self.set(STATE_KEY, &json)
    }

    fn clear_state(&mut self) -> Result<(), StorageError> {
        self.remove(STATE_KEY)
    }

    fn load_alarms(&self) -> Result<Vec<Alarm>, StorageError> {
        match self.get(ALARMS_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn save_alarms(&mut self, alarms: &[Alarm]) -> Result<(), StorageError> {
        let json = serde_json::to_string(alarms)?;
        self.set(ALARMS_KEY, &json)
    }
}

impl<T: StateStore + ?Sized> StateStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// In-process store, used by tests and outside the browser.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// `window.localStorage` backed store.
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    pub fn new() -> Result<Self, StorageError> {
        let storage = gloo_utils::window()
            .local_storage()
            .map_err(|e| StorageError::Backend(format!("{:?}", e)))?
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { storage })
    }
}

impl StateStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::Backend(format!("{:?}", e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Backend(format!("{:?}", e)))
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|e| StorageError::Backend(format!("{:?}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarms::AlarmId;

    #[test]
    fn state_survives_save_and_load() {
        let mut store = MemoryStore::new();
        assert!(store.load_state().unwrap().is_none());

        let timer = TimerState {
            mode: Mode::CountUp,
            elapsed_seconds: 42,
            target_seconds: 90,
            running: true,
            paused: false,
            expired: false,
        };
        let saved = PersistedState::capture(&timer, 1_000.0);
        store.save_state(&saved).unwrap();

        let loaded = store.load_state().unwrap().expect("state");
        assert_eq!(loaded, saved);
        assert_eq!(loaded.to_timer_state(), timer);

        store.clear_state().unwrap();
        assert!(store.load_state().unwrap().is_none());
    }

    #[test]
    fn persisted_state_uses_camel_case_keys() {
        let saved = PersistedState::capture(&TimerState::default(), 0.0);
        let json = serde_json::to_string(&saved).unwrap();
        assert!(json.contains("\"elapsedSeconds\":0"));
        assert!(json.contains("\"savedAtMs\""));
    }

    #[test]
    fn missing_alarms_load_as_empty() {
        let store = MemoryStore::new();
        assert!(store.load_alarms().unwrap().is_empty());
    }

    #[test]
    fn alarms_without_triggered_flag_default_to_pending() {
        let mut store = MemoryStore::new();
        store
            .set(ALARMS_KEY, r#"[{"id":3,"target_seconds":15}]"#)
            .unwrap();
        let alarms = store.load_alarms().unwrap();
        assert_eq!(alarms.len(), 1);
        assert_eq!(alarms[0].id, AlarmId(3));
        assert!(!alarms[0].triggered);
    }

    #[test]
    fn corrupt_state_is_reported() {
        let mut store = MemoryStore::new();
        store.set(STATE_KEY, "{not json").unwrap();
        assert!(matches!(store.load_state(), Err(StorageError::Serde(_))));
    }
}
