//! # History Persistence
//!
//! Keeps a document's undo stack alive across reloads. The full
//! [`HistoryState`] is written as JSON under a per-document key after every
//! change. Restoring never fails: a missing, unreadable or corrupt entry
//! falls back to the caller's initial state.

use crate::errors::PersistError;
use crate::history::{History, HistoryState, SetStateOptions};
use crc32fast::Hasher;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Durable keyed storage for serialized history
pub trait HistoryStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn save(&self, key: &str, payload: &str) -> Result<(), PersistError>;
    fn remove(&self, key: &str) -> Result<(), PersistError>;
}

#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, PersistError> {
        self.entries
            .lock()
            .map_err(|_| PersistError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn save(&self, key: &str, payload: &str) -> Result<(), PersistError> {
        self.entries()?.insert(key.to_string(), payload.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistError> {
        self.entries()?.remove(key);
        Ok(())
    }
}

/// One JSON file per key under a directory
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    dir: PathBuf,
}

impl FileHistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Keys are arbitrary strings; file names are their CRC32
    pub fn path_for(&self, key: &str) -> PathBuf {
        let mut hasher = Hasher::new();
        hasher.update(key.as_bytes());
        self.dir
            .join(format!("history-{:08x}.json", hasher.finalize()))
    }
}

impl HistoryStore for FileHistoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, payload: &str) -> Result<(), PersistError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), payload)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistError> {
        match std::fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// [`History`] that writes itself through to a [`HistoryStore`]
pub struct PersistentHistory<T> {
    history: History<T>,
    key: String,
    store: Arc<dyn HistoryStore>,
}

impl<T> std::fmt::Debug for PersistentHistory<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentHistory")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl<T: Clone + Serialize + DeserializeOwned> PersistentHistory<T> {
    /// Load the history stored under `key`, or start fresh from `initial`
    pub fn restore(
        key: impl Into<String>,
        initial: T,
        capacity: usize,
        store: Arc<dyn HistoryStore>,
    ) -> Self {
        let key = key.into();
        let history = match Self::load_state(store.as_ref(), &key) {
            Ok(Some(state)) => {
                debug!(key = %key, past = state.past.len(), future = state.future.len(), "Restored history");
                History::from_state(state, capacity)
            }
            Ok(None) => History::new(initial, capacity),
            Err(error) => {
                warn!(key = %key, %error, "Could not restore history, starting fresh");
                History::new(initial, capacity)
            }
        };

        Self {
            history,
            key,
            store,
        }
    }

    fn load_state(
        store: &dyn HistoryStore,
        key: &str,
    ) -> Result<Option<HistoryState<T>>, PersistError> {
        match store.load(key)? {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn history(&self) -> &History<T> {
        &self.history
    }

    pub fn present(&self) -> &T {
        self.history.present()
    }

    /// Write the current state now
    pub fn flush(&self) -> Result<(), PersistError> {
        let payload = serde_json::to_string(&self.history.to_state())?;
        self.store.save(&self.key, &payload)
    }

    /// Move the stored history to `key`, e.g. once a draft gets a store id.
    ///
    /// The state is written under the new key before the old entry goes.
    pub fn rekey(&mut self, key: impl Into<String>) -> Result<(), PersistError> {
        let key = key.into();
        if key == self.key {
            return Ok(());
        }
        let old = std::mem::replace(&mut self.key, key);
        if let Err(error) = self.flush() {
            self.key = old;
            return Err(error);
        }
        debug!(from = %old, to = %self.key, "Moved history");
        self.store.remove(&old)
    }

    /// Persistence is best effort; editing continues if the store fails
    fn persist(&self) {
        if let Err(error) = self.flush() {
            warn!(key = %self.key, %error, "Failed to persist history");
        }
    }

    pub fn set_state(&mut self, next: T, options: SetStateOptions) {
        self.history.set_state(next, options);
        self.persist();
    }

    pub fn update(&mut self, f: impl FnOnce(&T) -> Option<T>) -> bool {
        let changed = self.history.update(f);
        if changed {
            self.persist();
        }
        changed
    }

    pub fn undo(&mut self) -> bool {
        let moved = self.history.undo();
        if moved {
            self.persist();
        }
        moved
    }

    pub fn redo(&mut self) -> bool {
        let moved = self.history.redo();
        if moved {
            self.persist();
        }
        moved
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.persist();
    }

    pub fn begin_batch(&mut self) {
        self.history.begin_batch();
    }

    pub fn end_batch(&mut self) -> bool {
        let recorded = self.history.end_batch();
        if recorded {
            self.persist();
        }
        recorded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory() -> Arc<dyn HistoryStore> {
        Arc::new(MemoryHistoryStore::new())
    }

    #[test]
    fn test_restore_round_trips_stacks() {
        let store = memory();
        let mut history = PersistentHistory::restore("page:1", 0u32, 10, store.clone());
        history.set_state(1, SetStateOptions::default());
        history.set_state(2, SetStateOptions::default());
        history.undo();

        let reloaded = PersistentHistory::restore("page:1", 0u32, 10, store);
        assert_eq!(*reloaded.present(), 1);
        assert!(reloaded.can_undo());
        assert!(reloaded.can_redo());
    }

    #[test]
    fn test_corrupt_payload_falls_back_to_initial() {
        let store = memory();
        store.save("page:2", "{not json").unwrap();

        let history = PersistentHistory::restore("page:2", 7u32, 10, store);
        assert_eq!(*history.present(), 7);
        assert!(!history.can_undo());
    }

    #[test]
    fn test_keys_are_isolated() {
        let store = memory();
        let mut a = PersistentHistory::restore("a", 0u32, 10, store.clone());
        a.set_state(5, SetStateOptions::default());

        let b = PersistentHistory::restore("b", 0u32, 10, store);
        assert_eq!(*b.present(), 0);
    }

    #[test]
    fn test_rekey_moves_stacks_to_new_key() {
        let store = memory();
        let mut history = PersistentHistory::restore("draft://1", 0u32, 10, store.clone());
        history.set_state(3, SetStateOptions::default());

        history.rekey("page://p-1").unwrap();
        assert_eq!(history.key(), "page://p-1");
        assert_eq!(store.load("draft://1").unwrap(), None);

        let reloaded = PersistentHistory::restore("page://p-1", 0u32, 10, store);
        assert_eq!(*reloaded.present(), 3);
        assert!(reloaded.can_undo());
    }

    #[test]
    fn test_file_store_writes_one_file_per_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileHistoryStore::new(dir.path().join("history"));

        assert_eq!(store.load("page://x").unwrap(), None);
        store.save("page://x", "{}").unwrap();
        assert_eq!(store.load("page://x").unwrap().as_deref(), Some("{}"));
        assert!(store.path_for("page://x").exists());
        assert_ne!(store.path_for("page://x"), store.path_for("page://y"));

        store.remove("page://x").unwrap();
        store.remove("page://x").unwrap();
        assert_eq!(store.load("page://x").unwrap(), None);
    }
}
