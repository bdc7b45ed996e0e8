//! In-process key-value store.
//!
//! Used by tests and by hosts that persist the document themselves.

use super::{KeyValueStore, StoreError, StoreResult};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemoryState {
    entries: BTreeMap<String, String>,
    reject_writes: bool,
    reject_reads: bool,
}

/// Shared in-memory store handle. Clones see the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with `entries`.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        if let Ok(mut state) = store.state.lock() {
            state.entries = entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect();
        }
        store
    }

    /// Makes every subsequent `set`/`remove` fail with `WriteRejected`.
    pub fn set_reject_writes(&self, reject: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.reject_writes = reject;
        }
    }

    /// Makes every subsequent `get` fail with `Unavailable`.
    pub fn set_reject_reads(&self, reject: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.reject_reads = reject;
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.state.lock().map_or(0, |state| state.entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned"))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let state = self.lock()?;
        if state.reject_reads {
            return Err(StoreError::Unavailable("memory store reads rejected"));
        }
        Ok(state.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let mut state = self.lock()?;
        if state.reject_writes {
            return Err(StoreError::WriteRejected(key.to_string()));
        }
        state.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        let mut state = self.lock()?;
        if state.reject_writes {
            return Err(StoreError::WriteRejected(key.to_string()));
        }
        state.entries.remove(key);
        Ok(())
    }
}
