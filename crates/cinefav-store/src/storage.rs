//! Key-value storage capability and the in-memory backend.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use anyhow::Result;

/// A string key-value slot store.
///
/// Injected into [`FavoritesStore`](crate::FavoritesStore) so the favorites
/// logic never touches a concrete storage facility.
pub trait KeyValueStorage: Send + Sync {
    /// Reads the raw value stored under `key`.
    ///
    /// Returns `Ok(None)` when no value has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage facility cannot be accessed.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage facility rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Process-local storage backed by a `HashMap`.
///
/// Values live as long as the instance.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(String::from(key), String::from(value));
        Ok(())
    }
}
