//! Favorites list persistence with a fail-open boundary.
//!
//! The list is stored as one JSON array under [`FAVORITES_KEY`]. The strict
//! operations (`try_load`, `try_save`) return every failure to the caller.
//! The public convenience operations (`load_favorites`, `save_favorites`)
//! report failures through `tracing` and fall back to an empty list or a
//! no-op, so a broken store never interrupts the caller. `update` never
//! writes over a list it failed to read.

use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::error::Category;

use super::storage::KeyValueStorage;

/// Storage key holding the serialized favorites list.
pub const FAVORITES_KEY: &str = "movie-app-favorites";

/// Outcome of reading the favorites slot.
#[derive(Debug)]
pub enum FavoritesLoad<T> {
    /// Nothing has been saved yet.
    Absent,
    /// The stored list decoded successfully.
    Loaded(Vec<T>),
    /// The slot could not be read or decoded.
    Unreadable(anyhow::Error),
}

impl<T> FavoritesLoad<T> {
    /// Applies the fail-open policy: anything other than a decoded list
    /// becomes an empty list.
    ///
    /// An `Unreadable` outcome is logged at ERROR level.
    #[must_use]
    pub fn into_favorites(self) -> Vec<T> {
        match self {
            Self::Absent => Vec::new(),
            Self::Loaded(favorites) => favorites,
            Self::Unreadable(err) => {
                tracing::error!(error = ?err, "failed to load favorites");
                Vec::new()
            }
        }
    }
}

/// Favorites list stored in an injected [`KeyValueStorage`].
///
/// The element type is chosen per call, so the store stays opaque to the
/// content it persists.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct FavoritesStore<S> {
    storage: S,
    /// Serializes writers within this process.
    write_lock: Mutex<()>,
}

impl<S: KeyValueStorage> FavoritesStore<S> {
    /// Wraps the given storage.
    pub const fn new(storage: S) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the underlying storage.
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Reads and decodes the stored list.
    ///
    /// Returns `Ok(None)` when the slot is absent or holds an empty string.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails or the stored value is not
    /// a JSON array of `T`.
    pub fn try_load<T: DeserializeOwned>(&self) -> Result<Option<Vec<T>>> {
        let Some(raw) = self.read_raw()? else {
            return Ok(None);
        };
        let favorites =
            decode(&raw).context("stored favorites are not a JSON array of favorites")?;
        Ok(Some(favorites))
    }

    /// Reads the stored list as a tagged outcome.
    pub fn load<T: DeserializeOwned>(&self) -> FavoritesLoad<T> {
        match self.try_load() {
            Ok(None) => FavoritesLoad::Absent,
            Ok(Some(favorites)) => FavoritesLoad::Loaded(favorites),
            Err(err) => FavoritesLoad::Unreadable(err),
        }
    }

    /// Returns the stored favorites, or an empty list if none are stored or
    /// the slot is unreadable.
    pub fn load_favorites<T: DeserializeOwned>(&self) -> Vec<T> {
        self.load().into_favorites()
    }

    /// Serializes `favorites` and overwrites the stored list.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the storage write fails.
    pub fn try_save<T: Serialize>(&self, favorites: &[T]) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.write_unlocked(favorites)
    }

    /// Overwrites the stored list. Failures are logged and otherwise ignored.
    pub fn save_favorites<T: Serialize>(&self, favorites: &[T]) {
        if let Err(err) = self.try_save(favorites) {
            tracing::error!(error = ?err, "failed to save favorites");
        }
    }

    /// Loads the list, lets `f` modify it, and saves the result.
    ///
    /// The whole sequence holds the writer lock, so concurrent updates on
    /// the same store never lose each other's changes. Returns the list as
    /// it was written, or `None` when nothing was written because the
    /// stored list could not be read.
    ///
    /// A failed storage read, or valid JSON that is not a list of `T`, skips
    /// the write so the stored data is left untouched. A slot holding text
    /// that is not JSON at all is replaced. Every failure is logged at ERROR
    /// level. A failed write is logged and the list is still returned.
    pub fn update<T, F>(&self, f: F) -> Option<Vec<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>),
    {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let raw = match self.read_raw() {
            Ok(raw) => raw,
            Err(err) => {
                tracing::error!(error = ?err, "failed to read favorites; update skipped");
                return None;
            }
        };

        let mut favorites = match raw.as_deref().map(decode::<T>) {
            None => Vec::new(),
            Some(Ok(favorites)) => favorites,
            Some(Err(err)) if matches!(err.classify(), Category::Syntax | Category::Eof) => {
                tracing::error!(error = ?err, "stored favorites are not JSON; replacing them");
                Vec::new()
            }
            Some(Err(err)) => {
                tracing::error!(
                    error = ?err,
                    "stored favorites do not match the expected shape; update skipped"
                );
                return None;
            }
        };
        f(&mut favorites);

        if let Err(err) = self.write_unlocked(&favorites) {
            tracing::error!(error = ?err, "failed to save favorites");
        }
        Some(favorites)
    }

    /// Reads the raw slot. An empty string counts as absent.
    fn read_raw(&self) -> Result<Option<String>> {
        let raw = self
            .storage
            .get(FAVORITES_KEY)
            .context("failed to read favorites from storage")?;
        Ok(raw.filter(|value| !value.is_empty()))
    }

    /// Writes without taking the writer lock. Callers must hold it.
    fn write_unlocked<T: Serialize>(&self, favorites: &[T]) -> Result<()> {
        let raw = serde_json::to_string(favorites).context("failed to serialize favorites")?;
        self.storage
            .set(FAVORITES_KEY, &raw)
            .context("failed to write favorites to storage")
    }
}

/// Decodes a stored JSON array.
fn decode<T: DeserializeOwned>(raw: &str) -> serde_json::Result<Vec<T>> {
    serde_json::from_str(raw)
}
