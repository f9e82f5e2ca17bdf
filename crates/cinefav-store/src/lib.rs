//! Local persistence for the favorites list.
//!
//! A [`FavoritesStore`] keeps one JSON array under a fixed key in an
//! injected [`KeyValueStorage`]. Two backends are provided: an in-memory
//! map and a `rusqlite` (bundled `SQLite`) file.

mod connection;
/// Favorites load/save operations.
pub mod favorites;
mod migrations;
mod sqlite;
mod storage;

#[allow(clippy::module_name_repetitions)]
pub use favorites::{FAVORITES_KEY, FavoritesLoad, FavoritesStore};
pub use sqlite::SqliteStorage;
#[allow(clippy::module_name_repetitions)]
pub use storage::{KeyValueStorage, MemoryStorage};
