//! `SQLite`-backed key-value storage.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};

use super::connection::{open_db, open_in_memory_db};
use super::storage::KeyValueStorage;

/// Durable key-value storage in a single `kv` table.
///
/// A panic while the connection is locked does not disable the store. Each
/// statement is atomic, so the connection stays usable.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Opens (or creates) the on-disk store.
    ///
    /// - If `dir` is `Some`, uses `{dir}/cinefav.db`.
    /// - Otherwise uses `~/.local/share/cinefav/cinefav.db`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(dir: Option<&PathBuf>) -> Result<Self> {
        let conn = open_db(dir)?;
        Ok(Self::from_connection(conn))
    }

    /// Opens a store that lives only as long as the instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_in_memory() -> Result<Self> {
        let conn = open_in_memory_db()?;
        Ok(Self::from_connection(conn))
    }

    const fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

impl KeyValueStorage for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);

        conn.query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()
        .with_context(|| format!("failed to read key {key}"))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);

        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![key, value],
        )
        .with_context(|| format!("failed to write key {key}"))?;

        Ok(())
    }
}
