//! SQLite key/value storage.
//!
//! The blob lives in a single row of a `kv` table, keyed by `STORE_KEY`:
//!
//! ```sql
//! CREATE TABLE kv (key TEXT PRIMARY KEY, value TEXT NOT NULL, updated_at TEXT NOT NULL)
//! ```

use std::path::Path;
use std::sync::Mutex;

use log::debug;
use rusqlite::{Connection, OptionalExtension, params};

use super::decode_blob;
use super::traits::{STORE_KEY, Storage};
use crate::domain::RevisionStore;
use crate::error::{Result, RevisionError};

/// Embedded-database backend.
///
/// `rusqlite::Connection` is not `Sync`, so access goes through a `Mutex`.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for SqliteStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStorage").finish_non_exhaustive()
    }
}

impl SqliteStorage {
    /// Open or create a database file at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                RevisionError::Storage(format!("Failed to create directory {}: {}", parent.display(), e))
            })?;
        }

        let conn = Connection::open(path).map_err(|e| RevisionError::Storage(e.to_string()))?;
        Self::with_connection(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| RevisionError::Storage(e.to_string()))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| RevisionError::Storage(e.to_string()))?;

        Ok(Self { conn: Mutex::new(conn) })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| RevisionError::Storage(e.to_string()))
    }
}

impl Storage for SqliteStorage {
    fn load(&self) -> Result<Option<RevisionStore>> {
        let conn = self.lock()?;
        let raw: Option<String> = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![STORE_KEY], |row| row.get(0))
            .optional()
            .map_err(|e| RevisionError::Storage(e.to_string()))?;

        Ok(raw.and_then(|raw| decode_blob(&raw, "sqlite")))
    }

    fn save(&self, store: &RevisionStore) -> Result<()> {
        let json = serde_json::to_string(store)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![STORE_KEY, json, store.last_updated.to_rfc3339()],
        )
        .map_err(|e| RevisionError::Storage(e.to_string()))?;

        debug!("Saved {} problems to sqlite", store.problems.len());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM kv WHERE key = ?1", params![STORE_KEY])
            .map_err(|e| RevisionError::Storage(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Problem;
    use chrono::{DateTime, TimeZone, Utc};
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    fn sample_store() -> RevisionStore {
        let mut store = RevisionStore::empty(now());
        store.upsert(Problem::new(
            "prob-1".to_string(),
            "Two Sum".to_string(),
            "https://x/two-sum".to_string(),
            2,
            7.0,
            now(),
        ));
        store
    }

    #[test]
    fn test_empty_database_loads_none() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let store = sample_store();

        storage.save(&store).unwrap();
        assert_eq!(storage.load().unwrap(), Some(store));
    }

    #[test]
    fn test_save_overwrites_single_row() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        storage.save(&sample_store()).unwrap();
        storage.save(&RevisionStore::empty(now())).unwrap();

        let count: i64 = storage
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
        assert!(storage.load().unwrap().unwrap().problems.is_empty());
    }

    #[test]
    fn test_corrupt_row_loads_none() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        storage
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO kv (key, value, updated_at) VALUES (?1, 'garbage', '')",
                params![STORE_KEY],
            )
            .unwrap();

        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_clear() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        storage.save(&sample_store()).unwrap();

        storage.clear().unwrap();
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_persistence_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("db").join("revisions.db");

        {
            let storage = SqliteStorage::open(&path).unwrap();
            storage.save(&sample_store()).unwrap();
        }

        {
            let storage = SqliteStorage::open(&path).unwrap();
            let loaded = storage.load().unwrap().unwrap();
            assert_eq!(loaded.problems[0].link, "https://x/two-sum");
        }
    }
}
