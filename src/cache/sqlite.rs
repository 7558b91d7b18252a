use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::CacheBackend;
use crate::error::Result;
use crate::paths;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens the shared database file used by the cache and the job queue.
pub(crate) fn connect(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(db_path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(conn)
}

/// Default location of the database file.
pub fn default_db_path() -> PathBuf {
    paths::cache_dir().join("subtranslate.db")
}

/// SQLite-backed cache that survives restarts and is shared between the
/// request path and the job runner.
#[derive(Debug, Clone)]
pub struct SqliteCache {
    db_path: PathBuf,
}

impl SqliteCache {
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self> {
        let cache = Self {
            db_path: db_path.into(),
        };
        cache.init_db()?;
        Ok(cache)
    }

    fn init_db(&self) -> Result<()> {
        let conn = connect(&self.db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS cache_entries (
                cache_key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                expires_at INTEGER,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;

        Ok(())
    }

    /// Removes every expired entry, returning how many were dropped.
    pub fn purge_expired(&self) -> Result<usize> {
        let conn = connect(&self.db_path)?;
        let removed = conn.execute(
            "DELETE FROM cache_entries
             WHERE expires_at IS NOT NULL AND expires_at <= CAST(strftime('%s', 'now') AS INTEGER)",
            [],
        )?;
        Ok(removed)
    }
}

impl CacheBackend for SqliteCache {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = connect(&self.db_path)?;

        let value = conn
            .query_row(
                "SELECT value FROM cache_entries
                 WHERE cache_key = ?1
                   AND (expires_at IS NULL OR expires_at > CAST(strftime('%s', 'now') AS INTEGER))",
                [key],
                |row| row.get(0),
            )
            .optional()?;

        Ok(value)
    }

    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let conn = connect(&self.db_path)?;
        // A TTL too large to represent never expires.
        let ttl_secs = ttl.and_then(|ttl| i64::try_from(ttl.as_secs()).ok());

        conn.execute(
            "INSERT OR REPLACE INTO cache_entries (cache_key, value, expires_at)
             VALUES (?1, ?2, CASE WHEN ?3 IS NULL THEN NULL
                                  ELSE CAST(strftime('%s', 'now') AS INTEGER) + ?3 END)",
            params![key, value, ttl_secs],
        )?;

        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let conn = connect(&self.db_path)?;
        conn.execute("DELETE FROM cache_entries WHERE cache_key = ?1", [key])?;
        Ok(())
    }
}
