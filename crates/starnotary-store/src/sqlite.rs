//! SQLite implementation of the KeyValueStore trait.
//!
//! This is the primary storage backend for the ledger. It uses rusqlite
//! with bundled SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::KeyValueStore;

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file (and any missing parent directories) and runs
    /// migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        tracing::debug!(path = %path.display(), "opened sqlite store");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Task(format!("spawn_blocking failed: {}", e)))?
    }
}

fn to_sql_key(key: u64) -> Result<i64> {
    i64::try_from(key).map_err(|_| StoreError::InvalidData(format!("key {} out of range", key)))
}

fn from_sql_key(key: i64) -> Result<u64> {
    u64::try_from(key).map_err(|_| StoreError::InvalidData(format!("negative key {}", key)))
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: u64) -> Result<Option<Vec<u8>>> {
        let key = to_sql_key(key)?;
        self.with_conn(move |conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM blocks WHERE height = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(value)
        })
        .await
    }

    async fn put(&self, key: u64, value: &[u8]) -> Result<()> {
        let key = to_sql_key(key)?;
        let value = value.to_vec();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO blocks (height, value) VALUES (?1, ?2)
                 ON CONFLICT(height) DO UPDATE SET value = excluded.value",
                params![key, value],
            )?;
            Ok(())
        })
        .await
    }

    async fn scan_all(&self) -> Result<Vec<(u64, Vec<u8>)>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT height, value FROM blocks ORDER BY height")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, Vec<u8>>(1)?))
            })?;

            let mut entries = Vec::new();
            for row in rows {
                let (key, value) = row?;
                entries.push((from_sql_key(key)?, value));
            }
            Ok(entries)
        })
        .await
    }

    async fn count(&self) -> Result<u64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM blocks", [], |row| row.get(0))?;
            from_sql_key(count)
        })
        .await
    }
}
