//! Local snapshot cache contracts and SQLite implementation.
//!
//! # Responsibility
//! - Keyed read/write of the JSON-encoded snapshot.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - The cache stores raw text; corruption is only detectable by the caller
//!   failing to parse what `read` returns.
//! - `write` is a full replace of the entry under the key.

use crate::db::{open_db, open_db_in_memory, DbError};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Fixed key the application snapshot lives under.
pub const SNAPSHOT_CACHE_KEY: &str = "app_data_v1";

pub type CacheResult<T> = Result<T, CacheError>;

#[derive(Debug)]
pub enum CacheError {
    Db(DbError),
    /// The backing store refused the operation for a non-SQL reason.
    Unavailable(String),
}

impl Display for CacheError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "local cache unavailable: {message}"),
        }
    }
}

impl Error for CacheError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for CacheError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for CacheError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Keyed text storage scoped to the running environment.
pub trait LocalCache {
    /// Returns the stored payload, `None` when the key was never written.
    fn read(&self, key: &str) -> CacheResult<Option<String>>;
    /// Replaces the payload stored under `key`.
    fn write(&self, key: &str, payload: &str) -> CacheResult<()>;
}

/// SQLite-backed cache.
pub struct SqliteSnapshotCache {
    conn: Connection,
}

impl SqliteSnapshotCache {
    /// Wraps a connection that already has migrations applied.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn open(path: impl AsRef<Path>) -> CacheResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn open_in_memory() -> CacheResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl LocalCache for SqliteSnapshotCache {
    fn read(&self, key: &str) -> CacheResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM snapshot_cache WHERE cache_key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn write(&self, key: &str, payload: &str) -> CacheResult<()> {
        self.conn.execute(
            "INSERT INTO snapshot_cache (cache_key, payload, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(cache_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at;",
            params![key, payload],
        )?;
        Ok(())
    }
}

impl<C: LocalCache + ?Sized> LocalCache for Box<C> {
    fn read(&self, key: &str) -> CacheResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, payload: &str) -> CacheResult<()> {
        (**self).write(key, payload)
    }
}
