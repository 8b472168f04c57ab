//! redb-based key-value cache.
//!
//! Generic `load`/`save` collaborator with no schema enforcement; the
//! store implementations are responsible for shape consistency. Values
//! are JSON-encoded under string keys in a single table.

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, TableDefinition};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Single cache table: key = entity key, value = JSON
const CACHE_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("room911_cache");

/// Well-known cache keys.
pub mod keys {
    /// Cached employee directory list.
    pub const EMPLOYEES: &str = "employees";
    /// Cached access log entries, newest first.
    pub const ACCESS_LOGS: &str = "access_logs";
    /// Cached employee sessions, newest first.
    pub const SESSIONS: &str = "employee_sessions";
    /// Active portal session pointer.
    pub const SESSION_ACTIVE: &str = "session_active";
    /// Admin bearer token.
    pub const ADMIN_TOKEN: &str = "admin_token";
    /// Admin session identity.
    pub const ADMIN_SESSION: &str = "admin_session";
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Local key-value cache.
#[derive(Clone)]
pub struct CacheStore {
    db: Arc<Database>,
}

impl CacheStore {
    /// Open or create the cache database.
    pub fn open(path: impl AsRef<Path>) -> CacheResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory cache (for testing).
    pub fn open_in_memory() -> CacheResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> CacheResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(CACHE_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Load a value by key. `Ok(None)` when the key has never been saved.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> CacheResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CACHE_TABLE)?;

        match table.get(key)? {
            Some(guard) => {
                let value: T = serde_json::from_slice(guard.value())?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Load a value by key, falling back to the type's default.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> CacheResult<T> {
        Ok(self.load(key)?.unwrap_or_default())
    }

    /// Save a value under a key, replacing any previous value.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> CacheResult<()> {
        let encoded = serde_json::to_vec(value)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CACHE_TABLE)?;
            table.insert(key, encoded.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Remove a key. Removing an absent key is not an error.
    pub fn remove(&self, key: &str) -> CacheResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CACHE_TABLE)?;
            table.remove(key)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}
