//! Flat key-value string store contracts.
//!
//! # Responsibility
//! - Define the persistence seam used by typed repositories.
//! - Provide in-memory and SQLite-backed implementations.
//!
//! # Invariants
//! - Values are opaque UTF-8 strings; typing lives in `repo`.
//! - `set` overwrites the full value for a key.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory_store;
mod sqlite_store;

pub use memory_store::MemoryStore;
pub use sqlite_store::SqliteStore;

/// Key holding the JSON task array.
pub const TASKS_KEY: &str = "todo-react-tasks";
/// Key holding the reminder enabled flag (`"true"` / `"false"`).
pub const NOTIFICATIONS_ENABLED_KEY: &str = "taskmaster-notifications-enabled";

pub type StoreResult<T> = Result<T, StoreError>;

/// Store transport failures.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// The backing store refused the write (quota, read-only host, ...).
    WriteRejected(String),
    /// The store handle can no longer be used (poisoned lock, closed host).
    Unavailable(&'static str),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::WriteRejected(key) => write!(f, "store rejected write for key `{key}`"),
            Self::Unavailable(details) => write!(f, "store unavailable: {details}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::WriteRejected(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistent string store keyed by flat names.
///
/// Implementations are cheap handles: clones observe the same entries, so the
/// task and settings repositories can share one backing store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&mut self, key: &str) -> StoreResult<()>;
}
