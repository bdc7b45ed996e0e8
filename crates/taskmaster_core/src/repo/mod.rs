//! Typed repositories over the key-value store.
//!
//! # Responsibility
//! - Map domain values to the persisted string documents.
//! - Keep store keys and wire formats out of service code.
//!
//! # Invariants
//! - Saves are full-document overwrites.
//! - Load paths never fail startup; broken data falls back to defaults.

use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod settings_repo;
pub mod task_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository persistence error.
#[derive(Debug)]
pub enum RepoError {
    Store(StoreError),
    Serialize(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to encode document: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}
