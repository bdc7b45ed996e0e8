//! Task list repository.
//!
//! # Responsibility
//! - Load the task document, migrating legacy records and falling back to
//!   the seed set.
//! - Save the full collection as one JSON array.
//!
//! # Invariants
//! - `load` never fails; the reason for any fallback is reported in
//!   `LoadOutcome::source`.
//! - Titles are never written to logs.

use crate::model::task::{seed_tasks, Task};
use crate::repo::RepoResult;
use crate::store::{KeyValueStore, TASKS_KEY};
use log::{info, warn};

/// Where the loaded collection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Parsed from the stored document.
    Stored,
    /// Document held an empty array.
    SeededEmpty,
    /// No document under the key.
    SeededMissing,
    /// The store could not be read.
    SeededUnavailable,
    /// The document was not a valid task array.
    SeededCorrupt,
}

impl LoadSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stored => "stored",
            Self::SeededEmpty => "seeded_empty",
            Self::SeededMissing => "seeded_missing",
            Self::SeededUnavailable => "seeded_unavailable",
            Self::SeededCorrupt => "seeded_corrupt",
        }
    }

    pub fn is_seeded(self) -> bool {
        self != Self::Stored
    }

    /// Whether a document may exist in the store that the seed set must not
    /// overwrite until the user changes something.
    pub fn keeps_stored_document(self) -> bool {
        matches!(self, Self::SeededUnavailable | Self::SeededCorrupt)
    }
}

/// Result of a startup load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    pub tasks: Vec<Task>,
    pub source: LoadSource,
}

impl LoadOutcome {
    fn seeded(source: LoadSource) -> Self {
        Self {
            tasks: seed_tasks(),
            source,
        }
    }
}

/// Task document repository over any key-value store.
#[derive(Debug, Clone)]
pub struct TaskRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> TaskRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Loads the collection, never failing.
    pub fn load(&self) -> LoadOutcome {
        let raw = match self.store.get(TASKS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("event=tasks_load module=repo status=seeded reason=missing");
                return LoadOutcome::seeded(LoadSource::SeededMissing);
            }
            Err(err) => {
                warn!(
                    "event=tasks_load module=repo status=seeded reason=unavailable error={}",
                    err
                );
                return LoadOutcome::seeded(LoadSource::SeededUnavailable);
            }
        };

        let tasks = match decode_tasks(&raw) {
            Ok(tasks) => tasks,
            Err(err) => {
                warn!(
                    "event=tasks_load module=repo status=seeded reason=corrupt bytes={} error={}",
                    raw.len(),
                    err
                );
                return LoadOutcome::seeded(LoadSource::SeededCorrupt);
            }
        };

        if tasks.is_empty() {
            info!("event=tasks_load module=repo status=seeded reason=empty");
            return LoadOutcome::seeded(LoadSource::SeededEmpty);
        }

        info!(
            "event=tasks_load module=repo status=ok count={}",
            tasks.len()
        );
        LoadOutcome {
            tasks,
            source: LoadSource::Stored,
        }
    }

    /// Overwrites the stored document with `tasks`.
    pub fn save(&mut self, tasks: &[Task]) -> RepoResult<()> {
        let document = serde_json::to_string(tasks)?;
        self.store.set(TASKS_KEY, &document)?;
        Ok(())
    }

    /// Borrow of the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Decodes a stored task array.
///
/// Records with a blank title are dropped; everything else passes through
/// the legacy category default.
pub fn decode_tasks(raw: &str) -> Result<Vec<Task>, serde_json::Error> {
    let decoded: Vec<Task> = serde_json::from_str(raw)?;
    let before = decoded.len();
    let tasks: Vec<Task> = decoded
        .into_iter()
        .filter(|task| task.validate().is_ok())
        .collect();
    if tasks.len() != before {
        warn!(
            "event=tasks_decode module=repo status=partial dropped={}",
            before - tasks.len()
        );
    }
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::{decode_tasks, LoadSource, TaskRepository};
    use crate::model::task::Category;
    use crate::store::{MemoryStore, TASKS_KEY};

    #[test]
    fn decode_defaults_missing_and_unknown_categories() {
        let tasks = decode_tasks(
            r#"[{"id":5,"title":"old","completed":true},
                {"id":6,"title":"odd","completed":false,"category":"Hobby"},
                {"id":7,"title":"work","completed":false,"category":"Work"}]"#,
        )
        .expect("decode");
        assert_eq!(tasks[0].category, Category::Personal);
        assert!(tasks[0].completed);
        assert_eq!(tasks[1].category, Category::Personal);
        assert_eq!(tasks[2].category, Category::Work);
    }

    #[test]
    fn decode_drops_blank_titles() {
        let tasks = decode_tasks(r#"[{"id":1,"title":"  "},{"id":2,"title":"keep"}]"#)
            .expect("decode");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, 2);
    }

    #[test]
    fn load_reports_seed_reasons() {
        let missing = TaskRepository::new(MemoryStore::new()).load();
        assert_eq!(missing.source, LoadSource::SeededMissing);
        assert_eq!(missing.tasks.len(), 3);

        let empty = TaskRepository::new(MemoryStore::with_entries([(TASKS_KEY, "[]")])).load();
        assert_eq!(empty.source, LoadSource::SeededEmpty);

        let corrupt =
            TaskRepository::new(MemoryStore::with_entries([(TASKS_KEY, "{not json")])).load();
        assert_eq!(corrupt.source, LoadSource::SeededCorrupt);
        assert!(corrupt.source.is_seeded());
    }
}
