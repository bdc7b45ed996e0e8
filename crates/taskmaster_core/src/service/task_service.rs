//! Task collection use-case service.
//!
//! # Responsibility
//! - Own the in-memory task list and the single edit cursor.
//! - Enforce title and duplicate rules on create/edit.
//! - Write the full collection through the repository after every mutation.
//!
//! # Invariants
//! - Ids are strictly increasing in issue order and never reused in-process.
//! - At most one task is editable at a time; it cannot be toggled meanwhile.
//! - A failed save keeps the in-memory change; the next save persists it.

use crate::model::task::{normalize_title, Category, Task, TaskId, TaskValidationError};
use crate::repo::task_repo::{LoadSource, TaskRepository};
use crate::repo::RepoError;
use crate::search::task_view::{project_tasks, CategoryFilter, SortMode, TaskViewQuery};
use crate::store::KeyValueStore;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Title is empty after trimming.
    EmptyTitle,
    /// Another task already uses this title (case-insensitive).
    DuplicateTitle(String),
    /// No id above the current maximum is representable.
    IdsExhausted,
    /// Persistence failed after the in-memory change was applied.
    Repo(RepoError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title must not be empty"),
            Self::DuplicateTitle(title) => write!(f, "task already exists: `{title}`"),
            Self::IdsExhausted => write!(f, "no task id left above the current maximum"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<TaskValidationError> for TaskServiceError {
    fn from(value: TaskValidationError) -> Self {
        match value {
            TaskValidationError::EmptyTitle => Self::EmptyTitle,
        }
    }
}

/// Collection counters shown by header widgets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

/// Owner of the task collection.
pub struct TaskService<S: KeyValueStore> {
    repo: TaskRepository<S>,
    tasks: Vec<Task>,
    editing: Option<TaskId>,
    last_issued_id: TaskId,
    load_source: LoadSource,
}

impl<S: KeyValueStore> TaskService<S> {
    /// Loads the collection and writes the canonical document back.
    ///
    /// Never fails: unreadable storage yields the seed set, and a failed
    /// write-back is only logged. When the store was unreadable or held a
    /// corrupt document, nothing is written until the first mutation.
    pub fn open(repo: TaskRepository<S>) -> Self {
        let outcome = repo.load();
        let mut service = Self {
            repo,
            tasks: outcome.tasks,
            editing: None,
            last_issued_id: 0,
            load_source: outcome.source,
        };

        if service.load_source.keeps_stored_document() {
            warn!(
                "event=tasks_open module=service status=degraded source={} write_back=skipped",
                service.load_source.as_str()
            );
        } else if let Err(err) = service.persist() {
            warn!(
                "event=tasks_open module=service status=degraded source={} error={}",
                service.load_source.as_str(),
                err
            );
        } else {
            info!(
                "event=tasks_open module=service status=ok source={} count={}",
                service.load_source.as_str(),
                service.tasks.len()
            );
        }
        service
    }

    /// How the collection was obtained at startup.
    pub fn load_source(&self) -> LoadSource {
        self.load_source
    }

    /// Adds a task stamped with the current wall clock.
    pub fn add(&mut self, title: &str, category: Category) -> Result<Task, TaskServiceError> {
        self.add_at(title, category, now_epoch_ms())
    }

    /// Adds a task using `now_ms` as the id source.
    ///
    /// # Errors
    /// - `EmptyTitle` when the trimmed title is empty.
    /// - `DuplicateTitle` when any task already has the same title ignoring case.
    /// - `IdsExhausted` when an existing id is already `i64::MAX`.
    /// - `Repo` when the task was added but could not be persisted.
    pub fn add_at(
        &mut self,
        title: &str,
        category: Category,
        now_ms: i64,
    ) -> Result<Task, TaskServiceError> {
        let title = normalize_title(title)?;
        if self.tasks.iter().any(|task| task.has_title(&title)) {
            return Err(TaskServiceError::DuplicateTitle(title));
        }

        let id = self.next_id(now_ms)?;
        let task = Task::new(id, &title, category)?;
        self.tasks.push(task.clone());
        self.last_issued_id = id;

        self.persist_logged("task_add", id)?;
        Ok(task)
    }

    /// Removes `id` if present. Returns whether a task was removed.
    pub fn delete(&mut self, id: TaskId) -> Result<bool, TaskServiceError> {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        let removed = self.tasks.len() != before;
        if removed && self.editing == Some(id) {
            self.editing = None;
        }

        self.persist_logged("task_delete", id)?;
        Ok(removed)
    }

    /// Flips completion. Returns the new value, or `None` when the id is
    /// unknown or currently being edited.
    pub fn toggle_complete(&mut self, id: TaskId) -> Result<Option<bool>, TaskServiceError> {
        if self.editing == Some(id) {
            return Ok(None);
        }
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            return Ok(None);
        };
        task.completed = !task.completed;
        let completed = task.completed;

        self.persist_logged("task_toggle", id)?;
        Ok(Some(completed))
    }

    /// Moves the edit cursor to `id`. Returns `false` for unknown ids.
    pub fn start_edit(&mut self, id: TaskId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.editing = Some(id);
        true
    }

    /// Saves a new title and closes edit mode.
    ///
    /// An empty title keeps edit mode open and changes nothing.
    pub fn save_edit(&mut self, id: TaskId, new_title: &str) -> Result<(), TaskServiceError> {
        let title = normalize_title(new_title)?;
        self.editing = None;

        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            return Ok(());
        };
        task.title = title;

        self.persist_logged("task_edit", id)?;
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Id under edit, if any.
    pub fn editing(&self) -> Option<TaskId> {
        self.editing
    }

    /// Derived list for rendering.
    pub fn view(&self, search_term: &str, filter: CategoryFilter, sort: SortMode) -> Vec<Task> {
        self.view_with(&TaskViewQuery::new(search_term, filter, sort))
    }

    pub fn view_with(&self, query: &TaskViewQuery) -> Vec<Task> {
        project_tasks(&self.tasks, query)
    }

    /// Collection in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn incomplete_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|task| !task.completed).collect()
    }

    pub fn stats(&self) -> TaskStats {
        let completed = self.tasks.iter().filter(|task| task.completed).count();
        TaskStats {
            total: self.tasks.len(),
            completed,
            pending: self.tasks.len() - completed,
        }
    }

    fn next_id(&self, now_ms: i64) -> Result<TaskId, TaskServiceError> {
        let max_existing = self.tasks.iter().map(|task| task.id).max().unwrap_or(0);
        let floor = self
            .last_issued_id
            .max(max_existing)
            .checked_add(1)
            .ok_or(TaskServiceError::IdsExhausted)?;
        Ok(now_ms.max(floor))
    }

    fn persist(&mut self) -> Result<(), RepoError> {
        self.repo.save(&self.tasks)
    }

    fn persist_logged(&mut self, event: &'static str, id: TaskId) -> Result<(), TaskServiceError> {
        match self.persist() {
            Ok(()) => {
                info!(
                    "event={} module=service status=ok task_id={} count={}",
                    event,
                    id,
                    self.tasks.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event={} module=service status=error task_id={} error_code=persist_failed error={}",
                    event, id, err
                );
                Err(err.into())
            }
        }
    }
}

/// Current wall-clock time in epoch milliseconds (0 if the clock is before 1970).
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
