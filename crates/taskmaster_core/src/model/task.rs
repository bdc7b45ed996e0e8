//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical to-do record persisted under the task store key.
//! - Own title normalization and the fixed category set.
//!
//! # Invariants
//! - `id` is unique within one collection and never reassigned.
//! - `title` is non-empty after trimming.
//! - `category` is always one of the fixed values; legacy records without
//!   one decode as `Category::Personal`.

use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable task identifier, derived from creation epoch milliseconds.
pub type TaskId = i64;

/// Fixed task category set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Personal,
    Work,
    Urgent,
}

/// Display order used by category pickers.
pub const CATEGORIES: [Category; 3] = [Category::Personal, Category::Work, Category::Urgent];

impl Category {
    /// Stable label used on the wire and in filters.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Personal => "Personal",
            Self::Work => "Work",
            Self::Urgent => "Urgent",
        }
    }

    /// Short icon rendered next to the label.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Personal => "👤",
            Self::Work => "💼",
            Self::Urgent => "🔥",
        }
    }

    /// Parses an exact category label.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Personal" => Some(Self::Personal),
            "Work" => Some(Self::Work),
            "Urgent" => Some(Self::Urgent),
            _ => None,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One to-do entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    /// Missing, `null` or unknown values fall back to `Personal`.
    #[serde(default, deserialize_with = "deserialize_category")]
    pub category: Category,
}

impl Task {
    /// Creates an incomplete task after normalizing the title.
    ///
    /// # Errors
    /// - Returns `TaskValidationError::EmptyTitle` when the trimmed title is empty.
    pub fn new(
        id: TaskId,
        title: &str,
        category: Category,
    ) -> Result<Self, TaskValidationError> {
        let title = normalize_title(title)?;
        Ok(Self {
            id,
            title,
            completed: false,
            category,
        })
    }

    /// Returns whether this task collides with `title` under the duplicate rule.
    pub fn has_title(&self, title: &str) -> bool {
        self.title.trim().to_lowercase() == title.trim().to_lowercase()
    }

    /// Validates invariants that must hold for stored tasks.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(())
    }
}

/// Trims a user-entered title and rejects empty input.
pub fn normalize_title(raw: &str) -> Result<String, TaskValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

fn deserialize_category<'de, D>(deserializer: D) -> Result<Category, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .and_then(Category::parse)
        .unwrap_or_default())
}

/// Domain validation errors for task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title must not be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// Fixed sample set used when the store holds no tasks.
pub fn seed_tasks() -> Vec<Task> {
    vec![
        Task {
            id: 1,
            title: "Welcome to TaskMaster! 👋".to_string(),
            completed: false,
            category: Category::Personal,
        },
        Task {
            id: 2,
            title: "Click a task to mark complete".to_string(),
            completed: false,
            category: Category::Work,
        },
        Task {
            id: 3,
            title: "Use the trash icon to delete".to_string(),
            completed: true,
            category: Category::Urgent,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::{normalize_title, seed_tasks, Category, Task, TaskValidationError};

    #[test]
    fn new_trims_title_and_starts_incomplete() {
        let task = Task::new(7, "  buy milk  ", Category::Work).expect("valid title");
        assert_eq!(task.title, "buy milk");
        assert!(!task.completed);
        assert_eq!(task.category, Category::Work);
    }

    #[test]
    fn new_rejects_blank_title() {
        let err = Task::new(7, " \t ", Category::Work).expect_err("blank title must fail");
        assert_eq!(err, TaskValidationError::EmptyTitle);
        assert_eq!(normalize_title(""), Err(TaskValidationError::EmptyTitle));
    }

    #[test]
    fn has_title_ignores_case_and_padding() {
        let task = Task::new(1, "Buy Milk", Category::Personal).expect("valid title");
        assert!(task.has_title("  buy milk "));
        assert!(!task.has_title("buy milk now"));
    }

    #[test]
    fn category_labels_round_trip() {
        for category in super::CATEGORIES {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
        assert_eq!(Category::parse("All"), None);
        assert_eq!(Category::Urgent.icon(), "🔥");
    }

    #[test]
    fn seed_set_matches_first_run_contents() {
        let seed = seed_tasks();
        assert_eq!(seed.len(), 3);
        assert_eq!(seed.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(seed[2].completed);
        assert!(seed.iter().all(|task| task.validate().is_ok()));
    }
}
