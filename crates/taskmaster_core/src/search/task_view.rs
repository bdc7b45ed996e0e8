//! Filtered and sorted task projections.
//!
//! # Responsibility
//! - Derive the rendered list from the owned collection.
//!
//! # Invariants
//! - Projection is pure; the input slice is never reordered or mutated.
//! - Search and category filters are ANDed.
//! - Sorting is stable, so equal keys keep insertion order.

use crate::model::task::{Category, Task};
use icu_collator::{Collator, CollatorOptions};
use log::warn;
use std::cmp::Ordering;

const EMPTY_FILTERED_MESSAGE: &str = "No matching tasks";
const EMPTY_ALL_DONE_MESSAGE: &str = "All caught up! 🎉";

/// Category restriction for a view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Parses `"All"` or a category label; unknown labels return `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed == "All" {
            return Some(Self::All);
        }
        Category::parse(trimmed).map(Self::Only)
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => task.category == category,
        }
    }

    pub fn is_active(self) -> bool {
        self != Self::All
    }
}

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Descending id.
    #[default]
    Newest,
    /// Ascending id.
    Oldest,
    /// Ascending title, case-folded first.
    Alphabetical,
    /// Filter-only; keeps insertion order.
    Unsorted,
}

impl SortMode {
    /// Parses `Newest`, `Oldest` or `A-Z`; anything else is `Unsorted`.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "Newest" => Self::Newest,
            "Oldest" => Self::Oldest,
            "A-Z" => Self::Alphabetical,
            _ => Self::Unsorted,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "Newest",
            Self::Oldest => "Oldest",
            Self::Alphabetical => "A-Z",
            Self::Unsorted => "Unsorted",
        }
    }

    /// Next mode for the sort toggle button.
    pub fn next(self) -> Self {
        match self {
            Self::Newest => Self::Oldest,
            Self::Oldest => Self::Alphabetical,
            Self::Alphabetical | Self::Unsorted => Self::Newest,
        }
    }
}

/// View parameters chosen by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskViewQuery {
    pub search_term: String,
    pub filter: CategoryFilter,
    pub sort: SortMode,
}

impl TaskViewQuery {
    pub fn new(search_term: impl Into<String>, filter: CategoryFilter, sort: SortMode) -> Self {
        Self {
            search_term: search_term.into(),
            filter,
            sort,
        }
    }

    /// Message to render when the projection is empty.
    pub fn empty_state_message(&self) -> &'static str {
        empty_state_message(&self.search_term, self.filter)
    }
}

/// Projects `tasks` through `query` into a new ordered list.
pub fn project_tasks(tasks: &[Task], query: &TaskViewQuery) -> Vec<Task> {
    let needle = query.search_term.to_lowercase();
    let mut view: Vec<Task> = tasks
        .iter()
        .filter(|task| task.title.to_lowercase().contains(needle.as_str()))
        .filter(|task| query.filter.matches(task))
        .cloned()
        .collect();

    match query.sort {
        SortMode::Newest => view.sort_by(|a, b| b.id.cmp(&a.id)),
        SortMode::Oldest => view.sort_by(|a, b| a.id.cmp(&b.id)),
        SortMode::Alphabetical => {
            let collator = TitleCollator::new();
            view.sort_by(|a, b| collator.compare(&a.title, &b.title));
        }
        SortMode::Unsorted => {}
    }
    view
}

/// Root-locale collation for task titles.
///
/// Accents and case are secondary and tertiary differences, so `éclair`
/// sorts between `eagle` and `fig`, and `a` sorts before `A`.
pub struct TitleCollator {
    collator: Option<Collator>,
}

impl TitleCollator {
    pub fn new() -> Self {
        match Collator::try_new(&Default::default(), CollatorOptions::new()) {
            Ok(collator) => Self {
                collator: Some(collator),
            },
            Err(err) => {
                warn!(
                    "event=collator_init module=search status=degraded error={:?}",
                    err
                );
                Self { collator: None }
            }
        }
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match &self.collator {
            Some(collator) => collator.compare(a, b),
            // Case-folded order, lowercase first on ties.
            None => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| b.cmp(a)),
        }
    }
}

impl Default for TitleCollator {
    fn default() -> Self {
        Self::new()
    }
}

/// One-off title comparison; sorting reuses a single `TitleCollator`.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    TitleCollator::new().compare(a, b)
}

/// Empty-list message for the given filter state.
pub fn empty_state_message(search_term: &str, filter: CategoryFilter) -> &'static str {
    if !search_term.is_empty() || filter.is_active() {
        EMPTY_FILTERED_MESSAGE
    } else {
        EMPTY_ALL_DONE_MESSAGE
    }
}

#[cfg(test)]
mod tests {
    use super::{
        compare_titles, empty_state_message, project_tasks, CategoryFilter, SortMode,
        TaskViewQuery,
    };
    use crate::model::task::{seed_tasks, Category, Task};
    use std::cmp::Ordering;

    fn ids(tasks: &[Task]) -> Vec<i64> {
        tasks.iter().map(|task| task.id).collect()
    }

    #[test]
    fn newest_and_oldest_are_reversed() {
        let tasks = seed_tasks();
        let newest = project_tasks(
            &tasks,
            &TaskViewQuery::new("", CategoryFilter::All, SortMode::Newest),
        );
        let mut oldest = project_tasks(
            &tasks,
            &TaskViewQuery::new("", CategoryFilter::All, SortMode::Oldest),
        );
        oldest.reverse();
        assert_eq!(newest, oldest);
        assert_eq!(ids(&newest), vec![3, 2, 1]);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let tasks = seed_tasks();
        let view = project_tasks(
            &tasks,
            &TaskViewQuery::new("TRASH", CategoryFilter::All, SortMode::Newest),
        );
        assert_eq!(ids(&view), vec![3]);
    }

    #[test]
    fn category_and_search_are_anded() {
        let tasks = seed_tasks();
        let view = project_tasks(
            &tasks,
            &TaskViewQuery::new("trash", CategoryFilter::Only(Category::Work), SortMode::Newest),
        );
        assert!(view.is_empty());
    }

    #[test]
    fn alphabetical_folds_case() {
        let tasks = vec![
            Task::new(1, "banana", Category::Personal).expect("valid"),
            Task::new(2, "Apple", Category::Personal).expect("valid"),
            Task::new(3, "cherry", Category::Personal).expect("valid"),
        ];
        let view = project_tasks(
            &tasks,
            &TaskViewQuery::new("", CategoryFilter::All, SortMode::Alphabetical),
        );
        assert_eq!(ids(&view), vec![2, 1, 3]);
        assert_eq!(compare_titles("a", "A"), Ordering::Less);
    }

    #[test]
    fn alphabetical_collates_accented_titles() {
        let tasks = vec![
            Task::new(1, "zebra", Category::Work).expect("valid"),
            Task::new(2, "éclair", Category::Work).expect("valid"),
            Task::new(3, "fig", Category::Work).expect("valid"),
            Task::new(4, "eagle", Category::Work).expect("valid"),
        ];
        let view = project_tasks(
            &tasks,
            &TaskViewQuery::new("", CategoryFilter::All, SortMode::Alphabetical),
        );
        let titles: Vec<&str> = view.iter().map(|task| task.title.as_str()).collect();
        assert_eq!(titles, vec!["eagle", "éclair", "fig", "zebra"]);
        assert_eq!(compare_titles("Émile", "emile"), Ordering::Greater);
    }

    #[test]
    fn unknown_sort_keeps_insertion_order() {
        let tasks = vec![
            Task::new(9, "later id first", Category::Work).expect("valid"),
            Task::new(2, "earlier id second", Category::Work).expect("valid"),
        ];
        assert_eq!(SortMode::parse("Priority"), SortMode::Unsorted);
        let view = project_tasks(
            &tasks,
            &TaskViewQuery::new("", CategoryFilter::All, SortMode::parse("Priority")),
        );
        assert_eq!(ids(&view), vec![9, 2]);
    }

    #[test]
    fn sort_toggle_cycles_three_modes() {
        assert_eq!(SortMode::Newest.next(), SortMode::Oldest);
        assert_eq!(SortMode::Oldest.next(), SortMode::Alphabetical);
        assert_eq!(SortMode::Alphabetical.next(), SortMode::Newest);
        assert_eq!(SortMode::parse(SortMode::Alphabetical.as_str()), SortMode::Alphabetical);
    }

    #[test]
    fn filter_parse_and_empty_messages() {
        assert_eq!(CategoryFilter::parse("All"), Some(CategoryFilter::All));
        assert_eq!(
            CategoryFilter::parse("Urgent"),
            Some(CategoryFilter::Only(Category::Urgent))
        );
        assert_eq!(CategoryFilter::parse("Hobby"), None);

        assert_eq!(empty_state_message("", CategoryFilter::All), "All caught up! 🎉");
        assert_eq!(empty_state_message("x", CategoryFilter::All), "No matching tasks");
        assert_eq!(
            empty_state_message("", CategoryFilter::Only(Category::Work)),
            "No matching tasks"
        );
    }
}
