//! Core domain logic for TaskMaster.
//! This crate is the single source of truth for task and reminder invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod reminder;
pub mod repo;
pub mod search;
pub mod service;
pub mod store;

pub use config::{resolve_store_path, ConfigError, ReminderConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings, LoggingError};
pub use model::reminder::{NotificationRequest, Permission, ReminderPhase, ReminderStatus};
pub use model::task::{seed_tasks, Category, Task, TaskId, TaskValidationError, CATEGORIES};
pub use reminder::platform::{
    NotificationPlatform, OutboxPlatform, PermissionRequest, PlatformError,
};
pub use reminder::scheduler::{ReminderError, ReminderScheduler};
pub use repo::settings_repo::ReminderSettingsRepository;
pub use repo::task_repo::{LoadOutcome, LoadSource, TaskRepository};
pub use repo::{RepoError, RepoResult};
pub use search::task_view::{
    compare_titles, empty_state_message, CategoryFilter, SortMode, TaskViewQuery, TitleCollator,
};
pub use service::task_service::{now_epoch_ms, TaskService, TaskServiceError, TaskStats};
pub use store::{KeyValueStore, MemoryStore, SqliteStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
