//! FFI use-case API for the TaskMaster UI host.
//!
//! # Responsibility
//! - Expose task and reminder use-cases to Dart via FRB.
//! - Own the single process-wide session (task service + reminder scheduler).
//! - Translate core errors into user-facing envelope messages.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Calls from any host thread are serialized through one session lock.
//! - Notifications produced by the core are handed back in the response of
//!   the call that produced them.

use log::{info, warn};
use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use taskmaster_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, now_epoch_ms,
    ping as ping_inner, resolve_store_path, Category, CategoryFilter, NotificationRequest,
    OutboxPlatform, Permission, ReminderConfig, ReminderError, ReminderPhase, ReminderScheduler,
    ReminderSettingsRepository, SortMode, SqliteStore, Task, TaskRepository, TaskService,
    TaskServiceError, TaskViewQuery,
};

const MSG_EMPTY_TITLE: &str = "Please enter a task title";
const MSG_DUPLICATE_TITLE: &str = "Task already exists";
const MSG_UNSUPPORTED: &str = "Your browser does not support notifications.";
const MSG_DENIED: &str =
    "Notification permission was denied. Please enable it in your browser settings.";
const MSG_NO_SESSION: &str = "Session is not open.";

static SESSION: Lazy<Mutex<Option<Session>>> = Lazy::new(|| Mutex::new(None));

struct Session {
    db_path: PathBuf,
    tasks: TaskService<SqliteStore>,
    reminders: ReminderScheduler<SqliteStore, OutboxPlatform>,
}

impl Session {
    fn open(db_path: PathBuf, supported: bool, permission: Permission) -> Result<Self, String> {
        let store =
            SqliteStore::open(&db_path).map_err(|err| format!("store open failed: {err}"))?;
        let tasks = TaskService::open(TaskRepository::new(store.clone()));
        let reminders = ReminderScheduler::load(
            ReminderSettingsRepository::new(store),
            OutboxPlatform::new(supported, permission),
            ReminderConfig::default(),
            now_epoch_ms(),
        );
        Ok(Self {
            db_path,
            tasks,
            reminders,
        })
    }
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Generic action response envelope for task mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Affected task ID, when there is one.
    pub task_id: Option<i64>,
    /// Human-readable message for the UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, task_id: Option<i64>) -> Self {
        Self {
            ok: true,
            task_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task_id: None,
            message: message.into(),
        }
    }
}

/// One row of the rendered task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    /// `Personal|Work|Urgent`.
    pub category: String,
    pub category_icon: String,
}

/// Derived view envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskViewResponse {
    pub items: Vec<TaskItem>,
    /// Empty-state copy; `None` when `items` is non-empty.
    pub empty_message: Option<String>,
    /// Task currently in edit mode.
    pub editing_id: Option<i64>,
    pub total: u32,
    pub completed: u32,
    pub pending: u32,
    /// Error message; empty on success.
    pub message: String,
}

/// Notification the host must display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationItem {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub tag: String,
    pub require_interaction: bool,
}

/// Reminder action envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderResponse {
    pub ok: bool,
    /// `disabled|pending_permission|scheduled|denied`.
    pub phase: String,
    pub message: String,
    /// Notifications to display now, in emission order.
    pub notifications: Vec<NotificationItem>,
    /// Next deadline at which the host should call `reminder_poll`.
    pub next_due_ms: Option<i64>,
}

/// Reminder state snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderStatusResponse {
    pub open: bool,
    pub enabled: bool,
    pub supported: bool,
    /// `default|granted|denied`.
    pub permission: String,
    pub phase: String,
    pub next_due_ms: Option<i64>,
}

/// Opens (or reopens) the session.
///
/// Input semantics:
/// - `db_path`: explicit store file; `None` falls back to
///   `TASKMASTER_DB_PATH`, then the temp dir.
/// - `notifications_supported`: whether the host can display notifications.
/// - `permission`: current host permission (`default|granted|denied`).
///
/// # FFI contract
/// - Replaces any open session; the previous scheduler is shut down first.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn session_open(
    db_path: Option<String>,
    notifications_supported: bool,
    permission: String,
) -> ActionResponse {
    let Some(permission) = Permission::parse(&permission) else {
        return ActionResponse::failure(format!("unsupported permission `{permission}`"));
    };
    let path = resolve_store_path(db_path.as_deref());

    let mut guard = match lock_session() {
        Ok(guard) => guard,
        Err(message) => return ActionResponse::failure(message),
    };
    if let Some(previous) = guard.as_mut() {
        previous.reminders.shutdown();
    }
    *guard = None;

    match Session::open(path, notifications_supported, permission) {
        Ok(session) => {
            info!(
                "event=session_open module=ffi status=ok tasks={} source={}",
                session.tasks.len(),
                session.tasks.load_source().as_str()
            );
            let message = format!("Session opened at {}.", session.db_path.display());
            *guard = Some(session);
            ActionResponse::success(message, None)
        }
        Err(message) => {
            warn!("event=session_open module=ffi status=error");
            ActionResponse::failure(format!("session_open failed: {message}"))
        }
    }
}

/// Tears down the session and cancels pending reminders.
#[flutter_rust_bridge::frb(sync)]
pub fn session_close() -> ActionResponse {
    let mut guard = match lock_session() {
        Ok(guard) => guard,
        Err(message) => return ActionResponse::failure(message),
    };
    match guard.take() {
        Some(mut session) => {
            session.reminders.shutdown();
            info!("event=session_close module=ffi status=ok");
            ActionResponse::success("Session closed.", None)
        }
        None => ActionResponse::success("Session already closed.", None),
    }
}

/// Adds a task.
///
/// # FFI contract
/// - `category` accepts `Personal|Work|Urgent`; anything else is rejected.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(title: String, category: String) -> ActionResponse {
    let Some(category) = Category::parse(&category) else {
        return ActionResponse::failure(format!("unsupported category `{category}`"));
    };
    with_session(|session| match session.tasks.add(&title, category) {
        Ok(task) => ActionResponse::success("Task added.", Some(task.id)),
        Err(err) => task_failure("task_add", err),
    })
}

/// Deletes a task; unknown ids succeed as a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(id: i64) -> ActionResponse {
    with_session(|session| match session.tasks.delete(id) {
        Ok(true) => ActionResponse::success("Task deleted.", Some(id)),
        Ok(false) => ActionResponse::success("Task not found.", None),
        Err(err) => task_failure("task_delete", err),
    })
}

/// Flips completion. Tasks in edit mode are left untouched.
#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle(id: i64) -> ActionResponse {
    with_session(|session| match session.tasks.toggle_complete(id) {
        Ok(Some(true)) => ActionResponse::success("Task completed.", Some(id)),
        Ok(Some(false)) => ActionResponse::success("Task reopened.", Some(id)),
        Ok(None) => ActionResponse::failure("Task not found or being edited."),
        Err(err) => task_failure("task_toggle", err),
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_start_edit(id: i64) -> ActionResponse {
    with_session(|session| {
        if session.tasks.start_edit(id) {
            ActionResponse::success("Editing task.", Some(id))
        } else {
            ActionResponse::failure("Task not found.")
        }
    })
}

/// Commits an edit. An empty title keeps edit mode open.
#[flutter_rust_bridge::frb(sync)]
pub fn task_save_edit(id: i64, title: String) -> ActionResponse {
    with_session(|session| match session.tasks.save_edit(id, &title) {
        Ok(()) => ActionResponse::success("Task updated.", Some(id)),
        Err(err) => task_failure("task_save_edit", err),
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_cancel_edit() -> ActionResponse {
    with_session(|session| {
        session.tasks.cancel_edit();
        ActionResponse::success("Edit cancelled.", None)
    })
}

/// Computes the rendered list.
///
/// Input semantics:
/// - `search`: case-insensitive substring.
/// - `filter`: `All|Personal|Work|Urgent`; unknown values mean `All`.
/// - `sort`: `Newest|Oldest|A-Z`; unknown values keep insertion order.
#[flutter_rust_bridge::frb(sync)]
pub fn task_view(search: String, filter: String, sort: String) -> TaskViewResponse {
    let query = TaskViewQuery::new(
        search,
        CategoryFilter::parse(&filter).unwrap_or_default(),
        SortMode::parse(&sort),
    );
    let guard = match lock_session() {
        Ok(guard) => guard,
        Err(message) => return empty_view(message),
    };
    let Some(session) = guard.as_ref() else {
        return empty_view(MSG_NO_SESSION.to_string());
    };

    let items: Vec<TaskItem> = session
        .tasks
        .view_with(&query)
        .into_iter()
        .map(to_task_item)
        .collect();
    let stats = session.tasks.stats();
    TaskViewResponse {
        empty_message: items
            .is_empty()
            .then(|| query.empty_state_message().to_string()),
        items,
        editing_id: session.tasks.editing(),
        total: clamp_count(stats.total),
        completed: clamp_count(stats.completed),
        pending: clamp_count(stats.pending),
        message: String::new(),
    }
}

/// Flips reminders on or off, prompting for permission if needed.
///
/// # FFI contract
/// - `phase=pending_permission` means the host must show its prompt and
///   report the answer via `reminder_permission_result`.
#[flutter_rust_bridge::frb(sync)]
pub fn reminder_toggle() -> ReminderResponse {
    with_reminders(|session| {
        let Session {
            tasks, reminders, ..
        } = session;
        reminders.toggle(now_epoch_ms(), tasks.tasks())
    })
}

/// Reports the answer to a permission prompt started by `reminder_toggle`.
#[flutter_rust_bridge::frb(sync)]
pub fn reminder_permission_result(permission: String) -> ReminderResponse {
    let Some(permission) = Permission::parse(&permission) else {
        return reminder_failure(format!("unsupported permission `{permission}`"));
    };
    with_reminders(|session| {
        let Session {
            tasks, reminders, ..
        } = session;
        reminders.platform_mut().set_permission(permission);
        reminders.complete_permission_request(permission, now_epoch_ms(), tasks.tasks())
    })
}

/// Mirrors a permission change made outside the app.
#[flutter_rust_bridge::frb(sync)]
pub fn reminder_set_permission(permission: String) -> ReminderResponse {
    let Some(permission) = Permission::parse(&permission) else {
        return reminder_failure(format!("unsupported permission `{permission}`"));
    };
    with_reminders(|session| {
        session.reminders.platform_mut().set_permission(permission);
        Ok(session.reminders.sync_permission(now_epoch_ms()))
    })
}

/// Fires a due reminder, if any.
#[flutter_rust_bridge::frb(sync)]
pub fn reminder_poll() -> ReminderResponse {
    with_reminders(|session| {
        let Session {
            tasks, reminders, ..
        } = session;
        reminders
            .poll(now_epoch_ms(), tasks.tasks())
            .map(|_| reminders.phase())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn reminder_status() -> ReminderStatusResponse {
    let closed = ReminderStatusResponse {
        open: false,
        enabled: false,
        supported: false,
        permission: Permission::Default.as_str().to_string(),
        phase: ReminderPhase::Disabled.as_str().to_string(),
        next_due_ms: None,
    };
    let Ok(guard) = lock_session() else {
        return closed;
    };
    let Some(session) = guard.as_ref() else {
        return closed;
    };
    let status = session.reminders.status();
    ReminderStatusResponse {
        open: true,
        enabled: status.enabled,
        supported: status.supported,
        permission: status.permission.as_str().to_string(),
        phase: status.phase.as_str().to_string(),
        next_due_ms: status.next_due_ms,
    }
}

fn lock_session() -> Result<MutexGuard<'static, Option<Session>>, String> {
    SESSION
        .lock()
        .map_err(|_| "session lock poisoned".to_string())
}

fn with_session(f: impl FnOnce(&mut Session) -> ActionResponse) -> ActionResponse {
    let mut guard = match lock_session() {
        Ok(guard) => guard,
        Err(message) => return ActionResponse::failure(message),
    };
    match guard.as_mut() {
        Some(session) => f(session),
        None => ActionResponse::failure(MSG_NO_SESSION),
    }
}

fn with_reminders(
    f: impl FnOnce(&mut Session) -> Result<ReminderPhase, ReminderError>,
) -> ReminderResponse {
    let mut guard = match lock_session() {
        Ok(guard) => guard,
        Err(message) => return reminder_failure(message),
    };
    let Some(session) = guard.as_mut() else {
        return reminder_failure(MSG_NO_SESSION.to_string());
    };

    let result = f(session);
    // Drained on failure too; a confirmation may already be queued.
    let notifications = session
        .reminders
        .platform_mut()
        .drain()
        .into_iter()
        .map(to_notification_item)
        .collect();
    let next_due_ms = session.reminders.next_due_ms();
    match result {
        Ok(phase) => ReminderResponse {
            ok: true,
            phase: phase.as_str().to_string(),
            message: phase_message(phase).to_string(),
            notifications,
            next_due_ms,
        },
        Err(err) => ReminderResponse {
            ok: false,
            phase: session.reminders.phase().as_str().to_string(),
            message: reminder_error_message(&err),
            notifications,
            next_due_ms,
        },
    }
}

fn task_failure(operation: &str, err: TaskServiceError) -> ActionResponse {
    match err {
        TaskServiceError::EmptyTitle => ActionResponse::failure(MSG_EMPTY_TITLE),
        TaskServiceError::DuplicateTitle(_) => ActionResponse::failure(MSG_DUPLICATE_TITLE),
        err @ (TaskServiceError::IdsExhausted | TaskServiceError::Repo(_)) => {
            ActionResponse::failure(format!("{operation} failed: {err}"))
        }
    }
}

fn reminder_error_message(err: &ReminderError) -> String {
    match err {
        ReminderError::NotificationUnsupported => MSG_UNSUPPORTED.to_string(),
        ReminderError::PermissionDenied => MSG_DENIED.to_string(),
        ReminderError::Platform(err) => format!("reminder failed: {err}"),
    }
}

fn phase_message(phase: ReminderPhase) -> &'static str {
    match phase {
        ReminderPhase::Disabled => "Reminders are off.",
        ReminderPhase::PendingPermission => "Waiting for notification permission.",
        ReminderPhase::Scheduled => "Reminders are on.",
        ReminderPhase::Denied => MSG_DENIED,
    }
}

fn reminder_failure(message: String) -> ReminderResponse {
    ReminderResponse {
        ok: false,
        phase: ReminderPhase::Disabled.as_str().to_string(),
        message,
        notifications: Vec::new(),
        next_due_ms: None,
    }
}

fn empty_view(message: String) -> TaskViewResponse {
    TaskViewResponse {
        items: Vec::new(),
        empty_message: None,
        editing_id: None,
        total: 0,
        completed: 0,
        pending: 0,
        message,
    }
}

fn to_task_item(task: Task) -> TaskItem {
    TaskItem {
        id: task.id,
        category: task.category.as_str().to_string(),
        category_icon: task.category.icon().to_string(),
        title: task.title,
        completed: task.completed,
    }
}

fn to_notification_item(request: NotificationRequest) -> NotificationItem {
    NotificationItem {
        title: request.title,
        body: request.body,
        icon: request.icon,
        tag: request.tag,
        require_interaction: request.require_interaction,
    }
}

fn clamp_count(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
