//! Reminder scheduler state machine.
//!
//! # Responsibility
//! - Drive the enable/disable flow including the permission prompt.
//! - Persist the enabled flag and keep the firing schedule in sync with it.
//! - Compose and emit reminder notifications when polled.
//!
//! # Invariants
//! - A schedule exists only while `enabled && permission == Granted`.
//! - Disabling or `shutdown` drops both pending slots; later polls never fire.
//! - Task data is only read, never mutated, by this module.
//! - Failing to persist the flag is logged and does not block the toggle.

use crate::config::ReminderConfig;
use crate::model::reminder::{Permission, ReminderPhase, ReminderStatus};
use crate::model::task::Task;
use crate::reminder::message::{compose_enabled_confirmation, compose_reminder};
use crate::reminder::platform::{NotificationPlatform, PermissionRequest, PlatformError};
use crate::reminder::schedule::ReminderSchedule;
use crate::repo::settings_repo::ReminderSettingsRepository;
use crate::store::KeyValueStore;
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// User-facing reminder failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderError {
    /// Host cannot display notifications; toggle is a no-op.
    NotificationUnsupported,
    /// Permission refused; reminders stay disabled.
    PermissionDenied,
    /// The host failed to display a due notification.
    Platform(PlatformError),
}

impl Display for ReminderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotificationUnsupported => {
                write!(f, "notifications are not supported on this platform")
            }
            Self::PermissionDenied => write!(f, "notification permission was denied"),
            Self::Platform(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ReminderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Platform(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PlatformError> for ReminderError {
    fn from(value: PlatformError) -> Self {
        Self::Platform(value)
    }
}

/// Periodic reminder controller.
pub struct ReminderScheduler<S: KeyValueStore, P: NotificationPlatform> {
    settings: ReminderSettingsRepository<S>,
    platform: P,
    config: ReminderConfig,
    enabled: bool,
    permission: Permission,
    request_pending: bool,
    schedule: Option<ReminderSchedule>,
}

impl<S: KeyValueStore, P: NotificationPlatform> ReminderScheduler<S, P> {
    /// Restores the persisted flag and arms the schedule when allowed.
    pub fn load(
        settings: ReminderSettingsRepository<S>,
        platform: P,
        config: ReminderConfig,
        now_ms: i64,
    ) -> Self {
        let enabled = settings.load_enabled();
        let mut scheduler = Self {
            settings,
            platform,
            config,
            enabled,
            permission: Permission::Default,
            request_pending: false,
            schedule: None,
        };
        scheduler.permission = scheduler.read_platform_permission();
        scheduler.reconcile_schedule(now_ms);

        info!(
            "event=reminder_load module=reminder status=ok enabled={} permission={} phase={}",
            scheduler.enabled,
            scheduler.permission,
            scheduler.phase().as_str()
        );
        scheduler
    }

    /// Flips reminders on or off.
    ///
    /// # Errors
    /// - `NotificationUnsupported` when the host has no notification API.
    /// - `PermissionDenied` when permission is, or becomes, denied.
    pub fn toggle(&mut self, now_ms: i64, tasks: &[Task]) -> Result<ReminderPhase, ReminderError> {
        if !self.platform.is_supported() {
            warn!("event=reminder_toggle module=reminder status=rejected reason=unsupported");
            return Err(ReminderError::NotificationUnsupported);
        }
        if self.request_pending {
            debug!("event=reminder_toggle module=reminder status=noop reason=request_pending");
            return Ok(ReminderPhase::PendingPermission);
        }
        if self.enabled {
            self.disable();
            return Ok(ReminderPhase::Disabled);
        }

        self.permission = self.read_platform_permission();
        if self.permission == Permission::Default {
            match self.platform.request_permission() {
                PermissionRequest::Resolved(result) => self.permission = result,
                PermissionRequest::Pending => {
                    self.request_pending = true;
                    info!("event=reminder_permission module=reminder status=requested");
                    return Ok(ReminderPhase::PendingPermission);
                }
            }
        }
        self.apply_permission(now_ms, tasks)
    }

    /// Finishes a permission prompt that `toggle` left pending.
    ///
    /// Ignored when no prompt is outstanding.
    pub fn complete_permission_request(
        &mut self,
        result: Permission,
        now_ms: i64,
        tasks: &[Task],
    ) -> Result<ReminderPhase, ReminderError> {
        if !self.request_pending {
            debug!("event=reminder_permission module=reminder status=ignored reason=no_request");
            return Ok(self.phase());
        }
        self.request_pending = false;
        self.permission = result;
        info!(
            "event=reminder_permission module=reminder status=resolved permission={}",
            result
        );
        self.apply_permission(now_ms, tasks)
    }

    /// Fires at most one reminder if a slot is due. Returns notifications sent.
    ///
    /// # Errors
    /// - `Platform` when the host failed to display the reminder. The slot is
    ///   still consumed so a failing host is not retried in a tight loop.
    pub fn poll(&mut self, now_ms: i64, tasks: &[Task]) -> Result<usize, ReminderError> {
        if !self.is_active() {
            return Ok(0);
        }
        let Some(schedule) = self.schedule.as_mut() else {
            return Ok(0);
        };
        if !schedule.take_due(now_ms) {
            return Ok(0);
        }

        let Some(request) = compose_reminder(tasks.iter().filter(|task| !task.completed)) else {
            debug!("event=reminder_fire module=reminder status=suppressed reason=no_pending");
            return Ok(0);
        };
        match self.platform.notify(&request) {
            Ok(()) => {
                info!("event=reminder_fire module=reminder status=ok");
                Ok(1)
            }
            Err(err) => {
                error!(
                    "event=reminder_fire module=reminder status=error error={}",
                    err
                );
                Err(err.into())
            }
        }
    }

    /// Re-reads host permission, e.g. after the user changed system settings.
    ///
    /// An outstanding prompt counts as answered once the host reports a
    /// non-default permission; reminders stay off until the next toggle.
    pub fn sync_permission(&mut self, now_ms: i64) -> ReminderPhase {
        let previous = self.permission;
        self.permission = self.read_platform_permission();
        if previous != self.permission {
            info!(
                "event=reminder_permission module=reminder status=synced from={} to={}",
                previous, self.permission
            );
        }
        if self.request_pending && self.permission != Permission::Default {
            self.request_pending = false;
            info!(
                "event=reminder_permission module=reminder status=resolved_by_sync permission={}",
                self.permission
            );
        }
        self.reconcile_schedule(now_ms);
        self.phase()
    }

    /// Cancels every pending slot and outstanding prompt.
    pub fn shutdown(&mut self) {
        self.schedule = None;
        self.request_pending = false;
        info!("event=reminder_shutdown module=reminder status=ok");
    }

    pub fn phase(&self) -> ReminderPhase {
        if self.request_pending {
            ReminderPhase::PendingPermission
        } else if self.schedule.is_some() {
            ReminderPhase::Scheduled
        } else if self.permission == Permission::Denied {
            ReminderPhase::Denied
        } else {
            ReminderPhase::Disabled
        }
    }

    pub fn status(&self) -> ReminderStatus {
        ReminderStatus {
            enabled: self.enabled,
            supported: self.platform.is_supported(),
            permission: self.permission,
            phase: self.phase(),
            next_due_ms: self.next_due_ms(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Deadline the host should poll at next.
    pub fn next_due_ms(&self) -> Option<i64> {
        self.schedule.as_ref().map(ReminderSchedule::next_due_ms)
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    fn is_active(&self) -> bool {
        self.enabled && self.permission == Permission::Granted
    }

    fn read_platform_permission(&self) -> Permission {
        if self.platform.is_supported() {
            self.platform.permission()
        } else {
            Permission::Denied
        }
    }

    fn apply_permission(
        &mut self,
        now_ms: i64,
        tasks: &[Task],
    ) -> Result<ReminderPhase, ReminderError> {
        match self.permission {
            Permission::Granted => {
                self.enable(now_ms, tasks);
                Ok(ReminderPhase::Scheduled)
            }
            Permission::Denied => {
                warn!("event=reminder_toggle module=reminder status=rejected reason=denied");
                Err(ReminderError::PermissionDenied)
            }
            Permission::Default => {
                info!("event=reminder_toggle module=reminder status=noop reason=prompt_dismissed");
                Ok(ReminderPhase::Disabled)
            }
        }
    }

    fn enable(&mut self, now_ms: i64, tasks: &[Task]) {
        self.enabled = true;
        self.persist_enabled();

        let pending = tasks.iter().filter(|task| !task.completed).count();
        if let Some(request) = compose_enabled_confirmation(pending, &self.config.interval_label())
        {
            if let Err(err) = self.platform.notify(&request) {
                warn!(
                    "event=reminder_confirm module=reminder status=error error={}",
                    err
                );
            }
        }

        self.reconcile_schedule(now_ms);
        info!(
            "event=reminder_toggle module=reminder status=ok enabled=true pending={}",
            pending
        );
    }

    fn disable(&mut self) {
        self.enabled = false;
        self.persist_enabled();
        self.schedule = None;
        info!("event=reminder_toggle module=reminder status=ok enabled=false");
    }

    /// Arms or drops the schedule to match `enabled` and permission.
    /// Already-armed schedules are left untouched.
    fn reconcile_schedule(&mut self, now_ms: i64) {
        if !self.is_active() {
            self.schedule = None;
            return;
        }
        if self.schedule.is_none() {
            self.schedule = Some(ReminderSchedule::arm(now_ms, &self.config));
        }
    }

    fn persist_enabled(&mut self) {
        if let Err(err) = self.settings.save_enabled(self.enabled) {
            error!(
                "event=reminder_settings_save module=reminder status=error enabled={} error={}",
                self.enabled, err
            );
        }
    }
}
