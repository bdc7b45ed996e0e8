//! Reminder value types shared by the scheduler and platform adapters.

use std::fmt::{Display, Formatter};

/// Platform notification permission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Permission {
    /// Not asked yet.
    #[default]
    Default,
    Granted,
    Denied,
}

impl Permission {
    /// Wire value used by notification platforms.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }

    /// Parses a wire value; unknown input maps to `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "default" => Some(Self::Default),
            "granted" => Some(Self::Granted),
            "denied" => Some(Self::Denied),
            _ => None,
        }
    }
}

impl Display for Permission {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observable reminder state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderPhase {
    Disabled,
    /// A permission request is in flight on the platform side.
    PendingPermission,
    /// Enabled, granted, and a schedule is armed.
    Scheduled,
    /// The platform refused notifications.
    Denied,
}

impl ReminderPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::PendingPermission => "pending_permission",
            Self::Scheduled => "scheduled",
            Self::Denied => "denied",
        }
    }
}

/// One notification the core asks the platform to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    pub icon: String,
    /// Notifications sharing a tag replace each other instead of stacking.
    pub tag: String,
    pub require_interaction: bool,
}

/// Snapshot of reminder state for UI rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderStatus {
    pub enabled: bool,
    pub supported: bool,
    pub permission: Permission,
    pub phase: ReminderPhase,
    /// Epoch milliseconds of the next firing, when armed.
    pub next_due_ms: Option<i64>,
}
