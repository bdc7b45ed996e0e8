//! Notification platform capability.
//!
//! # Responsibility
//! - Define the seam between the scheduler and the host notification API.
//! - Provide `OutboxPlatform` for hosts that display notifications
//!   asynchronously on their own thread.
//!
//! # Invariants
//! - The scheduler never blocks on the platform; permission prompts that
//!   need user input report `PermissionRequest::Pending`.

use crate::model::reminder::{NotificationRequest, Permission};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result of asking the platform for permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionRequest {
    /// The platform answered immediately.
    Resolved(Permission),
    /// The answer arrives later through `complete_permission_request`.
    Pending,
}

/// Host notification capability consumed by the reminder scheduler.
pub trait NotificationPlatform {
    /// Whether the host can display notifications at all.
    fn is_supported(&self) -> bool;
    /// Current permission as reported by the host.
    fn permission(&self) -> Permission;
    /// Starts a permission prompt.
    fn request_permission(&mut self) -> PermissionRequest;
    /// Displays one notification.
    fn notify(&mut self, request: &NotificationRequest) -> Result<(), PlatformError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The host refuses to display notifications right now.
    NotPermitted(Permission),
    /// The host API reported a failure.
    Failed(String),
}

impl Display for PlatformError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotPermitted(permission) => {
                write!(f, "notifications not permitted (permission={permission})")
            }
            Self::Failed(message) => write!(f, "notification failed: {message}"),
        }
    }
}

impl Error for PlatformError {}

/// Queue-backed platform: the host sets permission and drains requests.
#[derive(Debug, Clone, Default)]
pub struct OutboxPlatform {
    supported: bool,
    permission: Permission,
    request_outstanding: bool,
    outbox: Vec<NotificationRequest>,
}

impl OutboxPlatform {
    pub fn new(supported: bool, permission: Permission) -> Self {
        Self {
            supported,
            permission: if supported {
                permission
            } else {
                Permission::Denied
            },
            request_outstanding: false,
            outbox: Vec::new(),
        }
    }

    /// Mirrors the host's current permission.
    pub fn set_permission(&mut self, permission: Permission) {
        if self.supported {
            self.permission = permission;
        }
        if permission != Permission::Default {
            self.request_outstanding = false;
        }
    }

    /// Whether the core asked for a permission prompt the host has not answered.
    pub fn permission_request_outstanding(&self) -> bool {
        self.request_outstanding
    }

    /// Takes every queued notification in emission order.
    pub fn drain(&mut self) -> Vec<NotificationRequest> {
        std::mem::take(&mut self.outbox)
    }

    pub fn queued(&self) -> &[NotificationRequest] {
        &self.outbox
    }
}

impl NotificationPlatform for OutboxPlatform {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn permission(&self) -> Permission {
        self.permission
    }

    fn request_permission(&mut self) -> PermissionRequest {
        if self.permission != Permission::Default {
            return PermissionRequest::Resolved(self.permission);
        }
        self.request_outstanding = true;
        PermissionRequest::Pending
    }

    fn notify(&mut self, request: &NotificationRequest) -> Result<(), PlatformError> {
        if !self.supported || self.permission != Permission::Granted {
            return Err(PlatformError::NotPermitted(self.permission));
        }
        // Same tag replaces the queued entry, matching host notification semantics.
        self.outbox.retain(|queued| queued.tag != request.tag);
        self.outbox.push(request.clone());
        Ok(())
    }
}
