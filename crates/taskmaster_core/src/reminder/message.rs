//! Reminder notification copy.

use crate::model::reminder::NotificationRequest;
use crate::model::task::Task;

pub const REMINDER_TITLE: &str = "TaskMaster Reminder 📝";
pub const REMINDER_TAG: &str = "taskmaster-reminder";
pub const ENABLED_TITLE: &str = "Notifications Enabled! 🔔";
pub const ENABLED_TAG: &str = "taskmaster-enabled";
pub const NOTIFICATION_ICON: &str = "/taskmaster_logo.png";

const MAX_LISTED_TITLES: usize = 3;

/// Builds the periodic summary, or `None` when nothing is pending.
pub fn compose_reminder<'a>(
    incomplete: impl IntoIterator<Item = &'a Task>,
) -> Option<NotificationRequest> {
    let incomplete: Vec<&Task> = incomplete.into_iter().collect();
    let count = incomplete.len();
    if count == 0 {
        return None;
    }

    let listed = incomplete
        .iter()
        .take(MAX_LISTED_TITLES)
        .map(|task| format!("• {}", task.title))
        .collect::<Vec<_>>()
        .join("\n");
    let more = if count > MAX_LISTED_TITLES {
        format!("\n...and {} more", count - MAX_LISTED_TITLES)
    } else {
        String::new()
    };

    Some(NotificationRequest {
        title: REMINDER_TITLE.to_string(),
        body: format!(
            "You have {count} pending task{}!\n\n{listed}{more}",
            plural_suffix(count)
        ),
        icon: NOTIFICATION_ICON.to_string(),
        tag: REMINDER_TAG.to_string(),
        require_interaction: false,
    })
}

/// Confirmation shown right after reminders are switched on.
pub fn compose_enabled_confirmation(
    pending: usize,
    interval_label: &str,
) -> Option<NotificationRequest> {
    if pending == 0 {
        return None;
    }
    Some(NotificationRequest {
        title: ENABLED_TITLE.to_string(),
        body: format!(
            "You'll be reminded about your {pending} pending task{} every {interval_label}.",
            plural_suffix(pending)
        ),
        icon: NOTIFICATION_ICON.to_string(),
        tag: ENABLED_TAG.to_string(),
        require_interaction: false,
    })
}

fn plural_suffix(count: usize) -> &'static str {
    if count > 1 {
        "s"
    } else {
        ""
    }
}
