//! Periodic reminder notifications for incomplete tasks.
//!
//! # Responsibility
//! - Gate reminders on a persisted flag and the host permission.
//! - Summarize pending tasks into tagged notifications.
//!
//! # Invariants
//! - No timers run inside core; hosts poll `ReminderScheduler::poll` at or
//!   after `next_due_ms`.

pub mod message;
pub mod platform;
pub mod schedule;
pub mod scheduler;
