//! Domain model for tasks and reminders.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep wire field names stable for the persisted task document.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deletion is a hard removal from the collection.

pub mod reminder;
pub mod task;
