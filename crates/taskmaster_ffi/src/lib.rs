//! Flutter-facing bridge for the TaskMaster core.

pub mod api;
