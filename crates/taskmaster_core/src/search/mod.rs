//! Derived task views (search, category filter, sort).
//!
//! # Responsibility
//! - Provide pure projections consumed by UI layers.
//!
//! # Invariants
//! - Projections never mutate or persist the collection.

pub mod task_view;
