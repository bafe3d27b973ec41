//! Task domain model.
//!
//! # Responsibility
//! - Define the task shapes and the ordered list commands operate on.
//!
//! # Invariants
//! - Every task has a non-empty trimmed name.
//! - The list keeps insertion order; no uniqueness is enforced.

pub mod task;
pub mod task_list;
