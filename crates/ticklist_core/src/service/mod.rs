//! Use-case layer: command execution and sessions.
//!
//! # Responsibility
//! - Execute parsed commands against the task list and its store.
//! - Expose the one-line-in, one-payload-out session entry point.
//!
//! # Invariants
//! - Service code stays backend-agnostic through [`crate::storage::TaskStore`].

pub mod executor;
pub mod session;
