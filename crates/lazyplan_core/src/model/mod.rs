//! Domain model for the planner.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep the task shape identical to its snapshot wire format.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deletion is a hard delete; the snapshot model carries no tombstones.

pub mod filter;
pub mod task;
