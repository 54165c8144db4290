//! View-level filter predicate over the task sequence.
//!
//! # Responsibility
//! - Select which tasks are displayed, without mutating state.
//!
//! # Invariants
//! - Filtering is a pure projection; the underlying sequence and its order
//!   are never changed.
//! - Filter state is session-local and never persisted.

use crate::model::task::Task;

/// Which tasks the view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Every task, completed or not.
    #[default]
    All,
    /// Only tasks with `is_completed == false`.
    Active,
    /// Only tasks with `is_completed == true`.
    Completed,
}

impl Filter {
    /// Parses the UI-boundary string form (`all|active|completed`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Stable string form used at UI boundaries and in log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

/// Projects the task sequence through a filter, preserving order.
pub fn apply_filter(tasks: &[Task], filter: Filter) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| match filter {
            Filter::All => true,
            Filter::Active => !task.is_completed,
            Filter::Completed => task.is_completed,
        })
        .collect()
}
