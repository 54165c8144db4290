//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical planner entry shared by store and view layers.
//! - Provide construction helpers that guarantee identity invariants.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `title` is non-blank at creation time; it is not re-validated after.
//! - Completion state is the only field mutated after creation.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every planner task.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = Uuid;

/// Construction-time validation failures for [`Task`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Task identity must never be the nil UUID.
    NilId,
    /// Title must contain at least one non-whitespace character.
    BlankTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "task id must not be the nil uuid"),
            Self::BlankTitle => write!(f, "task title must not be blank"),
        }
    }
}

impl Error for TaskValidationError {}

/// A single planner entry.
///
/// Persisted as one element of the JSON snapshot array, so field names here
/// are the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable global ID used for toggle/delete addressing.
    pub id: TaskId,
    /// Display title. Non-blank at creation time.
    pub title: String,
    /// Optional free-form details.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional calendar date in `YYYY-MM-DD` form, kept as entered.
    #[serde(default)]
    pub due_date: Option<String>,
    /// Completion flag; the only field that changes after creation.
    #[serde(default)]
    pub is_completed: bool,
}

impl Task {
    /// Creates a new task with a generated stable ID.
    ///
    /// The caller is responsible for rejecting blank titles before
    /// construction; see `TaskStore::add` for the silent no-op contract.
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        due_date: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description,
            due_date,
            is_completed: false,
        }
    }

    /// Creates a task with a caller-provided stable ID.
    ///
    /// Used by tests and import paths where identity already exists.
    ///
    /// # Errors
    /// - [`TaskValidationError::NilId`] when `id` is the nil UUID.
    /// - [`TaskValidationError::BlankTitle`] when `title` is whitespace-only.
    pub fn with_id(
        id: TaskId,
        title: impl Into<String>,
        description: Option<String>,
        due_date: Option<String>,
    ) -> Result<Self, TaskValidationError> {
        let task = Self {
            id,
            title: title.into(),
            description,
            due_date,
            is_completed: false,
        };
        task.validate()?;
        Ok(task)
    }

    /// Checks construction-time invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::BlankTitle);
        }
        Ok(())
    }

    /// Flips the completion flag.
    pub fn toggle(&mut self) {
        self.is_completed = !self.is_completed;
    }
}
