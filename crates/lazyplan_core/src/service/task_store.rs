//! Planner view-model: ordered task sequence plus persistence side effects.
//!
//! # Responsibility
//! - Own the in-memory task sequence for the running session.
//! - Mirror the full sequence into the key-value store after each mutation.
//!
//! # Invariants
//! - Every successful mutation writes the full snapshot before returning.
//! - No-op calls (blank title, absent id) leave both memory and storage
//!   untouched.
//! - A missing or malformed snapshot loads as an empty sequence; storage
//!   transport errors still propagate.

use crate::model::filter::{apply_filter, Filter};
use crate::model::task::{Task, TaskId};
use crate::repo::kv_repo::{KvRepository, RepoError, RepoResult};
use log::{info, warn};

/// Fixed namespaced key holding the JSON-encoded task array.
pub const TASKS_SNAPSHOT_KEY: &str = "lazyplan/tasks";

/// Session-owned task state bound to a snapshot repository.
pub struct TaskStore<R: KvRepository> {
    repo: R,
    tasks: Vec<Task>,
}

impl<R: KvRepository> TaskStore<R> {
    /// Loads the prior snapshot, falling back to an empty sequence when the
    /// key is missing or its payload does not decode.
    pub fn load(repo: R) -> RepoResult<Self> {
        let tasks = match repo.get_value(TASKS_SNAPSHOT_KEY)? {
            Some(raw) => decode_snapshot(&raw),
            None => Vec::new(),
        };
        info!(
            "event=store_load module=service status=ok task_count={}",
            tasks.len()
        );
        Ok(Self { repo, tasks })
    }

    /// Appends a new task and persists the snapshot.
    ///
    /// A blank or whitespace-only title is silently ignored: the sequence is
    /// unchanged, nothing is written, and `Ok(None)` is returned.
    pub fn add(
        &mut self,
        title: &str,
        description: Option<&str>,
        due_date: Option<&str>,
    ) -> RepoResult<Option<TaskId>> {
        let title = title.trim();
        if title.is_empty() {
            info!("event=task_add module=service status=skipped reason=blank_title");
            return Ok(None);
        }

        let task = Task::new(title, normalize_optional(description), normalize_optional(due_date));
        let id = task.id;
        self.tasks.push(task);
        self.persist()?;
        info!(
            "event=task_add module=service status=ok task_id={id} task_count={}",
            self.tasks.len()
        );
        Ok(Some(id))
    }

    /// Flips completion on the matching task and persists the snapshot.
    ///
    /// Returns `Ok(false)` without writing when no task has `id`.
    pub fn toggle(&mut self, id: TaskId) -> RepoResult<bool> {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            info!("event=task_toggle module=service status=skipped reason=not_found task_id={id}");
            return Ok(false);
        };

        task.toggle();
        let is_completed = task.is_completed;
        self.persist()?;
        info!(
            "event=task_toggle module=service status=ok task_id={id} is_completed={is_completed}"
        );
        Ok(true)
    }

    /// Deletes the matching task and persists the snapshot.
    ///
    /// Returns `Ok(false)` without writing when no task has `id`.
    pub fn remove(&mut self, id: TaskId) -> RepoResult<bool> {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() == before {
            info!("event=task_remove module=service status=skipped reason=not_found task_id={id}");
            return Ok(false);
        }

        self.persist()?;
        info!(
            "event=task_remove module=service status=ok task_id={id} task_count={}",
            self.tasks.len()
        );
        Ok(true)
    }

    /// Full ordered task sequence.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Filtered projection of the sequence; see [`apply_filter`].
    pub fn filtered(&self, filter: Filter) -> Vec<&Task> {
        apply_filter(&self.tasks, filter)
    }

    fn persist(&self) -> RepoResult<()> {
        let snapshot = encode_snapshot(&self.tasks)?;
        self.repo.set_value(TASKS_SNAPSHOT_KEY, &snapshot)
    }
}

fn encode_snapshot(tasks: &[Task]) -> RepoResult<String> {
    serde_json::to_string(tasks)
        .map_err(|err| RepoError::InvalidData(format!("snapshot encode failed: {err}")))
}

fn decode_snapshot(raw: &str) -> Vec<Task> {
    match serde_json::from_str::<Vec<Task>>(raw) {
        Ok(tasks) => tasks,
        Err(err) => {
            warn!(
                "event=snapshot_recovered module=service status=ok reason=malformed_snapshot error={err}"
            );
            Vec::new()
        }
    }
}

fn normalize_optional(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}
