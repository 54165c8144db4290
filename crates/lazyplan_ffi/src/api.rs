//! FFI use-case API for planner UI shells.
//!
//! # Responsibility
//! - Expose stable, use-case-level task operations to the UI via FRB.
//! - Keep error semantics simple envelope-shaped for UI integration.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Return values are envelopes with stable meaning; Rust error types
//!   never cross the boundary.

use lazyplan_core::storage::open_store;
use lazyplan_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Filter, SqliteKvRepository, Task, TaskStore,
};
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const STORE_DB_FILE_NAME: &str = "lazyplan_tasks.sqlite3";
static STORE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on
///   failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// UI-facing projection of one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    /// Stable task ID in string form.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Optional free-form details.
    pub description: Option<String>,
    /// Optional `YYYY-MM-DD` due date as entered.
    pub due_date: Option<String>,
    /// Completion flag.
    pub is_completed: bool,
}

/// Generic action response envelope for task mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    /// Whether the operation changed state.
    pub ok: bool,
    /// Task ID the operation applied to, when known.
    pub task_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl TaskActionResponse {
    fn success(message: impl Into<String>, task_id: String) -> Self {
        Self {
            ok: true,
            task_id: Some(task_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task_id: None,
            message: message.into(),
        }
    }
}

/// List response envelope for the filtered projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    /// Tasks passing the applied filter, in sequence order.
    pub items: Vec<TaskView>,
    /// Human-readable response message for diagnostics.
    pub message: String,
    /// Effective applied filter (`all|active|completed`).
    pub applied_filter: String,
}

/// Adds a task from UI form input.
///
/// Blank or whitespace-only titles are ignored per the store contract; the
/// envelope reports `ok=false` so the form can stay populated.
///
/// # FFI contract
/// - Sync call, store-backed execution.
/// - Never panics.
/// - Returns the created task ID on success.
#[flutter_rust_bridge::frb(sync)]
pub fn add_task(
    title: String,
    description: Option<String>,
    due_date: Option<String>,
) -> TaskActionResponse {
    let result = with_task_store(|store| {
        store.add(title.as_str(), description.as_deref(), due_date.as_deref())
    });
    match result {
        Ok(Some(task_id)) => TaskActionResponse::success("Task added.", task_id.to_string()),
        Ok(None) => TaskActionResponse::failure("Title is empty; nothing added."),
        Err(err) => TaskActionResponse::failure(format!("add_task failed: {err}")),
    }
}

/// Toggles completion for one task.
///
/// # FFI contract
/// - Sync call, store-backed execution.
/// - Never panics.
/// - Unknown or malformed ids report `ok=false` without changing state.
#[flutter_rust_bridge::frb(sync)]
pub fn toggle_task(id: String) -> TaskActionResponse {
    let Some(task_id) = parse_task_id(&id) else {
        return TaskActionResponse::failure(format!("invalid task id `{id}`"));
    };
    match with_task_store(|store| store.toggle(task_id)) {
        Ok(true) => TaskActionResponse::success("Task toggled.", task_id.to_string()),
        Ok(false) => TaskActionResponse::failure("Task not found."),
        Err(err) => TaskActionResponse::failure(format!("toggle_task failed: {err}")),
    }
}

/// Deletes one task.
///
/// # FFI contract
/// - Sync call, store-backed execution.
/// - Never panics.
/// - Unknown or malformed ids report `ok=false` without changing state.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_task(id: String) -> TaskActionResponse {
    let Some(task_id) = parse_task_id(&id) else {
        return TaskActionResponse::failure(format!("invalid task id `{id}`"));
    };
    match with_task_store(|store| store.remove(task_id)) {
        Ok(true) => TaskActionResponse::success("Task deleted.", task_id.to_string()),
        Ok(false) => TaskActionResponse::failure("Task not found."),
        Err(err) => TaskActionResponse::failure(format!("delete_task failed: {err}")),
    }
}

/// Lists tasks through the filter projection.
///
/// `filter` is one of `all|active|completed`; unknown values fall back to
/// `all` so the UI never loses its list.
///
/// # FFI contract
/// - Sync call, store-backed execution.
/// - Never panics.
/// - Returns a deterministic envelope with the applied filter.
#[flutter_rust_bridge::frb(sync)]
pub fn list_tasks(filter: String) -> TaskListResponse {
    let applied = Filter::parse(&filter).unwrap_or_default();
    let result = with_task_store(|store| {
        Ok(store
            .filtered(applied)
            .into_iter()
            .map(to_task_view)
            .collect::<Vec<_>>())
    });
    match result {
        Ok(items) => {
            let message = if items.is_empty() {
                "No tasks.".to_string()
            } else {
                format!("{} task(s).", items.len())
            };
            TaskListResponse {
                items,
                message,
                applied_filter: applied.as_str().to_string(),
            }
        }
        Err(err) => TaskListResponse {
            items: Vec::new(),
            message: format!("list_tasks failed: {err}"),
            applied_filter: applied.as_str().to_string(),
        },
    }
}

fn parse_task_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

fn resolve_store_db_path() -> PathBuf {
    STORE_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("LAZYPLAN_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STORE_DB_FILE_NAME)
        })
        .clone()
}

fn with_task_store<T>(
    f: impl FnOnce(&mut TaskStore<SqliteKvRepository<'_>>) -> lazyplan_core::RepoResult<T>,
) -> Result<T, String> {
    let db_path = resolve_store_db_path();
    let conn = open_store(&db_path).map_err(|err| format!("store open failed: {err}"))?;
    let repo = SqliteKvRepository::try_new(&conn)
        .map_err(|err| format!("store repo init failed: {err}"))?;
    let mut store = TaskStore::load(repo).map_err(|err| format!("store load failed: {err}"))?;
    f(&mut store).map_err(|err| err.to_string())
}

fn to_task_view(task: &Task) -> TaskView {
    TaskView {
        id: task.id.to_string(),
        title: task.title.clone(),
        description: task.description.clone(),
        due_date: task.due_date.clone(),
        is_completed: task.is_completed,
    }
}

#[cfg(test)]
mod tests {
    use super::{add_task, core_version, delete_task, init_logging, list_tasks, ping, toggle_task};
    use std::sync::Mutex;
    use std::time::{SystemTime, UNIX_EPOCH};

    // The FFI surface shares one store file per process; mutations from
    // parallel tests would interleave load/save cycles otherwise.
    static STORE_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn add_task_rejects_blank_title() {
        let _guard = lock_store();
        let response = add_task("   ".to_string(), None, None);
        assert!(!response.ok);
        assert_eq!(response.task_id, None);
    }

    #[test]
    fn add_task_then_list_contains_the_new_task() {
        let _guard = lock_store();
        let title = unique_token("ffi-add");
        let created = add_task(title.clone(), Some("details".to_string()), None);
        assert!(created.ok, "{}", created.message);
        let created_id = created.task_id.expect("add should return task_id");

        let listed = list_tasks("all".to_string());
        assert_eq!(listed.applied_filter, "all");
        let item = listed
            .items
            .iter()
            .find(|item| item.id == created_id)
            .expect("created task should be listed");
        assert_eq!(item.title, title);
        assert_eq!(item.description.as_deref(), Some("details"));
        assert!(!item.is_completed);
    }

    #[test]
    fn toggle_task_moves_between_filter_projections() {
        let _guard = lock_store();
        let created = add_task(unique_token("ffi-toggle"), None, None);
        assert!(created.ok, "{}", created.message);
        let id = created.task_id.expect("add should return task_id");

        let toggled = toggle_task(id.clone());
        assert!(toggled.ok, "{}", toggled.message);
        let completed = list_tasks("completed".to_string());
        assert!(completed.items.iter().any(|item| item.id == id));

        let toggled_back = toggle_task(id.clone());
        assert!(toggled_back.ok, "{}", toggled_back.message);
        let active = list_tasks("active".to_string());
        assert!(active.items.iter().any(|item| item.id == id));
    }

    #[test]
    fn delete_task_removes_it_from_every_projection() {
        let _guard = lock_store();
        let created = add_task(unique_token("ffi-delete"), None, None);
        assert!(created.ok, "{}", created.message);
        let id = created.task_id.expect("add should return task_id");

        let deleted = delete_task(id.clone());
        assert!(deleted.ok, "{}", deleted.message);

        let listed = list_tasks("all".to_string());
        assert!(listed.items.iter().all(|item| item.id != id));
    }

    #[test]
    fn toggle_task_rejects_malformed_id() {
        let _guard = lock_store();
        let response = toggle_task("not-a-uuid".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("invalid task id"));
    }

    #[test]
    fn list_tasks_falls_back_to_all_for_unknown_filter() {
        let _guard = lock_store();
        let response = list_tasks("archived".to_string());
        assert_eq!(response.applied_filter, "all");
    }

    #[test]
    fn snapshot_row_exists_after_first_mutation() {
        let _guard = lock_store();
        let created = add_task(unique_token("ffi-snapshot"), None, None);
        assert!(created.ok, "{}", created.message);

        let conn = rusqlite::Connection::open(super::resolve_store_db_path()).expect("open db");
        let value: String = conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [lazyplan_core::TASKS_SNAPSHOT_KEY],
                |row| row.get(0),
            )
            .expect("snapshot row should exist");
        assert!(value.starts_with('['));
    }

    fn lock_store() -> std::sync::MutexGuard<'static, ()> {
        STORE_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
