//! Key-value repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable get/set/remove APIs over the `kv_entries` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `try_new` must reject connections whose schema was not bootstrapped by
//!   `open_store`/`open_store_in_memory`.
//! - `set_value` is an upsert; `remove_value` is idempotent.

use crate::storage::migrations::latest_version;
use crate::storage::StorageError;
use rusqlite::{params, Connection};
use std::error::Error;
use std::fmt::{Display, Formatter};

const KV_TABLE: &str = "kv_entries";
const KV_REQUIRED_COLUMNS: &[&str] = &["key", "value", "updated_at"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for key-value persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Storage(StorageError),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it through the storage bootstrap"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StorageError> for RepoError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(StorageError::Sqlite(value))
    }
}

/// Repository interface for namespaced key-value persistence.
pub trait KvRepository {
    fn get_value(&self, key: &str) -> RepoResult<Option<String>>;
    fn set_value(&self, key: &str, value: &str) -> RepoResult<()>;
    fn remove_value(&self, key: &str) -> RepoResult<()>;
}

/// SQLite-backed key-value repository.
pub struct SqliteKvRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvRepository<'conn> {
    /// Wraps a connection after verifying its schema is usable.
    ///
    /// # Errors
    /// - [`RepoError::UninitializedConnection`] when `PRAGMA user_version`
    ///   does not match the latest migration.
    /// - [`RepoError::MissingRequiredTable`] / [`RepoError::MissingRequiredColumn`]
    ///   when the key-value table shape is unexpected.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let table_exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
            );",
            [KV_TABLE],
            |row| row.get(0),
        )?;
        if table_exists == 0 {
            return Err(RepoError::MissingRequiredTable(KV_TABLE));
        }

        let mut stmt = conn.prepare(&format!("PRAGMA table_info({KV_TABLE});"))?;
        let mut rows = stmt.query([])?;
        let mut columns = Vec::new();
        while let Some(row) = rows.next()? {
            columns.push(row.get::<_, String>("name")?);
        }
        for required in KV_REQUIRED_COLUMNS.iter().copied() {
            if !columns.iter().any(|name| name.as_str() == required) {
                return Err(RepoError::MissingRequiredColumn {
                    table: KV_TABLE,
                    column: required,
                });
            }
        }

        Ok(Self { conn })
    }
}

impl KvRepository for SqliteKvRepository<'_> {
    fn get_value(&self, key: &str) -> RepoResult<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM kv_entries WHERE key = ?1;")?;
        let mut rows = stmt.query([key])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(row.get(0)?));
        }
        Ok(None)
    }

    fn set_value(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_value(&self, key: &str) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }
}
