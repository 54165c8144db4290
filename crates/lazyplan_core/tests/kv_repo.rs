use lazyplan_core::storage::migrations::latest_version;
use lazyplan_core::storage::open_store_in_memory;
use lazyplan_core::{KvRepository, RepoError, SqliteKvRepository};
use rusqlite::Connection;

#[test]
fn set_and_get_round_trip() {
    let conn = open_store_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();

    repo.set_value("planner/sample", "payload").unwrap();
    assert_eq!(
        repo.get_value("planner/sample").unwrap().as_deref(),
        Some("payload")
    );
}

#[test]
fn get_missing_key_returns_none() {
    let conn = open_store_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();

    assert_eq!(repo.get_value("planner/absent").unwrap(), None);
}

#[test]
fn set_overwrites_existing_value() {
    let conn = open_store_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();

    repo.set_value("planner/sample", "first").unwrap();
    repo.set_value("planner/sample", "second").unwrap();

    assert_eq!(
        repo.get_value("planner/sample").unwrap().as_deref(),
        Some("second")
    );
}

#[test]
fn remove_is_idempotent() {
    let conn = open_store_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();

    repo.set_value("planner/sample", "payload").unwrap();
    repo.remove_value("planner/sample").unwrap();
    repo.remove_value("planner/sample").unwrap();

    assert_eq!(repo.get_value("planner/sample").unwrap(), None);
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteKvRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteKvRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("kv_entries"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE kv_entries (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteKvRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "kv_entries",
            column: "updated_at"
        })
    ));
}
