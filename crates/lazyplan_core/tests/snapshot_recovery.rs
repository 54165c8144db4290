use lazyplan_core::storage::open_store_in_memory;
use lazyplan_core::{
    KvRepository, SqliteKvRepository, Task, TaskStore, TASKS_SNAPSHOT_KEY,
};

#[test]
fn missing_snapshot_loads_as_empty_list() {
    let conn = open_store_in_memory().unwrap();
    let store = TaskStore::load(SqliteKvRepository::try_new(&conn).unwrap()).unwrap();

    assert!(store.tasks().is_empty());
}

#[test]
fn malformed_snapshot_loads_as_empty_list_without_error() {
    let conn = open_store_in_memory().unwrap();
    let kv = SqliteKvRepository::try_new(&conn).unwrap();
    kv.set_value(TASKS_SNAPSHOT_KEY, "{definitely not json").unwrap();

    let store = TaskStore::load(SqliteKvRepository::try_new(&conn).unwrap()).unwrap();
    assert!(store.tasks().is_empty());
}

#[test]
fn wrong_shaped_json_loads_as_empty_list_without_error() {
    let conn = open_store_in_memory().unwrap();
    let kv = SqliteKvRepository::try_new(&conn).unwrap();
    kv.set_value(TASKS_SNAPSHOT_KEY, r#"{"tasks": "not an array"}"#)
        .unwrap();

    let store = TaskStore::load(SqliteKvRepository::try_new(&conn).unwrap()).unwrap();
    assert!(store.tasks().is_empty());
}

#[test]
fn valid_snapshot_loads_the_stored_tasks() {
    let conn = open_store_in_memory().unwrap();
    let kv = SqliteKvRepository::try_new(&conn).unwrap();

    let mut done = Task::new("finished earlier", None, None);
    done.toggle();
    let seeded = vec![Task::new("carry on", None, Some("2026-08-31".to_string())), done];
    kv.set_value(TASKS_SNAPSHOT_KEY, &serde_json::to_string(&seeded).unwrap())
        .unwrap();

    let store = TaskStore::load(SqliteKvRepository::try_new(&conn).unwrap()).unwrap();
    assert_eq!(store.tasks(), seeded.as_slice());
}

#[test]
fn first_mutation_after_recovery_overwrites_the_bad_snapshot() {
    let conn = open_store_in_memory().unwrap();
    let kv = SqliteKvRepository::try_new(&conn).unwrap();
    kv.set_value(TASKS_SNAPSHOT_KEY, "][").unwrap();

    let mut store = TaskStore::load(SqliteKvRepository::try_new(&conn).unwrap()).unwrap();
    let id = store.add("fresh start", None, None).unwrap().unwrap();

    let snapshot = kv.get_value(TASKS_SNAPSHOT_KEY).unwrap().unwrap();
    let decoded: Vec<Task> = serde_json::from_str(&snapshot).unwrap();
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].id, id);
}
