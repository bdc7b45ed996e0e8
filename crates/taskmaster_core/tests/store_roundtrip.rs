use rusqlite::Connection;
use taskmaster_core::db::migrations::latest_version;
use taskmaster_core::db::{open_db, open_db_in_memory, DbError};
use taskmaster_core::store::{NOTIFICATIONS_ENABLED_KEY, TASKS_KEY};
use taskmaster_core::{
    Category, KeyValueStore, LoadSource, MemoryStore, ReminderSettingsRepository, SqliteStore,
    StoreError, Task, TaskRepository, TaskService,
};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_entries");
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = SqliteStore::open(&path).unwrap_err();
    assert!(matches!(err, StoreError::Db(_)));
}

#[test]
fn collection_round_trips_through_sqlite_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskmaster.sqlite3");

    let saved = {
        let store = SqliteStore::open(&path).unwrap();
        let mut service = TaskService::open(TaskRepository::new(store));
        service.add_at("pay rent", Category::Urgent, 1_700_000_000_000).unwrap();
        service.add_at("gym", Category::Personal, 1_700_000_000_000).unwrap();
        service.toggle_complete(2).unwrap();
        service.delete(1).unwrap();
        service.tasks().to_vec()
    };

    let store = SqliteStore::open(&path).unwrap();
    let reloaded = TaskService::open(TaskRepository::new(store));
    assert_eq!(reloaded.load_source(), LoadSource::Stored);
    assert_eq!(reloaded.tasks(), saved.as_slice());
    assert_eq!(
        saved.iter().map(|task| task.id).collect::<Vec<_>>(),
        vec![2, 3, 1_700_000_000_000, 1_700_000_000_001]
    );
}

#[test]
fn legacy_records_without_category_migrate_to_personal() {
    let legacy = r#"[
        {"id": 10, "title": "old one", "completed": false},
        {"id": 11, "title": "old two", "completed": true, "category": null}
    ]"#;
    let store = MemoryStore::with_entries([(TASKS_KEY, legacy)]);

    let service = TaskService::open(TaskRepository::new(store.clone()));
    assert_eq!(service.load_source(), LoadSource::Stored);
    assert!(service
        .tasks()
        .iter()
        .all(|task| task.category == Category::Personal));

    let rewritten = store.get(TASKS_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&rewritten).unwrap();
    assert_eq!(json[0]["category"], "Personal");
    assert_eq!(json[1]["category"], "Personal");
    assert_eq!(json[1]["completed"], true);
}

#[test]
fn wire_format_uses_plain_field_names() {
    let task = Task::new(42, "ship it", Category::Work).unwrap();
    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"id": 42, "title": "ship it", "completed": false, "category": "Work"})
    );
}

#[test]
fn corrupt_document_survives_open_until_first_change() {
    let corrupt = "[{\"id\": 1, \"title\": ";
    let store = MemoryStore::with_entries([(TASKS_KEY, corrupt)]);
    let mut service = TaskService::open(TaskRepository::new(store.clone()));

    assert_eq!(service.load_source(), LoadSource::SeededCorrupt);
    assert_eq!(service.len(), 3);
    assert_eq!(store.get(TASKS_KEY).unwrap().as_deref(), Some(corrupt));

    service.toggle_complete(1).unwrap();
    let repaired = store.get(TASKS_KEY).unwrap().unwrap();
    assert_eq!(serde_json::from_str::<Vec<Task>>(&repaired).unwrap().len(), 3);
}

#[test]
fn sqlite_store_shares_keys_between_repositories() {
    let store = SqliteStore::open_in_memory().unwrap();
    let mut settings = ReminderSettingsRepository::new(store.clone());
    settings.save_enabled(true).unwrap();
    let _service = TaskService::open(TaskRepository::new(store.clone()));

    assert_eq!(
        store.get(NOTIFICATIONS_ENABLED_KEY).unwrap().as_deref(),
        Some("true")
    );
    assert!(store.get(TASKS_KEY).unwrap().is_some());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
