use itemstore_core::db::migrations::latest_version;
use itemstore_core::{
    DbError, FieldMap, MediumError, SqliteMedium, StorageMedium, Store, StoreError,
};
use rusqlite::Connection;
use serde_json::json;

fn fields(value: serde_json::Value) -> FieldMap {
    value.as_object().expect("test fields must be an object").clone()
}

#[test]
fn store_round_trips_through_a_file_backed_medium() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("itemstore.db");

    let created_id;
    {
        let medium = SqliteMedium::open(&db_path).unwrap();
        let mut store = Store::open("todos", medium).unwrap();
        let saved = store.save(fields(json!({"title": "persisted"})), None).unwrap();
        created_id = match saved {
            itemstore_core::Saved::Created(item) => item.id,
            other => panic!("unexpected save outcome: {other:?}"),
        };
    }

    let medium = SqliteMedium::open(&db_path).unwrap();
    let store = Store::open("todos", medium).unwrap();
    let items = store.find_all();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, created_id);
    assert_eq!(items[0].fields["title"], json!("persisted"));
}

#[test]
fn corrupt_sqlite_payload_fails_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("itemstore.db");

    {
        let mut medium = SqliteMedium::open(&db_path).unwrap();
        medium.set("todos", "{broken").unwrap();
    }

    let medium = SqliteMedium::open(&db_path).unwrap();
    let result = Store::open("todos", medium);
    assert!(matches!(result, Err(StoreError::Corrupt { .. })));
}

#[test]
fn medium_rejects_databases_from_a_newer_schema() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("itemstore.db");

    {
        let conn = Connection::open(&db_path).unwrap();
        conn.execute_batch(&format!(
            "PRAGMA user_version = {};",
            latest_version() + 1
        ))
        .unwrap();
    }

    let result = SqliteMedium::open(&db_path);
    match result {
        Err(MediumError::Db(DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        })) => {
            assert_eq!(db_version, latest_version() + 1);
            assert_eq!(latest_supported, latest_version());
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("newer schema version must be rejected"),
    }
}

#[test]
fn in_memory_medium_behaves_like_the_file_medium() {
    let medium = SqliteMedium::open_in_memory().unwrap();
    let mut store = Store::open("todos", medium).unwrap();

    store.save(fields(json!({"title": "a"})), None).unwrap();
    store.save(fields(json!({"title": "b"})), None).unwrap();

    let first_id = store.find_all()[0].id;
    let remaining = store.remove(first_id).unwrap();

    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].fields["title"], json!("b"));
}
