use itemstore_core::{
    FieldMap, MemoryMedium, Saved, StorageMedium, Store, StoreError,
};
use serde_json::json;

fn fields(value: serde_json::Value) -> FieldMap {
    value.as_object().expect("test fields must be an object").clone()
}

#[test]
fn open_persists_the_initial_empty_collection() {
    let mut medium = MemoryMedium::new();
    let store = Store::open("todos", &mut medium).unwrap();
    assert_eq!(store.name(), "todos");
    assert!(store.find_all().is_empty());
    drop(store);

    assert_eq!(medium.get("todos").unwrap().as_deref(), Some(r#"{"items":[]}"#));
}

#[test]
fn reopening_the_same_name_reproduces_the_items_in_order() {
    let mut medium = MemoryMedium::new();

    let first_id;
    let second_id;
    {
        let mut store = Store::open("todos", &mut medium).unwrap();
        let Saved::Created(first) = store.save(fields(json!({"title": "a"})), None).unwrap()
        else {
            panic!("insert must report Created");
        };
        let Saved::Created(second) = store.save(fields(json!({"title": "b"})), None).unwrap()
        else {
            panic!("insert must report Created");
        };
        first_id = first.id;
        second_id = second.id;
    }

    let reloaded = Store::open("todos", &mut medium).unwrap();
    let items = reloaded.find_all();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, first_id);
    assert_eq!(items[0].fields["title"], json!("a"));
    assert_eq!(items[1].id, second_id);
    assert_eq!(items[1].fields["title"], json!("b"));
}

#[test]
fn every_mutation_is_written_through_before_returning() {
    let mut medium = MemoryMedium::new();

    {
        let mut store = Store::open("todos", &mut medium).unwrap();
        let Saved::Created(created) = store.save(fields(json!({"done": false})), None).unwrap()
        else {
            panic!("insert must report Created");
        };
        store.save(fields(json!({"done": true})), Some(created.id)).unwrap();
    }

    let raw = medium.get("todos").unwrap().expect("payload must exist");
    assert!(raw.contains(r#""done":true"#));
}

#[test]
fn corrupt_payload_fails_to_open() {
    let mut medium = MemoryMedium::new();
    medium.set("todos", "definitely not json").unwrap();

    let result = Store::open("todos", &mut medium);
    match result {
        Err(StoreError::Corrupt { name, .. }) => assert_eq!(name, "todos"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("corrupt payload must not load"),
    }
}

#[test]
fn clear_persists_and_a_fresh_store_loads_empty() {
    let mut medium = MemoryMedium::new();

    {
        let mut store = Store::open("todos", &mut medium).unwrap();
        store.save(fields(json!({"title": "a"})), None).unwrap();
        store.clear().unwrap();
        assert!(store.find_all().is_empty());
    }

    let reloaded = Store::open("todos", &mut medium).unwrap();
    assert!(reloaded.find_all().is_empty());
}

#[test]
fn collections_are_namespaced_by_name() {
    let mut medium = MemoryMedium::new();

    {
        let mut store = Store::open("todos", &mut medium).unwrap();
        store.save(fields(json!({"title": "todo"})), None).unwrap();
    }
    {
        let store = Store::open("notes", &mut medium).unwrap();
        assert!(store.find_all().is_empty());
    }

    let reloaded = Store::open("todos", &mut medium).unwrap();
    assert_eq!(reloaded.find_all().len(), 1);
}

#[test]
fn into_medium_returns_the_underlying_medium() {
    let mut store = Store::open("todos", MemoryMedium::new()).unwrap();
    store.save(fields(json!({"title": "kept"})), None).unwrap();

    let medium = store.into_medium();
    let raw = medium.get("todos").unwrap().expect("payload must exist");
    assert!(raw.contains(r#""title":"kept""#));
}
