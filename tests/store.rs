use checkoff::models::{StatusFilter, Todo, TodoPatch};
use checkoff::store::{Store, StoreError};

fn full(id: i64, title: &str) -> TodoPatch {
    TodoPatch {
        id,
        title: Some(title.to_string()),
        done_at: None,
    }
}

#[test]
fn test_add_then_list_active() {
    let store = Store::open_in_memory().unwrap();
    store.upsert(&full(1000, "buy milk")).unwrap();

    let active = store.list_by_status(StatusFilter::Active).unwrap();
    assert_eq!(
        active,
        vec![Todo {
            id: 1000,
            title: "buy milk".to_string(),
            done_at: None,
        }]
    );
}

#[test]
fn test_completing_moves_between_filters() {
    let store = Store::open_in_memory().unwrap();
    store.upsert(&full(1000, "buy milk")).unwrap();

    let merged = store
        .upsert(&TodoPatch {
            id: 1000,
            title: None,
            done_at: Some(Some(5000)),
        })
        .unwrap();
    assert_eq!(merged.title, "buy milk");
    assert_eq!(merged.done_at, Some(5000));

    let done = store.list_by_status(StatusFilter::Done).unwrap();
    assert_eq!(
        done,
        vec![Todo {
            id: 1000,
            title: "buy milk".to_string(),
            done_at: Some(5000),
        }]
    );
    assert!(store
        .list_by_status(StatusFilter::Active)
        .unwrap()
        .is_empty());
    assert_eq!(store.list_by_status(StatusFilter::All).unwrap().len(), 1);
}

#[test]
fn test_clearing_done_at_reactivates() {
    let store = Store::open_in_memory().unwrap();
    store.upsert(&full(1, "water plants")).unwrap();
    store
        .upsert(&TodoPatch {
            id: 1,
            title: None,
            done_at: Some(Some(42)),
        })
        .unwrap();

    let merged = store
        .upsert(&TodoPatch {
            id: 1,
            title: None,
            done_at: Some(None),
        })
        .unwrap();
    assert_eq!(merged.done_at, None);
    assert_eq!(merged.title, "water plants");

    assert_eq!(store.list_by_status(StatusFilter::Active).unwrap().len(), 1);
    assert!(store.list_by_status(StatusFilter::Done).unwrap().is_empty());
}

#[test]
fn test_upsert_is_idempotent() {
    let store = Store::open_in_memory().unwrap();
    let patch = TodoPatch {
        id: 7,
        title: Some("call mom".to_string()),
        done_at: Some(Some(42)),
    };

    let first = store.upsert(&patch).unwrap();
    let second = store.upsert(&patch).unwrap();
    assert_eq!(first, second);
    assert_eq!(store.list_by_status(StatusFilter::All).unwrap(), vec![second]);
}

#[test]
fn test_remove_then_list_is_empty() {
    let store = Store::open_in_memory().unwrap();
    store.upsert(&full(1000, "buy milk")).unwrap();

    assert!(store.remove(1000).unwrap());
    assert!(store.list_by_status(StatusFilter::All).unwrap().is_empty());
}

#[test]
fn test_remove_of_absent_id_succeeds() {
    let store = Store::open_in_memory().unwrap();
    assert!(!store.remove(9999).unwrap());
}

#[test]
fn test_patch_against_missing_id_creates_record() {
    let store = Store::open_in_memory().unwrap();
    let todo = store
        .upsert(&TodoPatch {
            id: 123,
            title: None,
            done_at: Some(Some(456)),
        })
        .unwrap();

    assert_eq!(todo.title, "");
    assert_eq!(todo.done_at, Some(456));
    assert_eq!(store.list_by_status(StatusFilter::Done).unwrap().len(), 1);
}

#[test]
fn test_list_returns_records_in_creation_order() {
    let store = Store::open_in_memory().unwrap();
    store.upsert(&full(10, "first")).unwrap();
    store.upsert(&full(20, "second")).unwrap();
    store.upsert(&full(30, "third")).unwrap();

    let ids: Vec<i64> = store
        .list_by_status(StatusFilter::All)
        .unwrap()
        .iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec![10, 20, 30]);
}

#[test]
fn test_persists_across_close_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todos.db");

    let store = Store::open(&path).unwrap();
    store.upsert(&full(1, "first")).unwrap();
    store.close().unwrap();

    let store = Store::open(&path).unwrap();
    let all = store.list_by_status(StatusFilter::All).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "first");
}

#[test]
fn test_open_on_denied_path_is_unavailable() {
    let err = Store::open("/nonexistent-dir/deeper/todos.db").unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)));
}
