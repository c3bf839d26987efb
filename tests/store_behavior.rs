// Tests for task store operations and id assignment.
use ptrack::store::{IdPolicy, StoreError, StoreOptions, TaskStore};

fn make_store() -> TaskStore {
    TaskStore::in_memory(StoreOptions::default())
}

fn monotonic_store() -> TaskStore {
    TaskStore::in_memory(StoreOptions {
        id_policy: IdPolicy::Monotonic,
        ..Default::default()
    })
}

#[test]
fn test_first_task_and_summary() {
    let mut store = make_store();
    let task = store.add("Write report", "20-06-2099").unwrap();

    assert_eq!(task.id, 1);
    assert!(!task.is_completed);

    let s = store.summarize();
    assert_eq!((s.total, s.completed, s.pending), (1, 0, 1));
}

#[test]
fn test_length_policy_reuses_id_after_delete() {
    let mut store = make_store();
    store.add("Only", "20-06-2099").unwrap();
    store.delete(1).unwrap();
    assert!(store.is_empty());

    let again = store.add("Next", "21-06-2099").unwrap();
    assert_eq!(again.id, 1);
}

#[test]
fn test_monotonic_policy_never_reuses_within_a_run() {
    let mut store = monotonic_store();
    store.add("Only", "20-06-2099").unwrap();
    store.delete(1).unwrap();

    let again = store.add("Next", "21-06-2099").unwrap();
    assert_eq!(again.id, 2);
}

#[test]
fn test_delete_preserves_order() {
    let mut store = make_store();
    for title in ["a", "b", "c", "d"] {
        store.add(title, "01-01-2099").unwrap();
    }
    let removed = store.delete(2).unwrap();
    assert_eq!(removed.title, "b");

    let titles: Vec<&str> = store.tasks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["a", "c", "d"]);
}

#[test]
fn test_mark_completed_is_idempotent() {
    let mut once = make_store();
    once.add("a", "01-01-2099").unwrap();
    once.mark_completed(1).unwrap();

    let mut twice = make_store();
    twice.add("a", "01-01-2099").unwrap();
    twice.mark_completed(1).unwrap();
    twice.mark_completed(1).unwrap();

    assert_eq!(once.tasks(), twice.tasks());
    assert_eq!(twice.summarize().completed, 1);
}

#[test]
fn test_edit_in_place() {
    let mut store = make_store();
    store.add("a", "01-01-2099").unwrap();
    store.add("b", "01-01-2099").unwrap();
    store.edit(2, "b2", "02-02-2099").unwrap();

    let t = &store.tasks()[1];
    assert_eq!((t.id, t.title.as_str(), t.due_date.as_str()), (2, "b2", "02-02-2099"));
    assert!(!t.is_completed);
}

#[test]
fn test_find_by_id() {
    let mut store = make_store();
    store.add("a", "01-01-2099").unwrap();
    store.add("b", "01-01-2099").unwrap();
    assert_eq!(store.find_by_id(2).unwrap(), 1);
    assert!(matches!(store.find_by_id(3), Err(StoreError::NotFound(3))));
}

#[test]
fn test_summary_totals_always_add_up() {
    let mut store = make_store();
    for i in 0..5 {
        store.add(&format!("t{}", i), "01-01-2099").unwrap();
    }
    store.mark_completed(2).unwrap();
    store.mark_completed(4).unwrap();
    store.delete(1).unwrap();

    let s = store.summarize();
    assert_eq!(s.total, 4);
    assert_eq!(s.completed + s.pending, s.total);
    assert_eq!(s.completed, 2);
}
