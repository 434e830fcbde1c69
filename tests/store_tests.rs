use daybook::{Priority, Store, StoreError, TaskDraft};

#[test]
fn test_create_then_list_newest_first() {
    let mut store = Store::new();
    store.create_entry("first thoughts").unwrap();
    let entry = store.create_entry("hello #world").unwrap().clone();

    assert_eq!(entry.tags(), ["world"]);
    assert_eq!(entry.word_count(), 2);
    assert_eq!(store.entries()[0].id(), entry.id());
    assert_eq!(store.entries().len(), 2);
}

#[test]
fn test_update_preserves_identity_and_order() {
    let mut store = Store::new();
    let original = store.create_entry("draft #one").unwrap().clone();
    store.create_entry("later entry").unwrap();

    let updated = store.update_entry(original.id(), "new text #two #three").unwrap().clone();
    assert_eq!(updated.id(), original.id());
    assert_eq!(updated.created_at(), original.created_at());
    assert_eq!(updated.tags(), ["two", "three"]);
    assert_eq!(updated.word_count(), 3);

    // still second in the list
    assert_eq!(store.entries()[1].id(), original.id());
}

#[test]
fn test_delete_is_idempotent() {
    let mut store = Store::new();
    let id = store.create_entry("short lived").unwrap().id().to_string();
    store.create_entry("survivor").unwrap();

    assert!(store.delete_entry(&id));
    assert!(!store.delete_entry(&id));
    assert_eq!(store.entries().len(), 1);
    assert_eq!(store.entries()[0].text(), "survivor");

    assert!(!store.delete_task("task_nothing"));
    assert!(store.tasks().is_empty());
}

#[test]
fn test_update_task_never_changes_completion() {
    let mut store = Store::new();
    let id = store.create_task(TaskDraft::new("Pay rent")).unwrap().id().to_string();
    store.toggle_task(&id).unwrap();

    let mut draft = TaskDraft::new("Pay rent and bills");
    draft.priority = Priority::High;
    draft.tags = vec!["home".to_string()];
    let task = store.update_task(&id, draft).unwrap();

    assert!(task.completed());
    assert_eq!(task.priority(), Priority::High);
    assert_eq!(task.tags(), ["home"]);
}

#[test]
fn test_toggle_flips_only_completion() {
    let mut store = Store::new();
    let mut draft = TaskDraft::new("Stretch");
    draft.description = "ten minutes".to_string();
    let before = store.create_task(draft).unwrap().clone();

    let after = store.toggle_task(before.id()).unwrap().clone();
    assert!(after.completed());
    assert_eq!(after.to_draft(), before.to_draft());
    assert_eq!(after.created_at(), before.created_at());

    let back = store.toggle_task(before.id()).unwrap();
    assert_eq!(*back, before);
}

#[test]
fn test_missing_ids_are_errors_except_delete() {
    let mut store = Store::new();
    assert!(matches!(store.update_entry("nope", "text"), Err(StoreError::NotFound { .. })));
    assert!(matches!(store.update_task("nope", TaskDraft::new("x")), Err(StoreError::NotFound { .. })));
    assert!(matches!(store.toggle_task("nope"), Err(StoreError::NotFound { .. })));
}

#[test]
fn test_entry_and_task_ids_never_collide() {
    let mut store = Store::new();
    for i in 0..20 {
        store.create_entry(&format!("entry {}", i)).unwrap();
        store.create_task(TaskDraft::new(format!("task {}", i))).unwrap();
    }
    for entry in store.entries() {
        assert!(store.task(entry.id()).is_none());
    }
}

#[test]
fn test_random_entry_comes_from_store() {
    let mut store = Store::new();
    assert!(store.random_entry().is_none());
    store.create_entry("only one").unwrap();
    assert_eq!(store.random_entry().unwrap().text(), "only one");
}
