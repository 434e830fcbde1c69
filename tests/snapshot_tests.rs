use chrono::Utc;
use daybook::snapshot::{export_snapshot, parse_snapshot};
use daybook::{Priority, SnapshotError, Store, TaskDraft};

fn populated_store() -> Store {
    let mut store = Store::new();
    store.create_entry("Morning run #health #outdoors").unwrap();
    store.create_entry("Read two chapters #books").unwrap();

    let mut draft = TaskDraft::new("Renew passport");
    draft.description = "Photos first".to_string();
    draft.priority = Priority::High;
    draft.due_date = chrono::NaiveDate::from_ymd_opt(2025, 9, 1);
    draft.tags = vec!["admin".to_string()];
    let id = store.create_task(draft).unwrap().id().to_string();
    store.toggle_task(&id).unwrap();
    store.create_task(TaskDraft::new("Water plants")).unwrap();
    store
}

#[test]
fn test_export_import_round_trip_is_lossless() {
    let store = populated_store();
    let before = Utc::now();
    let snapshot = store.export_snapshot();
    assert!(snapshot.export_date >= before);

    let json = snapshot.to_json().unwrap();
    let parsed = parse_snapshot(&json).unwrap();
    assert_eq!(parsed.entries, store.entries());
    assert_eq!(parsed.tasks.as_deref(), Some(store.tasks()));

    let mut restored = Store::new();
    restored.import_snapshot(&json).unwrap();
    assert_eq!(restored.entries(), store.entries());
    assert_eq!(restored.tasks(), store.tasks());
}

#[test]
fn test_free_export_uses_current_time() {
    let store = populated_store();
    let before = Utc::now();
    let snapshot = export_snapshot(store.entries(), store.tasks());
    assert!(snapshot.export_date >= before);
    assert_eq!(snapshot.journal_entries.len(), 2);
}

#[test]
fn test_failed_import_leaves_store_untouched() {
    let mut store = populated_store();
    let entries = store.entries().to_vec();
    let tasks = store.tasks().to_vec();

    assert!(matches!(store.import_snapshot("{ not json"), Err(SnapshotError::Format(_))));
    assert!(matches!(store.import_snapshot(r#"{"entries": []}"#), Err(SnapshotError::Shape(_))));
    assert!(matches!(
        store.import_snapshot(r#"{"journalEntries": [], "tasks": [{"id": "task_x", "title": "  ", "createdAt": "2025-01-01T00:00:00Z"}]}"#),
        Err(SnapshotError::Validation(_))
    ));

    assert_eq!(store.entries(), entries.as_slice());
    assert_eq!(store.tasks(), tasks.as_slice());
}

#[test]
fn test_import_with_empty_task_list_clears_tasks() {
    let mut store = populated_store();
    let summary = store.import_snapshot(r#"{"journalEntries": [], "tasks": []}"#).unwrap();
    assert_eq!(summary.entries, 0);
    assert_eq!(summary.tasks, Some(0));
    assert!(store.entries().is_empty());
    assert!(store.tasks().is_empty());
}

#[test]
fn test_import_rejects_entry_id_used_by_existing_task() {
    let mut store = populated_store();
    let task_id = store.tasks()[0].id().to_string();
    let raw = format!(
        r#"{{"journalEntries": [{{"id": "{}", "timestamp": "2025-01-01T00:00:00Z", "entry": "clash"}}]}}"#,
        task_id
    );
    assert!(matches!(store.import_snapshot(&raw), Err(SnapshotError::Validation(_))));
    assert_eq!(store.entries().len(), 2);
}

#[test]
fn test_import_rejects_blank_entry_text() {
    let mut store = populated_store();
    let raw = r#"{"journalEntries": [{"id": "42", "timestamp": "2025-01-01T00:00:00Z", "entry": "   "}]}"#;
    assert!(matches!(store.import_snapshot(raw), Err(SnapshotError::Validation(_))));
    assert_eq!(store.entries().len(), 2);
}
