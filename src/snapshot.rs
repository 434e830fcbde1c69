use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{JournalEntry, Task};
use crate::store::Store;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),
    #[error("Snapshot has an unexpected shape: {0}")]
    Shape(String),
    #[error("Snapshot rejected: {0}")]
    Validation(String),
}

/// Export document: everything in the store plus the time of export
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<'a> {
    pub journal_entries: &'a [JournalEntry],
    pub tasks: &'a [Task],
    pub export_date: DateTime<Utc>,
}

impl Snapshot<'_> {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// A parsed import document. `tasks` is `None` when the document carries no
/// task list at all.
#[derive(Debug, Clone)]
pub struct ImportedSnapshot {
    pub entries: Vec<JournalEntry>,
    pub tasks: Option<Vec<Task>>,
    pub export_date: Option<DateTime<Utc>>,
}

/// What an import replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub entries: usize,
    pub tasks: Option<usize>,
}

/// Entry as it appears on disk. Derived fields in the document are ignored
/// and recomputed from the text.
#[derive(Debug, Deserialize)]
struct EntryRecord {
    id: String,
    timestamp: DateTime<Utc>,
    #[serde(default)]
    date: Option<NaiveDate>,
    #[serde(default)]
    time: Option<NaiveTime>,
    entry: String,
}

impl EntryRecord {
    fn into_entry(self) -> JournalEntry {
        let local = self.timestamp.with_timezone(&Local);
        JournalEntry::restore(
            self.id,
            self.timestamp,
            self.date.unwrap_or_else(|| local.date_naive()),
            self.time.unwrap_or_else(|| local.time()),
            self.entry,
        )
    }
}

pub fn export_snapshot<'a>(entries: &'a [JournalEntry], tasks: &'a [Task]) -> Snapshot<'a> {
    Snapshot {
        journal_entries: entries,
        tasks,
        export_date: Utc::now(),
    }
}

/// Parse and check an import document without touching any store
pub fn parse_snapshot(raw: &str) -> Result<ImportedSnapshot, SnapshotError> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Object(mut doc) = value else {
        return Err(SnapshotError::Shape("expected a JSON object at the top level".to_string()));
    };

    let entries = match doc.remove("journalEntries") {
        Some(list @ Value::Array(_)) => {
            let records: Vec<EntryRecord> = serde_json::from_value(list)
                .map_err(|e| SnapshotError::Shape(format!("journalEntries: {}", e)))?;
            records.into_iter().map(EntryRecord::into_entry).collect::<Vec<_>>()
        }
        Some(_) => return Err(SnapshotError::Shape("journalEntries must be an array".to_string())),
        None => return Err(SnapshotError::Shape("missing journalEntries".to_string())),
    };

    let tasks = match doc.remove("tasks") {
        None | Some(Value::Null) => None,
        Some(list @ Value::Array(_)) => Some(
            serde_json::from_value::<Vec<Task>>(list)
                .map_err(|e| SnapshotError::Shape(format!("tasks: {}", e)))?,
        ),
        Some(_) => return Err(SnapshotError::Shape("tasks must be an array".to_string())),
    };

    let export_date = doc
        .get("exportDate")
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|date| date.with_timezone(&Utc));

    Ok(ImportedSnapshot { entries, tasks, export_date })
}

impl Store {
    pub fn export_snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            journal_entries: self.entries(),
            tasks: self.tasks(),
            export_date: self.now().with_timezone(&Utc),
        }
    }

    /// Replace the journal with the document's entries.
    ///
    /// Tasks are replaced only when the document has a `tasks` list; a
    /// document with entries alone leaves the current tasks in place. On any
    /// error the store is left exactly as it was.
    pub fn import_snapshot(&mut self, raw: &str) -> Result<ImportSummary, SnapshotError> {
        let imported = parse_snapshot(raw).inspect_err(|e| warn!(error = %e, "snapshot import failed"))?;
        let tasks = imported.tasks.as_deref().unwrap_or(self.tasks());
        check_ids(&imported.entries, tasks).inspect_err(|e| warn!(error = %e, "snapshot import failed"))?;

        let summary = ImportSummary {
            entries: imported.entries.len(),
            tasks: imported.tasks.as_ref().map(Vec::len),
        };
        self.replace_entries(imported.entries);
        if let Some(tasks) = imported.tasks {
            self.replace_tasks(tasks);
        }
        info!(entries = summary.entries, tasks = ?summary.tasks, "imported snapshot");
        Ok(summary)
    }
}

/// Ids must be present, unique, and never shared between entries and tasks.
/// Titles and entry text must not be blank.
fn check_ids(entries: &[JournalEntry], tasks: &[Task]) -> Result<(), SnapshotError> {
    let mut seen = HashSet::new();
    for task in tasks {
        if task.id().trim().is_empty() {
            return Err(SnapshotError::Validation("task with empty id".to_string()));
        }
        if task.title().trim().is_empty() {
            return Err(SnapshotError::Validation(format!("task {} has an empty title", task.id())));
        }
        if !seen.insert(task.id()) {
            return Err(SnapshotError::Validation(format!("duplicate task id {}", task.id())));
        }
    }
    for entry in entries {
        if entry.id().trim().is_empty() {
            return Err(SnapshotError::Validation("journal entry with empty id".to_string()));
        }
        if entry.text().trim().is_empty() {
            return Err(SnapshotError::Validation(format!("journal entry {} has no text", entry.id())));
        }
        if !seen.insert(entry.id()) {
            return Err(SnapshotError::Validation(format!("id {} is already in use", entry.id())));
        }
    }
    Ok(())
}
