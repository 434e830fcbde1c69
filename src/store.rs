use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use rand::thread_rng;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{JournalEntry, Priority, Task, TaskDraft};
use crate::random::pick_random;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0} must not be empty")]
    Validation(&'static str),
    #[error("No {kind} with id {id}")]
    NotFound { kind: &'static str, id: String },
}

impl StoreError {
    fn entry_not_found(id: &str) -> Self {
        StoreError::NotFound { kind: "journal entry", id: id.to_string() }
    }

    fn task_not_found(id: &str) -> Self {
        StoreError::NotFound { kind: "task", id: id.to_string() }
    }
}

/// Owner of the journal entries and tasks for one session.
///
/// Both collections are kept newest-first: creation prepends, edits replace
/// in place. Nothing outside the store mutates them.
pub struct Store {
    entries: Vec<JournalEntry>,
    tasks: Vec<Task>,
    clock: fn() -> DateTime<Local>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Create an empty store reading the system clock
    pub fn new() -> Self {
        Self::with_clock(Local::now)
    }

    /// Create an empty store that stamps saves with the given clock
    pub fn with_clock(clock: fn() -> DateTime<Local>) -> Self {
        Self {
            entries: Vec::new(),
            tasks: Vec::new(),
            clock,
        }
    }

    /// Create a store seeded with one example entry and one example task
    pub fn with_sample_data() -> Self {
        let mut store = Self::new();
        let created = Utc.with_ymd_and_hms(2025, 6, 1, 10, 42, 13).single().unwrap_or_else(Utc::now);
        let local = created.with_timezone(&Local);
        store.entries.push(JournalEntry::restore(
            "1748774533500".to_string(),
            created,
            local.date_naive(),
            local.time(),
            "Today went well. I finished my tasks on time. #productive".to_string(),
        ));

        let mut draft = TaskDraft::new("Complete project proposal");
        draft.description = "Finish writing the Q2 project proposal".to_string();
        draft.priority = Priority::High;
        draft.due_date = NaiveDate::from_ymd_opt(2025, 6, 8);
        draft.tags = vec!["work".to_string(), "urgent".to_string()];
        let created = Utc.with_ymd_and_hms(2025, 6, 7, 10, 0, 0).single().unwrap_or_else(Utc::now);
        store.tasks.push(Task::restore("task_1".to_string(), draft, created));
        store
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn entry(&self, id: &str) -> Option<&JournalEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    /// The `limit` newest entries
    pub fn recent_entries(&self, limit: usize) -> &[JournalEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }

    /// The `limit` newest tasks
    pub fn recent_tasks(&self, limit: usize) -> &[Task] {
        &self.tasks[..limit.min(self.tasks.len())]
    }

    pub fn create_entry(&mut self, text: &str) -> Result<&JournalEntry, StoreError> {
        if text.trim().is_empty() {
            return Err(StoreError::Validation("entry text"));
        }

        let entry = JournalEntry::new(text.to_string(), (self.clock)());
        info!(id = entry.id(), tags = entry.tags().len(), "created journal entry");
        self.entries.insert(0, entry);
        Ok(&self.entries[0])
    }

    pub fn update_entry(&mut self, id: &str, text: &str) -> Result<&JournalEntry, StoreError> {
        if text.trim().is_empty() {
            return Err(StoreError::Validation("entry text"));
        }

        let now = (self.clock)();
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or_else(|| StoreError::entry_not_found(id))?;
        entry.rewrite(text.to_string(), now);
        debug!(id, words = entry.word_count(), "updated journal entry");
        Ok(entry)
    }

    /// Remove an entry. Unknown ids are ignored; returns whether anything was removed.
    pub fn delete_entry(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id() != id);
        let removed = self.entries.len() < before;
        if removed {
            info!(id, "deleted journal entry");
        } else {
            debug!(id, "delete of unknown journal entry ignored");
        }
        removed
    }

    pub fn create_task(&mut self, draft: TaskDraft) -> Result<&Task, StoreError> {
        let draft = validated(draft)?;
        let task = Task::new(draft, (self.clock)());
        info!(id = task.id(), "created task");
        self.tasks.insert(0, task);
        Ok(&self.tasks[0])
    }

    pub fn update_task(&mut self, id: &str, draft: TaskDraft) -> Result<&Task, StoreError> {
        let draft = validated(draft)?;
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id() == id)
            .ok_or_else(|| StoreError::task_not_found(id))?;
        task.apply(draft);
        debug!(id, "updated task");
        Ok(task)
    }

    /// Remove a task. Unknown ids are ignored; returns whether anything was removed.
    pub fn delete_task(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id() != id);
        let removed = self.tasks.len() < before;
        if removed {
            info!(id, "deleted task");
        } else {
            debug!(id, "delete of unknown task ignored");
        }
        removed
    }

    pub fn toggle_task(&mut self, id: &str) -> Result<&Task, StoreError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id() == id)
            .ok_or_else(|| StoreError::task_not_found(id))?;
        task.toggle();
        debug!(id, completed = task.completed(), "toggled task");
        Ok(task)
    }

    /// A uniformly chosen entry, or `None` when the journal is empty
    pub fn random_entry(&self) -> Option<&JournalEntry> {
        pick_random(&self.entries, &mut thread_rng())
    }

    pub(crate) fn now(&self) -> DateTime<Local> {
        (self.clock)()
    }

    pub(crate) fn replace_entries(&mut self, entries: Vec<JournalEntry>) {
        info!(count = entries.len(), "replaced journal entries");
        self.entries = entries;
    }

    pub(crate) fn replace_tasks(&mut self, tasks: Vec<Task>) {
        info!(count = tasks.len(), "replaced tasks");
        self.tasks = tasks;
    }
}

fn validated(mut draft: TaskDraft) -> Result<TaskDraft, StoreError> {
    if draft.title.trim().is_empty() {
        return Err(StoreError::Validation("task title"));
    }
    draft.title = draft.title.trim().to_string();
    Ok(draft)
}
