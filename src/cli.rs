use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::models::{JournalEntry, Priority, Task, TaskDraft};
use crate::query::{self, EntryFilter, FilterTaskStatus, TaskFilter};
use crate::snapshot::SnapshotError;
use crate::store::{Store, StoreError};
use crate::utils::{export_file_name, format_tags, parse_date, parse_tags};

#[derive(Parser)]
#[command(name = "daybook")]
#[command(about = "Journal entries and tasks, exchanged as JSON snapshots")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Working snapshot file (overrides snapshot_path from the config)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Use development mode (uses separate dev config/snapshot)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summary stats with the newest entries and tasks (default if no subcommand)
    Dashboard,
    /// Write a journal entry; #tags in the text are picked up automatically
    AddEntry {
        /// Entry text
        text: String,
    },
    /// Replace the text of a journal entry
    EditEntry {
        id: String,
        /// New entry text
        text: String,
    },
    /// Delete a journal entry
    DeleteEntry { id: String },
    /// List journal entries, newest first
    Entries {
        /// Case-insensitive search over text and tags
        #[arg(short, long, default_value = "")]
        query: String,
        /// Only entries saved on this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// Only entries carrying this tag
        #[arg(long)]
        tag: Option<String>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a task
    AddTask {
        /// Task title
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// Change a task; fields not given are kept
    EditTask {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Due date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
        /// Comma-separated tags, replacing the current ones
        #[arg(long)]
        tags: Option<String>,
    },
    /// Mark a task done, or back to todo
    ToggleTask { id: String },
    /// Delete a task
    DeleteTask { id: String },
    /// List tasks, newest first
    Tasks {
        /// Case-insensitive search over title, description and tags
        #[arg(short, long, default_value = "")]
        query: String,
        /// Only tasks carrying this tag
        #[arg(long)]
        tag: Option<String>,
        #[arg(long, value_enum, default_value_t = FilterTaskStatus::All)]
        status: FilterTaskStatus,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List every tag in use
    Tags,
    /// Journal and task statistics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a random journal entry
    Random,
    /// Write a snapshot of all entries and tasks
    Export {
        /// Output file (defaults to journal-tasks-<date>.json in the export directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Load entries (and tasks, if present) from a snapshot file
    Import {
        file: PathBuf,
    },
}

impl Commands {
    /// Whether the command changes the store and must be written back
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Commands::AddEntry { .. }
                | Commands::EditEntry { .. }
                | Commands::DeleteEntry { .. }
                | Commands::AddTask { .. }
                | Commands::EditTask { .. }
                | Commands::ToggleTask { .. }
                | Commands::DeleteTask { .. }
                | Commands::Import { .. }
        )
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    StoreError(#[from] StoreError),
    #[error("Import failed: {0}")]
    SnapshotError(#[from] SnapshotError),
    #[error("Failed to parse date: {0}")]
    DateParseError(String),
    #[error("File error: {0}")]
    FileError(String),
    #[error("Failed to encode output: {0}")]
    EncodeError(#[from] serde_json::Error),
}

/// A store backed by a working snapshot file for the length of one command
pub struct Session {
    pub store: Store,
    path: PathBuf,
}

impl Session {
    /// Load the working snapshot, or start fresh if there is none yet
    pub fn open(path: &Path, seed_sample_data: bool) -> Result<Self, CliError> {
        let mut store = Store::new();
        if path.exists() {
            let raw = read_file(path)?;
            store.import_snapshot(&raw)?;
            debug!(path = %path.display(), "loaded working snapshot");
        } else if seed_sample_data {
            store = Store::with_sample_data();
            debug!("no working snapshot, starting from sample data");
        }
        Ok(Self { store, path: path.to_path_buf() })
    }

    /// Write the store back to the working snapshot
    pub fn save(&self) -> Result<(), CliError> {
        let json = self.store.export_snapshot().to_json()?;
        write_file(&self.path, &json)?;
        debug!(path = %self.path.display(), "saved working snapshot");
        Ok(())
    }
}

fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path)
        .map_err(|e| CliError::FileError(format!("{}: {}", path.display(), e)))
}

fn write_file(path: &Path, contents: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| CliError::FileError(format!("{}: {}", parent.display(), e)))?;
        }
    }
    fs::write(path, contents)
        .map_err(|e| CliError::FileError(format!("{}: {}", path.display(), e)))
}

fn parse_due(due: &str) -> Result<Option<chrono::NaiveDate>, CliError> {
    if due.trim().is_empty() {
        return Ok(None);
    }
    parse_date(due)
        .map(Some)
        .map_err(|e| CliError::DateParseError(format!("Invalid date format '{}': {}", due, e)))
}

fn print_entry(entry: &JournalEntry) {
    println!("{}  {} {}", entry.id(), entry.date(), entry.time());
    println!("  {}", entry.text());
    if entry.tags().is_empty() {
        println!("  ({} words)", entry.word_count());
    } else {
        println!("  ({} words) {}", entry.word_count(), format_tags(entry.tags()));
    }
}

fn print_task(task: &Task) {
    let mark = if task.completed() { "x" } else { " " };
    let due = task
        .due_date()
        .map(|d| format!(" due {}", d))
        .unwrap_or_default();
    println!("[{}] {}  {} ({}){}", mark, task.id(), task.title(), task.priority().as_str(), due);
    if !task.description().is_empty() {
        println!("    {}", task.description());
    }
    if !task.tags().is_empty() {
        println!("    {}", format_tags(task.tags()));
    }
}

/// Handle the add-entry command
pub fn handle_add_entry(text: &str, store: &mut Store) -> Result<(), CliError> {
    let entry = store.create_entry(text)?;
    println!("Journal entry created successfully (ID: {})", entry.id());
    Ok(())
}

/// Handle the edit-entry command
pub fn handle_edit_entry(id: &str, text: &str, store: &mut Store) -> Result<(), CliError> {
    let entry = store.update_entry(id, text)?;
    println!("Journal entry updated (ID: {})", entry.id());
    Ok(())
}

/// Handle the delete-entry command
pub fn handle_delete_entry(id: &str, store: &mut Store) -> Result<(), CliError> {
    if store.delete_entry(id) {
        println!("Journal entry deleted (ID: {})", id);
    } else {
        println!("No journal entry with ID {}, nothing deleted", id);
    }
    Ok(())
}

/// Handle the entries command
pub fn handle_entries(
    query: String,
    date: Option<String>,
    tag: Option<String>,
    json: bool,
    store: &Store,
) -> Result<(), CliError> {
    let date = date
        .map(|d| {
            parse_date(&d).map_err(|e| CliError::DateParseError(format!("Invalid date format '{}': {}", d, e)))
        })
        .transpose()?;
    let filter = EntryFilter { query, date, tag };
    let entries = query::filter_entries(store.entries(), &filter);

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else if entries.is_empty() {
        println!("No journal entries found");
    } else {
        for entry in entries {
            print_entry(entry);
        }
    }
    Ok(())
}

/// Handle the add-task command
pub fn handle_add_task(
    title: String,
    description: String,
    priority: Priority,
    due: Option<String>,
    tags: Option<String>,
    store: &mut Store,
) -> Result<(), CliError> {
    let draft = TaskDraft {
        title,
        description,
        priority,
        due_date: match due {
            Some(due) => parse_due(&due)?,
            None => None,
        },
        tags: parse_tags(tags.as_deref()),
    };

    let task = store.create_task(draft)?;
    println!("Task created successfully (ID: {})", task.id());
    Ok(())
}

/// Changes requested by the edit-task command; `None` keeps the current value
#[derive(Debug, Default)]
pub struct TaskEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due: Option<String>,
    pub clear_due: bool,
    pub tags: Option<String>,
}

/// Handle the edit-task command
pub fn handle_edit_task(id: &str, edit: TaskEdit, store: &mut Store) -> Result<(), CliError> {
    let mut draft = store
        .task(id)
        .map(Task::to_draft)
        .ok_or_else(|| StoreError::NotFound { kind: "task", id: id.to_string() })?;

    if let Some(title) = edit.title {
        draft.title = title;
    }
    if let Some(description) = edit.description {
        draft.description = description;
    }
    if let Some(priority) = edit.priority {
        draft.priority = priority;
    }
    if edit.clear_due {
        draft.due_date = None;
    } else if let Some(due) = edit.due {
        draft.due_date = parse_due(&due)?;
    }
    if let Some(tags) = edit.tags {
        draft.tags = parse_tags(Some(&tags));
    }

    let task = store.update_task(id, draft)?;
    println!("Task updated (ID: {})", task.id());
    Ok(())
}

/// Handle the toggle-task command
pub fn handle_toggle_task(id: &str, store: &mut Store) -> Result<(), CliError> {
    let task = store.toggle_task(id)?;
    let state = if task.completed() { "done" } else { "todo" };
    println!("Task {} marked {}", task.id(), state);
    Ok(())
}

/// Handle the delete-task command
pub fn handle_delete_task(id: &str, store: &mut Store) -> Result<(), CliError> {
    if store.delete_task(id) {
        println!("Task deleted (ID: {})", id);
    } else {
        println!("No task with ID {}, nothing deleted", id);
    }
    Ok(())
}

/// Handle the tasks command
pub fn handle_tasks(
    query: String,
    tag: Option<String>,
    status: FilterTaskStatus,
    json: bool,
    store: &Store,
) -> Result<(), CliError> {
    let filter = TaskFilter { query, tag, status };
    let tasks = query::filter_tasks(store.tasks(), &filter);

    if json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
    } else if tasks.is_empty() {
        println!("No tasks found");
    } else {
        for task in tasks {
            print_task(task);
        }
    }
    Ok(())
}

/// Handle the tags command
pub fn handle_tags(store: &Store) -> Result<(), CliError> {
    for tag in query::all_tags(store.entries(), store.tasks()) {
        println!("#{}", tag);
    }
    Ok(())
}

/// Handle the stats command
pub fn handle_stats(json: bool, store: &Store) -> Result<(), CliError> {
    let stats = query::compute_stats(store.entries(), store.tasks());
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Journal");
    println!("  Total entries:      {}", stats.total_entries);
    println!("  Total words:        {}", stats.total_words);
    println!("  Avg words/entry:    {}", stats.average_words);
    println!("  Most used tag:      #{}", stats.most_used_tag.as_deref().unwrap_or("None"));
    println!("Tasks");
    println!("  Total tasks:        {}", stats.total_tasks);
    println!("  Completed:          {}", stats.completed_tasks);
    println!("  Pending:            {}", stats.pending_tasks);
    println!("  Completion rate:    {}%", stats.completion_rate);
    Ok(())
}

/// Handle the random command
pub fn handle_random(store: &Store) -> Result<(), CliError> {
    match store.random_entry() {
        Some(entry) => print_entry(entry),
        None => println!("No journal entries yet"),
    }
    Ok(())
}

/// Handle the dashboard command
pub fn handle_dashboard(config: &Config, store: &Store) -> Result<(), CliError> {
    let stats = query::compute_stats(store.entries(), store.tasks());
    println!(
        "{} entries, {} words | {} tasks: {} done, {} pending",
        stats.total_entries, stats.total_words, stats.total_tasks, stats.completed_tasks, stats.pending_tasks
    );

    println!();
    println!("Recent entries");
    for entry in store.recent_entries(config.recent_limit) {
        print_entry(entry);
    }
    println!();
    println!("Recent tasks");
    for task in store.recent_tasks(config.recent_limit) {
        print_task(task);
    }
    Ok(())
}

/// Handle the export command
pub fn handle_export(out: Option<PathBuf>, config: &Config, store: &Store) -> Result<PathBuf, CliError> {
    let snapshot = store.export_snapshot();
    let path = out.unwrap_or_else(|| {
        let date = snapshot.export_date.with_timezone(&chrono::Local).date_naive();
        config.get_export_dir().join(export_file_name(date))
    });

    write_file(&path, &snapshot.to_json()?)?;
    info!(path = %path.display(), "exported snapshot");
    println!("Exported {} entries and {} tasks to {}", snapshot.journal_entries.len(), snapshot.tasks.len(), path.display());
    Ok(path)
}

/// Handle the import command
pub fn handle_import(file: &Path, store: &mut Store) -> Result<(), CliError> {
    let raw = read_file(file)?;
    let summary = store.import_snapshot(&raw)?;
    match summary.tasks {
        Some(tasks) => println!("Imported {} entries and {} tasks", summary.entries, tasks),
        None => println!("Imported {} entries (tasks unchanged)", summary.entries),
    }
    Ok(())
}
