use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::{count_words, extract_tags, whole_seconds};

/// Prefix that keeps task ids apart from journal entry ids
pub const TASK_ID_PREFIX: &str = "task_";

/// A journal record. Tags and word count are derived from the text and are
/// recomputed whenever the text changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JournalEntry {
    id: String,
    #[serde(rename = "timestamp")]
    created_at: DateTime<Utc>,
    date: NaiveDate,
    time: NaiveTime,
    #[serde(rename = "entry")]
    text: String,
    tags: Vec<String>,
    word_count: usize,
}

impl JournalEntry {
    pub fn new(text: String, now: DateTime<Local>) -> Self {
        Self::restore(Uuid::new_v4().to_string(), now.with_timezone(&Utc), now.date_naive(), now.time(), text)
    }

    /// Rebuild an entry from stored fields, re-deriving tags and word count
    pub fn restore(
        id: String,
        created_at: DateTime<Utc>,
        date: NaiveDate,
        time: NaiveTime,
        text: String,
    ) -> Self {
        Self {
            id,
            created_at,
            date,
            time: whole_seconds(time),
            tags: extract_tags(&text),
            word_count: count_words(&text),
            text,
        }
    }

    /// Replace the text and stamp the save time. Id and creation time are kept.
    pub fn rewrite(&mut self, text: String, now: DateTime<Local>) {
        self.tags = extract_tags(&text);
        self.word_count = count_words(&text);
        self.text = text;
        self.date = now.date_naive();
        self.time = whole_seconds(now.time());
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

/// User-editable task fields, as submitted from a task form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub tags: Vec<String>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    priority: Priority,
    #[serde(default, with = "blank_date")]
    due_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    tags: Vec<String>,
}

impl Task {
    pub fn new(draft: TaskDraft, now: DateTime<Local>) -> Self {
        Self::restore(format!("{}{}", TASK_ID_PREFIX, Uuid::new_v4()), draft, now.with_timezone(&Utc))
    }

    /// Rebuild an open task under a known id
    pub fn restore(id: String, draft: TaskDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            completed: false,
            priority: draft.priority,
            due_date: draft.due_date,
            created_at,
            tags: draft.tags,
        }
    }

    /// Overwrite the editable fields. Completion state is left alone.
    pub fn apply(&mut self, draft: TaskDraft) {
        self.title = draft.title;
        self.description = draft.description;
        self.priority = draft.priority;
        self.due_date = draft.due_date;
        self.tags = draft.tags;
    }

    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// The editable fields, ready to be tweaked and passed back to an update
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            priority: self.priority,
            due_date: self.due_date,
            tags: self.tags.clone(),
        }
    }
}

/// Due dates travel as `YYYY-MM-DD`, with an empty string meaning "no date"
mod blank_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.collect_str(&date.format("%Y-%m-%d")),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => crate::utils::parse_date(&raw)
                .map(Some)
                .map_err(|e| de::Error::custom(format!("invalid due date '{}': {}", raw, e))),
            _ => Ok(None),
        }
    }
}
