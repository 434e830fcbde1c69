use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::models::{JournalEntry, Task};

/// Criteria for the journal list. Empty criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub query: String,
    pub date: Option<NaiveDate>,
    pub tag: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FilterTaskStatus {
    Todo,
    Done,
    #[default]
    All,
}

/// Criteria for the task list. Empty criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub query: String,
    pub tag: Option<String>,
    pub status: FilterTaskStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_entries: usize,
    pub total_words: usize,
    pub average_words: usize,
    pub most_used_tag: Option<String>,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    /// Whole percent of tasks completed
    pub completion_rate: usize,
}

/// Every tag in use, entries first then tasks, each listed once in the order
/// it was first seen
pub fn all_tags(entries: &[JournalEntry], tasks: &[Task]) -> Vec<String> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .flat_map(|e| e.tags())
        .chain(tasks.iter().flat_map(|t| t.tags()))
        .filter(|tag| seen.insert(tag.as_str()))
        .cloned()
        .collect()
}

pub fn filter_entries<'a>(entries: &'a [JournalEntry], filter: &EntryFilter) -> Vec<&'a JournalEntry> {
    let query = filter.query.to_lowercase();
    entries
        .iter()
        // Search text and tags
        .filter(|entry| {
            query.is_empty()
                || entry.text().to_lowercase().contains(&query)
                || entry.tags().iter().any(|t| t.to_lowercase().contains(&query))
        })
        .filter(|entry| filter.date.is_none_or(|date| entry.date() == date))
        .filter(|entry| tag_matches(entry.tags(), filter.tag.as_deref()))
        .collect()
}

pub fn filter_tasks<'a>(tasks: &'a [Task], filter: &TaskFilter) -> Vec<&'a Task> {
    let query = filter.query.to_lowercase();
    tasks
        .iter()
        // Search title, description and tags
        .filter(|task| {
            query.is_empty()
                || task.title().to_lowercase().contains(&query)
                || task.description().to_lowercase().contains(&query)
                || task.tags().iter().any(|t| t.to_lowercase().contains(&query))
        })
        .filter(|task| tag_matches(task.tags(), filter.tag.as_deref()))
        .filter(|task| match filter.status {
            FilterTaskStatus::Todo => !task.completed(),
            FilterTaskStatus::Done => task.completed(),
            FilterTaskStatus::All => true,
        })
        .collect()
}

fn tag_matches(tags: &[String], wanted: Option<&str>) -> bool {
    match wanted {
        Some(wanted) if !wanted.is_empty() => tags.iter().any(|t| t == wanted),
        _ => true,
    }
}

pub fn compute_stats(entries: &[JournalEntry], tasks: &[Task]) -> Stats {
    let total_entries = entries.len();
    let total_words = entries.iter().map(|e| e.word_count()).sum();
    let total_tasks = tasks.len();
    let completed_tasks = tasks.iter().filter(|t| t.completed()).count();

    Stats {
        total_entries,
        total_words,
        average_words: rounded_ratio(total_words, total_entries, 1),
        most_used_tag: most_used_tag(entries),
        total_tasks,
        completed_tasks,
        pending_tasks: total_tasks - completed_tasks,
        completion_rate: rounded_ratio(completed_tasks, total_tasks, 100),
    }
}

/// The tag whose running count is first to reach the highest total.
///
/// Entries are scanned in collection order and tags in text order, so ties
/// go to whichever tag got there first.
fn most_used_tag(entries: &[JournalEntry]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut best: Option<(&str, usize)> = None;

    for tag in entries.iter().flat_map(|e| e.tags()) {
        let count = counts.entry(tag.as_str()).or_insert(0);
        *count += 1;
        if best.is_none_or(|(_, top)| *count > top) {
            best = Some((tag.as_str(), *count));
        }
    }

    best.map(|(tag, _)| tag.to_string())
}

fn rounded_ratio(part: usize, whole: usize, scale: usize) -> usize {
    if whole == 0 {
        return 0;
    }
    ((part * scale) as f64 / whole as f64).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskDraft;
    use chrono::{DateTime, Local, TimeZone};

    fn day(d: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 1, d, 12, 0, 0).unwrap()
    }

    fn entry(text: &str, d: u32) -> JournalEntry {
        JournalEntry::new(text.to_string(), day(d))
    }

    fn task(title: &str, tags: &[&str]) -> Task {
        let mut draft = TaskDraft::new(title);
        draft.tags = tags.iter().map(|t| t.to_string()).collect();
        Task::new(draft, day(1))
    }

    #[test]
    fn filters_are_conjunctive() {
        let entries = vec![entry("alpha #x", 1), entry("beta #y", 2)];
        let filter = EntryFilter {
            query: "alpha".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 1),
            tag: None,
        };
        let hits = filter_entries(&entries, &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text(), "alpha #x");

        let filter = EntryFilter { date: NaiveDate::from_ymd_opt(2025, 1, 3), ..Default::default() };
        assert!(filter_entries(&entries, &filter).is_empty());

        let filter = EntryFilter { query: "alpha".to_string(), tag: Some("y".to_string()), ..Default::default() };
        assert!(filter_entries(&entries, &filter).is_empty());
    }

    #[test]
    fn query_matches_tags_case_insensitively() {
        let entries = vec![entry("went for a run #Fitness", 1), entry("quiet day", 1)];
        let filter = EntryFilter { query: "FITN".to_string(), ..Default::default() };
        assert_eq!(filter_entries(&entries, &filter).len(), 1);
    }

    #[test]
    fn tag_filter_is_exact() {
        let entries = vec![entry("#work stuff", 1), entry("#workout", 1)];
        let filter = EntryFilter { tag: Some("work".to_string()), ..Default::default() };
        let hits = filter_entries(&entries, &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text(), "#work stuff");
    }

    #[test]
    fn task_query_covers_title_description_and_tags() {
        let mut with_desc = TaskDraft::new("Groceries");
        with_desc.description = "Remember the OAT milk".to_string();
        let tasks = vec![
            Task::new(with_desc, day(1)),
            task("Taxes", &["finance"]),
            task("Call plumber", &[]),
        ];

        let by_desc = TaskFilter { query: "oat".to_string(), ..Default::default() };
        assert_eq!(filter_tasks(&tasks, &by_desc)[0].title(), "Groceries");

        let by_tag = TaskFilter { query: "fin".to_string(), ..Default::default() };
        assert_eq!(filter_tasks(&tasks, &by_tag)[0].title(), "Taxes");

        let exact_tag = TaskFilter { tag: Some("finance".to_string()), ..Default::default() };
        assert_eq!(filter_tasks(&tasks, &exact_tag).len(), 1);
    }

    #[test]
    fn task_status_filter() {
        let mut done = task("Done thing", &[]);
        done.toggle();
        let tasks = vec![done, task("Open thing", &[])];

        let todo = TaskFilter { status: FilterTaskStatus::Todo, ..Default::default() };
        assert_eq!(filter_tasks(&tasks, &todo)[0].title(), "Open thing");
        let finished = TaskFilter { status: FilterTaskStatus::Done, ..Default::default() };
        assert_eq!(filter_tasks(&tasks, &finished)[0].title(), "Done thing");
        assert_eq!(filter_tasks(&tasks, &TaskFilter::default()).len(), 2);
    }

    #[test]
    fn all_tags_are_unique_and_ordered() {
        let entries = vec![entry("#b #a #b", 1), entry("#c", 1)];
        let tasks = vec![task("t", &["a", "d"])];
        assert_eq!(all_tags(&entries, &tasks), vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn stats_totals_and_tie_break() {
        let entries = vec![
            entry("one two #a", 1),
            entry("one two three #a #b", 1),
            entry("#b later", 1),
        ];
        let mut done = task("done", &[]);
        done.toggle();
        let tasks = vec![done, task("open", &[]), task("open too", &[])];

        let stats = compute_stats(&entries, &tasks);
        assert_eq!(stats.total_entries, 3);
        assert_eq!(stats.total_words, 10);
        assert_eq!(stats.average_words, 3);
        assert_eq!(stats.most_used_tag.as_deref(), Some("a"));
        assert_eq!(stats.total_tasks, 3);
        assert_eq!(stats.completed_tasks, 1);
        assert_eq!(stats.pending_tasks, 2);
        assert_eq!(stats.completion_rate, 33);
    }

    #[test]
    fn most_used_tag_goes_to_first_to_reach_max() {
        // b is seen first, but a reaches two first
        let entries = vec![entry("#b", 1), entry("#a", 1), entry("#a", 1), entry("#b", 1)];
        assert_eq!(compute_stats(&entries, &[]).most_used_tag.as_deref(), Some("a"));
    }

    #[test]
    fn stats_on_empty_collections() {
        let stats = compute_stats(&[], &[]);
        assert_eq!(stats, Stats::default());
        assert!(stats.most_used_tag.is_none());
    }
}
