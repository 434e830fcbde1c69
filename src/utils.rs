use chrono::{NaiveDate, NaiveTime, Timelike};
use directories::{BaseDirs, ProjectDirs};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

/// Inline tag marker: `#` followed by ASCII word characters
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#([A-Za-z0-9_]+)").expect("valid tag regex"));

/// Profile mode for the application (dev or prod)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

impl Profile {
    fn app_name(self) -> &'static str {
        match self {
            Profile::Dev => "daybook-dev",
            Profile::Prod => "daybook",
        }
    }
}

/// Get the configuration directory path for daybook
/// If profile is Dev, uses "daybook-dev" instead of "daybook"
pub fn get_config_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "daybook", profile.app_name())
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the data directory path for daybook
pub fn get_data_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "daybook", profile.app_name())
        .map(|dirs| dirs.data_dir().to_path_buf())
}

/// Expand `~` in a path string to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home;
        }
    }
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Extract inline `#tag` markers from text.
///
/// Tags come back in order of appearance with the `#` stripped. Case is
/// preserved and repeated tags are kept; callers that want a set de-duplicate
/// at aggregation time.
pub fn extract_tags(text: &str) -> Vec<String> {
    TAG_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Count whitespace-separated words. Blank text has zero words.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Parse tags from a comma-separated string
/// Returns trimmed, non-empty tags with any leading `#` removed
pub fn parse_tags(tags: Option<&str>) -> Vec<String> {
    match tags {
        Some(tags_str) if !tags_str.trim().is_empty() => tags_str
            .split(',')
            .map(|s| s.trim().trim_start_matches('#').to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

/// Format tags for display: #tag1 #tag2 #tag3
pub fn format_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| format!("#{}", tag))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a date string in ISO 8601 format (YYYY-MM-DD)
pub fn parse_date(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
}

/// Drop sub-second precision so wall times read as HH:MM:SS
pub fn whole_seconds(time: NaiveTime) -> NaiveTime {
    time.with_nanosecond(0).unwrap_or(time)
}

/// Suggested file name for an export taken on `date`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("journal-tasks-{}.json", date.format("%Y-%m-%d"))
}
