pub mod cli;
pub mod config;
pub mod logging;
pub mod models;
pub mod query;
pub mod random;
pub mod snapshot;
pub mod store;
pub mod utils;

pub use config::Config;
pub use models::{JournalEntry, Priority, Task, TaskDraft};
pub use query::{EntryFilter, FilterTaskStatus, Stats, TaskFilter};
pub use snapshot::{ImportSummary, Snapshot, SnapshotError};
pub use store::{Store, StoreError};
pub use utils::Profile;
