//! Run history and popularity analysis.
//!
//! Solving and persisting are separate steps: a caller solves, then appends
//! a `RunRecord` to a `HistoryStore`. A store failure is a `HistoryError`
//! and never a solve failure.
//!
//! The popularity query works on an explicit snapshot of past timetables,
//! grouping them by `CanonicalForm`.

mod popularity;
mod record;
mod store;

pub use popularity::{popular_from_store, popular_timetables, PopularTimetable, TOP_K};
pub use record::RunRecord;
pub use store::{HistoryStore, JsonFileStore, MemoryStore, DEFAULT_HISTORY_FILE};
