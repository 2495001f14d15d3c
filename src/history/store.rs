//! History stores.
//!
//! The store is an ordered, append-only collection of run records. Reading an
//! empty or missing store yields no records rather than an error.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::RunRecord;
use crate::error::HistoryError;

/// Default file name of the JSON history.
pub const DEFAULT_HISTORY_FILE: &str = "saved_timetables.json";

/// Read / append access to past runs.
pub trait HistoryStore {
    /// All records, oldest first.
    fn load(&self) -> Result<Vec<RunRecord>, HistoryError>;

    /// Appends a record.
    fn append(&self, record: RunRecord) -> Result<(), HistoryError>;
}

/// History kept as one pretty-printed JSON array in a file.
///
/// Appending rewrites the whole file through a temporary sibling that is
/// renamed over the original, so a failed write leaves the old history intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the backing file.
    fn dir(&self) -> &Path {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }

    /// Replaces the backing file with `content` in one rename.
    fn replace_contents(&self, content: &[u8]) -> Result<(), HistoryError> {
        let mut tmp = NamedTempFile::new_in(self.dir()).map_err(|e| self.io_error(e))?;
        tmp.write_all(content).map_err(|e| self.io_error(e))?;
        tmp.as_file().sync_all().map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> HistoryError {
        HistoryError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_FILE)
    }
}

impl HistoryStore for JsonFileStore {
    fn load(&self) -> Result<Vec<RunRecord>, HistoryError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no history file yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|source| {
            warn!(path = %self.path.display(), error = %source, "corrupt history file");
            HistoryError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })
    }

    fn append(&self, record: RunRecord) -> Result<(), HistoryError> {
        let mut records = self.load()?;
        records.push(record);
        let json = serde_json::to_string_pretty(&records)?;
        self.replace_contents(json.as_bytes())?;
        debug!(path = %self.path.display(), records = records.len(), "appended run record");
        Ok(())
    }
}

/// History kept in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<RunRecord>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with records.
    pub fn with_records(records: Vec<RunRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

impl HistoryStore for MemoryStore {
    fn load(&self) -> Result<Vec<RunRecord>, HistoryError> {
        self.records
            .lock()
            .map(|r| r.clone())
            .map_err(|_| HistoryError::Poisoned)
    }

    fn append(&self, record: RunRecord) -> Result<(), HistoryError> {
        self.records
            .lock()
            .map_err(|_| HistoryError::Poisoned)?
            .push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProblemInstance, Scenario, Subject, Timetable};

    fn record(name: &str) -> RunRecord {
        let inst = ProblemInstance::new(2, 1)
            .with_subject(Subject::new("A", 3))
            .with_subject(Subject::new("B", 5))
            .with_scenario(Scenario::HardFirst);
        RunRecord::new(name, &inst, Timetable::from_days([vec!["B"], vec!["A"]]))
    }

    #[test]
    fn test_missing_file_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("none.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_blank_file_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.json");
        fs::write(&path, "  \n").unwrap();
        assert!(JsonFileStore::new(&path).load().unwrap().is_empty());
    }

    #[test]
    fn test_append_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join(DEFAULT_HISTORY_FILE));
        store.append(record("first")).unwrap();
        store.append(record("second")).unwrap();

        let loaded = store.load().unwrap();
        let names: Vec<&str> = loaded.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
        assert_eq!(loaded[1].timetable, record("x").timetable);
    }

    #[test]
    fn test_corrupt_file_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(HistoryError::Corrupt { .. })));
        // Appending must not clobber unreadable history
        assert!(store.append(record("x")).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_unwritable_location_reported() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be
        let store = JsonFileStore::new(dir.path());
        assert!(matches!(store.load(), Err(HistoryError::Io { .. })));
    }

    #[test]
    fn test_append_replaces_file_instead_of_truncating() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_HISTORY_FILE);
        let store = JsonFileStore::new(&path);
        store.append(record("first")).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        // A handle opened before the append keeps seeing the old file
        let mut old = fs::File::open(&path).unwrap();
        store.append(record("second")).unwrap();
        let mut seen = String::new();
        std::io::Read::read_to_string(&mut old, &mut seen).unwrap();
        assert_eq!(seen, before);

        assert_eq!(store.load().unwrap().len(), 2);
        // No temporary files left behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_append_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone").join(DEFAULT_HISTORY_FILE);
        let store = JsonFileStore::new(&path);
        assert!(matches!(
            store.append(record("x")),
            Err(HistoryError::Io { .. })
        ));
        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_legacy_history_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_HISTORY_FILE);
        fs::write(
            &path,
            r#"[{"이름": "old", "시간표": [["B"], ["A"]], "과목난이도": {"A": 3, "B": 5},
                "시나리오": "초반에 어려운 과목 몰아서 끝내기",
                "생성시간": "2025-01-02 03:04:05"}]"#,
        )
        .unwrap();
        let store = JsonFileStore::new(&path);
        store.append(record("new")).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].name, "old");
        assert_eq!(loaded[0].scenario, Scenario::HardFirst);
        assert_eq!(loaded[0].timetable, loaded[1].timetable);
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_empty());
        store.append(record("a")).unwrap();
        store.append(record("b")).unwrap();
        assert_eq!(store.load().unwrap().len(), 2);

        let prefilled = MemoryStore::with_records(vec![record("c")]);
        assert_eq!(prefilled.load().unwrap()[0].name, "c");
    }
}
