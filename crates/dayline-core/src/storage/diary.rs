//! Per-day diary files.
//!
//! One JSON document per calendar day, named `YYYYMMDD.json`. Stores only
//! move raw text; decoding belongs to the timeline codec.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::StorageError;

/// Persistence collaborator for day documents.
pub trait DiaryStore {
    /// Raw document for `day`, or `None` when nothing was saved yet.
    fn load(&self, day: NaiveDate) -> Result<Option<String>, StorageError>;

    /// Stores the document for `day`, replacing any previous one.
    fn save(&mut self, day: NaiveDate, content: &str) -> Result<(), StorageError>;

    /// Human-readable location of the day's document, for messages.
    fn describe(&self, day: NaiveDate) -> String;
}

pub fn day_file_name(day: NaiveDate) -> String {
    format!("{}.json", day.format("%Y%m%d"))
}

/// Day files in one directory on disk.
#[derive(Debug, Clone)]
pub struct FsDiaryStore {
    dir: PathBuf,
}

impl FsDiaryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, day: NaiveDate) -> PathBuf {
        self.dir.join(day_file_name(day))
    }
}

impl DiaryStore for FsDiaryStore {
    fn load(&self, day: NaiveDate) -> Result<Option<String>, StorageError> {
        let path = self.path_for(day);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::ReadFailed { path, source }),
        }
    }

    fn save(&mut self, day: NaiveDate, content: &str) -> Result<(), StorageError> {
        let path = self.path_for(day);
        std::fs::create_dir_all(&self.dir).map_err(|source| StorageError::WriteFailed {
            path: self.dir.clone(),
            source,
        })?;
        std::fs::write(&path, content).map_err(|source| StorageError::WriteFailed {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "day file saved");
        Ok(())
    }

    fn describe(&self, day: NaiveDate) -> String {
        self.path_for(day).display().to_string()
    }
}

/// In-memory store for tests and embedding hosts.
#[derive(Debug, Clone, Default)]
pub struct MemoryDiaryStore {
    days: HashMap<NaiveDate, String>,
}

impl MemoryDiaryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, day: NaiveDate, content: impl Into<String>) {
        self.days.insert(day, content.into());
    }
}

impl DiaryStore for MemoryDiaryStore {
    fn load(&self, day: NaiveDate) -> Result<Option<String>, StorageError> {
        Ok(self.days.get(&day).cloned())
    }

    fn save(&mut self, day: NaiveDate, content: &str) -> Result<(), StorageError> {
        self.days.insert(day, content.to_string());
        Ok(())
    }

    fn describe(&self, day: NaiveDate) -> String {
        format!("memory:{}", day_file_name(day))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()
    }

    #[test]
    fn file_name_is_compact_date() {
        assert_eq!(day_file_name(day()), "20250307.json");
    }

    #[test]
    fn fs_store_round_trip_creates_directory() {
        let tmp = TempDir::new().unwrap();
        let mut store = FsDiaryStore::new(tmp.path().join("Diaries"));
        assert_eq!(store.load(day()).unwrap(), None);
        store.save(day(), "{\"events\":[]}").unwrap();
        assert!(tmp.path().join("Diaries/20250307.json").exists());
        assert_eq!(store.load(day()).unwrap().as_deref(), Some("{\"events\":[]}"));
    }

    #[test]
    fn fs_store_reports_unwritable_location() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let mut store = FsDiaryStore::new(blocker.join("sub"));
        assert!(matches!(
            store.save(day(), "{}"),
            Err(StorageError::WriteFailed { .. })
        ));
    }

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryDiaryStore::new();
        assert_eq!(store.load(day()).unwrap(), None);
        store.save(day(), "[]").unwrap();
        assert_eq!(store.load(day()).unwrap().as_deref(), Some("[]"));
        assert_eq!(store.describe(day()), "memory:20250307.json");
    }
}
