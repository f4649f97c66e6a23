//! Recently used durations and their persistence

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::DurationValue;
use crate::error::PersistenceError;

/// A previously started duration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentEntry {
    pub id: Uuid,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub created_at: DateTime<Utc>,
}

impl RecentEntry {
    pub fn new(duration: DurationValue, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            hour: duration.hour,
            minute: duration.minute,
            second: duration.second,
            created_at,
        }
    }

    pub fn duration(&self) -> DurationValue {
        DurationValue::new(self.hour, self.minute, self.second)
    }

    pub fn total_seconds(&self) -> u64 {
        self.duration().total_seconds()
    }

    /// Compact chip text: hours if any, seconds if that is all there is,
    /// minutes otherwise
    pub fn label(&self) -> String {
        if self.hour > 0 {
            format!("{}h", self.hour)
        } else if self.minute == 0 && self.second != 0 {
            format!("{}s", self.second)
        } else {
            format!("{}m", self.minute)
        }
    }
}

/// Repository of recent entries.
///
/// Entries are unique by total seconds and listed newest first.
pub trait RecentStore: Send {
    /// Record `duration` unless an entry with the same total seconds exists.
    /// Returns the new entry, or `None` for a duplicate.
    fn insert(&mut self, duration: DurationValue) -> Result<Option<RecentEntry>, PersistenceError>;

    fn list(&self) -> Vec<RecentEntry>;

    /// Remove the entry with this identity. Unknown ids are ignored.
    fn delete(&mut self, id: Uuid) -> Result<(), PersistenceError>;

    fn get(&self, id: Uuid) -> Option<RecentEntry> {
        self.list().into_iter().find(|entry| entry.id == id)
    }
}

impl<S: RecentStore + ?Sized> RecentStore for Box<S> {
    fn insert(&mut self, duration: DurationValue) -> Result<Option<RecentEntry>, PersistenceError> {
        (**self).insert(duration)
    }

    fn list(&self) -> Vec<RecentEntry> {
        (**self).list()
    }

    fn delete(&mut self, id: Uuid) -> Result<(), PersistenceError> {
        (**self).delete(id)
    }

    fn get(&self, id: Uuid) -> Option<RecentEntry> {
        (**self).get(id)
    }
}

/// Newest-first entry list shared by both store flavours
#[derive(Debug, Default)]
struct Entries(Vec<RecentEntry>);

impl Entries {
    fn from_unsorted(mut entries: Vec<RecentEntry>) -> Self {
        // Stable: ties keep their stored (newest first) order
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self(entries)
    }

    fn insert(&mut self, duration: DurationValue) -> Option<RecentEntry> {
        let total = duration.total_seconds();
        if self.0.iter().any(|entry| entry.total_seconds() == total) {
            debug!("Recent with {}s already stored, skipping insert", total);
            return None;
        }

        let entry = RecentEntry::new(duration, Utc::now());
        self.0.insert(0, entry.clone());
        Some(entry)
    }

    fn remove(&mut self, id: Uuid) -> bool {
        let before = self.0.len();
        self.0.retain(|entry| entry.id != id);
        self.0.len() != before
    }
}

/// Recents kept for the lifetime of the process only
#[derive(Debug, Default)]
pub struct MemoryRecentStore {
    entries: Entries,
}

impl MemoryRecentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecentStore for MemoryRecentStore {
    fn insert(&mut self, duration: DurationValue) -> Result<Option<RecentEntry>, PersistenceError> {
        Ok(self.entries.insert(duration))
    }

    fn list(&self) -> Vec<RecentEntry> {
        self.entries.0.clone()
    }

    fn delete(&mut self, id: Uuid) -> Result<(), PersistenceError> {
        self.entries.remove(id);
        Ok(())
    }
}

/// Recents persisted as a JSON array, rewritten in full on every change
#[derive(Debug)]
pub struct JsonRecentStore {
    path: PathBuf,
    entries: Entries,
}

impl JsonRecentStore {
    /// Load the store at `path`; a missing file is an empty store
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str::<Vec<RecentEntry>>(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        info!("Loaded {} recent entries from {}", entries.len(), path.display());
        Ok(Self {
            path,
            entries: Entries::from_unsorted(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `entries` to disk; the caller commits them in memory only on Ok
    fn save(&self, entries: &[RecentEntry]) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;
        debug!("Wrote {} recent entries to {}", entries.len(), self.path.display());
        Ok(())
    }
}

impl RecentStore for JsonRecentStore {
    fn insert(&mut self, duration: DurationValue) -> Result<Option<RecentEntry>, PersistenceError> {
        let mut next = Entries(self.entries.0.clone());
        let inserted = next.insert(duration);
        if inserted.is_some() {
            self.save(&next.0)?;
            self.entries = next;
        }
        Ok(inserted)
    }

    fn list(&self) -> Vec<RecentEntry> {
        self.entries.0.clone()
    }

    fn delete(&mut self, id: Uuid) -> Result<(), PersistenceError> {
        let mut next = Entries(self.entries.0.clone());
        if next.remove(id) {
            self.save(&next.0)?;
            self.entries = next;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("focus-flow-recents-{}.json", Uuid::new_v4()))
    }

    #[test]
    fn test_insert_deduplicates_by_total_seconds() {
        let mut store = MemoryRecentStore::new();

        let first = store.insert(DurationValue::new(1, 0, 0)).unwrap();
        assert!(first.is_some());
        let second = store.insert(DurationValue::new(0, 60, 0)).unwrap();
        assert!(second.is_none());

        let listed = store.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].duration(), DurationValue::new(1, 0, 0));
    }

    #[test]
    fn test_list_is_newest_first() {
        let mut store = MemoryRecentStore::new();
        store.insert(DurationValue::new(0, 0, 5)).unwrap();
        store.insert(DurationValue::new(0, 5, 0)).unwrap();
        store.insert(DurationValue::new(1, 0, 0)).unwrap();

        let totals: Vec<u64> = store.list().iter().map(RecentEntry::total_seconds).collect();
        assert_eq!(totals, vec![3600, 300, 5]);
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut store = MemoryRecentStore::new();
        store.insert(DurationValue::new(0, 0, 30)).unwrap();
        let before = store.list();

        store.delete(Uuid::new_v4()).unwrap();
        assert_eq!(store.list(), before);
    }

    #[test]
    fn test_delete_by_identity() {
        let mut store = MemoryRecentStore::new();
        let kept = store.insert(DurationValue::new(0, 0, 30)).unwrap().unwrap();
        let gone = store.insert(DurationValue::new(0, 1, 0)).unwrap().unwrap();

        store.delete(gone.id).unwrap();
        assert_eq!(store.list(), vec![kept.clone()]);
        assert_eq!(store.get(kept.id), Some(kept));
        assert_eq!(store.get(gone.id), None);
    }

    #[test]
    fn test_labels() {
        let at = Utc::now();
        assert_eq!(RecentEntry::new(DurationValue::new(2, 30, 0), at).label(), "2h");
        assert_eq!(RecentEntry::new(DurationValue::new(0, 0, 45), at).label(), "45s");
        assert_eq!(RecentEntry::new(DurationValue::new(0, 5, 0), at).label(), "5m");
        assert_eq!(RecentEntry::new(DurationValue::new(0, 5, 10), at).label(), "5m");
    }

    #[test]
    fn test_json_store_survives_reopen() {
        let path = temp_path();

        let mut store = JsonRecentStore::open(&path).unwrap();
        assert!(store.list().is_empty());
        let a = store.insert(DurationValue::new(0, 0, 5)).unwrap().unwrap();
        let b = store.insert(DurationValue::new(0, 25, 0)).unwrap().unwrap();
        store.insert(DurationValue::new(0, 0, 5)).unwrap();

        let reopened = JsonRecentStore::open(&path).unwrap();
        assert_eq!(reopened.list(), vec![b.clone(), a.clone()]);

        let mut reopened = reopened;
        reopened.delete(a.id).unwrap();
        let again = JsonRecentStore::open(&path).unwrap();
        assert_eq!(again.list(), vec![b]);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_json_store_sorts_loaded_entries() {
        let path = temp_path();
        let now = Utc::now();
        let old = RecentEntry::new(DurationValue::new(0, 0, 10), now - Duration::minutes(5));
        let new = RecentEntry::new(DurationValue::new(0, 0, 20), now);
        fs::write(&path, serde_json::to_string(&vec![old.clone(), new.clone()]).unwrap()).unwrap();

        let store = JsonRecentStore::open(&path).unwrap();
        assert_eq!(store.list(), vec![new, old]);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_failed_write_leaves_store_unchanged() {
        let path = std::env::temp_dir()
            .join(format!("focus-flow-missing-{}", Uuid::new_v4()))
            .join("recents.json");
        let mut store = JsonRecentStore::open(&path).unwrap();

        assert!(matches!(
            store.insert(DurationValue::new(0, 0, 5)),
            Err(PersistenceError::Io(_))
        ));
        assert!(store.list().is_empty());

        // A retry fails the same way instead of passing as a duplicate
        assert!(store.insert(DurationValue::new(0, 0, 5)).is_err());
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_failed_delete_keeps_entry() {
        let dir = std::env::temp_dir().join(format!("focus-flow-dir-{}", Uuid::new_v4()));
        fs::create_dir(&dir).unwrap();
        let path = dir.join("recents.json");

        let mut store = JsonRecentStore::open(&path).unwrap();
        let entry = store.insert(DurationValue::new(0, 1, 0)).unwrap().unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert!(store.delete(entry.id).is_err());
        assert_eq!(store.list(), vec![entry]);
    }

    #[test]
    fn test_json_store_rejects_garbage() {
        let path = temp_path();
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            JsonRecentStore::open(&path),
            Err(PersistenceError::Json(_))
        ));

        fs::remove_file(&path).unwrap();
    }
}
