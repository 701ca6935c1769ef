//! Single-document JSON record store.
//!
//! The whole collection lives in one JSON array on disk. Every operation
//! loads the full document, works on it in memory and, if it mutated
//! anything, writes the full document back. Writes go to a temporary file in
//! the same directory which is fsynced and then renamed over the target, so
//! the document at rest is always a complete serialization.
//!
//! A `Mutex` makes each load-mutate-persist cycle exclusive. Photo transfers
//! happen outside this store and never hold the lock.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use stockroom_types::{InventoryRecord, NewRecord, RecordId, RecordPatch};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::collection;
use crate::error::{StoreError, StoreResult};
use crate::traits::RecordStore;

/// Record store persisted as a single JSON document.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open a store backed by the document at `path`.
    ///
    /// The parent directory is created if needed. A missing document is an
    /// empty store; nothing is written until the first mutation.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    /// Path of the JSON document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> StoreResult<MutexGuard<'_, ()>> {
        self.lock.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Read the full document. A missing file is an empty store.
    fn load(&self) -> StoreResult<Vec<InventoryRecord>> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let records: Vec<InventoryRecord> =
            serde_json::from_slice(&data).map_err(|e| StoreError::Corrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        debug!(path = %self.path.display(), count = records.len(), "loaded inventory document");
        Ok(records)
    }

    /// Replace the document with `records` via temp-file-then-rename.
    fn persist(&self, records: &[InventoryRecord]) -> StoreResult<()> {
        let payload = serde_json::to_vec_pretty(records)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&payload)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;

        debug!(path = %self.path.display(), count = records.len(), "persisted inventory document");
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn list_all(&self) -> StoreResult<Vec<InventoryRecord>> {
        let _guard = self.guard()?;
        self.load()
    }

    fn get(&self, id: &RecordId) -> StoreResult<Option<InventoryRecord>> {
        let _guard = self.guard()?;
        Ok(collection::find(&self.load()?, id))
    }

    fn insert(&self, record: NewRecord) -> StoreResult<InventoryRecord> {
        let _guard = self.guard()?;
        let mut records = self.load()?;
        let created = collection::append(&mut records, record)?;
        self.persist(&records)?;
        Ok(created)
    }

    fn update(&self, id: &RecordId, patch: &RecordPatch) -> StoreResult<Option<InventoryRecord>> {
        let _guard = self.guard()?;
        let mut records = self.load()?;
        let Some((updated, changed)) = collection::patch(&mut records, id, patch) else {
            return Ok(None);
        };
        if changed {
            self.persist(&records)?;
        }
        Ok(Some(updated))
    }

    fn delete(&self, id: &RecordId) -> StoreResult<Option<InventoryRecord>> {
        let _guard = self.guard()?;
        let mut records = self.load()?;
        let Some(removed) = collection::remove(&mut records, id) else {
            return Ok(None);
        };
        self.persist(&records)?;
        Ok(Some(removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn temp_store() -> (tempfile::TempDir, JsonFileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("inventory.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn missing_document_is_empty() {
        let (_dir, store) = temp_store();
        assert!(store.list_all().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn open_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/cache/inventory.json");
        let store = JsonFileStore::open(&path).unwrap();
        store.insert(NewRecord::new("a", "")).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn insert_persists_across_reopen() {
        let (dir, store) = temp_store();
        let created = store.insert(NewRecord::new("N", "D")).unwrap();
        drop(store);

        let reopened = JsonFileStore::open(dir.path().join("inventory.json")).unwrap();
        let fetched = reopened.get(&created.id).unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(fetched.photo.is_none());
    }

    #[test]
    fn document_is_a_json_array_of_records() {
        let (_dir, store) = temp_store();
        let created = store.insert(NewRecord::new("Lamp", "")).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["id"], created.id.as_str());
        assert_eq!(value[0]["name"], "Lamp");
        assert_eq!(value[0]["description"], "");
        assert!(value[0]["photo"].is_null());
    }

    #[test]
    fn no_temp_files_left_behind() {
        let (dir, store) = temp_store();
        store.insert(NewRecord::new("a", "")).unwrap();
        store.insert(NewRecord::new("b", "")).unwrap();
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn corrupt_document_is_reported() {
        let (_dir, store) = temp_store();
        fs::write(store.path(), b"[{\"id\": ").unwrap();

        let err = store.list_all().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
        assert!(matches!(store.insert(NewRecord::new("a", "")), Err(StoreError::Corrupt { .. })));
        // The broken document is left untouched for inspection.
        assert_eq!(fs::read(store.path()).unwrap(), b"[{\"id\": ");
    }

    #[test]
    fn validation_error_leaves_document_unchanged() {
        let (_dir, store) = temp_store();
        store.insert(NewRecord::new("a", "")).unwrap();
        let before = fs::read(store.path()).unwrap();

        assert!(matches!(store.insert(NewRecord::new("", "x")), Err(StoreError::Validation(_))));
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn unknown_id_leaves_document_unchanged() {
        let (_dir, store) = temp_store();
        store.insert(NewRecord::new("a", "")).unwrap();
        let before = fs::read(store.path()).unwrap();
        let id = RecordId::from("does-not-exist");

        assert!(store.get(&id).unwrap().is_none());
        let patch = RecordPatch { name: Some("x".into()), description: None };
        assert!(store.update(&id, &patch).unwrap().is_none());
        assert!(store.delete(&id).unwrap().is_none());
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn update_with_empty_fields_is_a_no_op() {
        let (_dir, store) = temp_store();
        let created = store.insert(NewRecord::new("Chair", "Oak")).unwrap();
        let patch = RecordPatch { name: Some(String::new()), description: Some(String::new()) };

        let updated = store.update(&created.id, &patch).unwrap().unwrap();
        assert_eq!(updated, created);
    }

    #[test]
    fn blank_name_patch_keeps_stored_name() {
        let (_dir, store) = temp_store();
        let created = store.insert(NewRecord::new("Chair", "Oak")).unwrap();
        let before = fs::read(store.path()).unwrap();
        let patch = RecordPatch { name: Some("   ".into()), description: None };

        let updated = store.update(&created.id, &patch).unwrap().unwrap();
        assert_eq!(updated.name, "Chair");
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn listing_order_survives_updates_and_deletes() {
        let (_dir, store) = temp_store();
        let a = store.insert(NewRecord::new("a", "")).unwrap();
        let b = store.insert(NewRecord::new("b", "")).unwrap();
        let c = store.insert(NewRecord::new("c", "")).unwrap();

        let patch = RecordPatch { name: Some("a2".into()), description: None };
        store.update(&a.id, &patch).unwrap();
        store.delete(&b.id).unwrap();

        let names: Vec<_> = store.list_all().unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["a2", "c"]);
        assert_eq!(store.list_all().unwrap()[1].id, c.id);
    }

    #[test]
    fn concurrent_inserts_are_not_lost() {
        let (_dir, store) = temp_store();
        let store = Arc::new(store);

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..5 {
                        store.insert(NewRecord::new(format!("t{t}-{i}"), "")).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let records = store.list_all().unwrap();
        assert_eq!(records.len(), 40);
        let mut ids: Vec<_> = records.iter().map(|r| r.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 40);
    }
}
