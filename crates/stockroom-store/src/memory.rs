use std::collections::HashMap;
use std::io::Cursor;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;
use stockroom_types::{InventoryRecord, NewRecord, PhotoRef, RecordId, RecordPatch};

use crate::collection;
use crate::error::{StoreError, StoreResult};
use crate::traits::{PhotoReader, PhotoStore, RecordStore};

/// In-memory, `Vec`-based record store.
///
/// Intended for tests and embedding. Records are held behind a `RwLock`;
/// the write half serializes mutations. Data is lost when the store is
/// dropped.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<Vec<InventoryRecord>>,
}

impl InMemoryRecordStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `records`, kept in the given order.
    pub fn with_records(records: Vec<InventoryRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

impl RecordStore for InMemoryRecordStore {
    fn list_all(&self) -> StoreResult<Vec<InventoryRecord>> {
        let records = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(records.clone())
    }

    fn get(&self, id: &RecordId) -> StoreResult<Option<InventoryRecord>> {
        let records = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(collection::find(&records, id))
    }

    fn insert(&self, record: NewRecord) -> StoreResult<InventoryRecord> {
        let mut records = self.records.write().map_err(|_| StoreError::LockPoisoned)?;
        collection::append(&mut records, record)
    }

    fn update(&self, id: &RecordId, patch: &RecordPatch) -> StoreResult<Option<InventoryRecord>> {
        let mut records = self.records.write().map_err(|_| StoreError::LockPoisoned)?;
        Ok(collection::patch(&mut records, id, patch).map(|(record, _)| record))
    }

    fn delete(&self, id: &RecordId) -> StoreResult<Option<InventoryRecord>> {
        let mut records = self.records.write().map_err(|_| StoreError::LockPoisoned)?;
        Ok(collection::remove(&mut records, id))
    }

    fn len(&self) -> StoreResult<usize> {
        let records = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(records.len())
    }
}

/// In-memory photo store keyed by filename.
#[derive(Debug, Default)]
pub struct InMemoryPhotoStore {
    photos: RwLock<HashMap<PhotoRef, Bytes>>,
}

impl InMemoryPhotoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of photos currently stored.
    pub fn len(&self) -> usize {
        self.photos.read().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PhotoStore for InMemoryPhotoStore {
    async fn save(&self, data: Bytes, extension: Option<&str>) -> StoreResult<PhotoRef> {
        let photo = PhotoRef::generate(extension);
        let mut photos = self.photos.write().map_err(|_| StoreError::LockPoisoned)?;
        photos.insert(photo.clone(), data);
        Ok(photo)
    }

    async fn open(&self, photo: &PhotoRef) -> StoreResult<PhotoReader> {
        let photos = self.photos.read().map_err(|_| StoreError::LockPoisoned)?;
        let data = photos
            .get(photo)
            .cloned()
            .ok_or_else(|| StoreError::photo_not_found(photo))?;
        Ok(Box::new(Cursor::new(data)))
    }

    async fn delete(&self, photo: &PhotoRef) -> StoreResult<bool> {
        let mut photos = self.photos.write().map_err(|_| StoreError::LockPoisoned)?;
        Ok(photos.remove(photo).is_some())
    }
}
