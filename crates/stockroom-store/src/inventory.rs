use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use stockroom_types::{InventoryRecord, NewRecord, RecordId, RecordPatch};
use tracing::{info, warn};

use crate::error::{StoreError, StoreResult};
use crate::file::JsonFileStore;
use crate::memory::{InMemoryPhotoStore, InMemoryRecordStore};
use crate::photo::DiskPhotoStore;
use crate::traits::{PhotoReader, PhotoStore, RecordStore};

/// An uploaded photo awaiting storage.
#[derive(Clone, Debug)]
pub struct PhotoUpload {
    pub data: Bytes,
    /// Client filename or bare extension; only a safe extension is kept.
    pub extension: Option<String>,
}

impl PhotoUpload {
    pub fn new(data: impl Into<Bytes>, extension: Option<String>) -> Self {
        Self {
            data: data.into(),
            extension,
        }
    }
}

/// An open photo ready to be streamed to a client.
pub struct PhotoContent {
    pub reader: PhotoReader,
    pub content_type: &'static str,
}

impl std::fmt::Debug for PhotoContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoContent")
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Records and their photos, kept consistent with each other.
///
/// A record owns its photo: registering stores the photo before the record
/// that references it, and removing a record removes its photo. Record store
/// calls are synchronous and may fsync, so they run on tokio's blocking pool;
/// photo transfers stay async and never wait on the record store's lock.
#[derive(Clone)]
pub struct Inventory {
    records: Arc<dyn RecordStore>,
    photos: Arc<dyn PhotoStore>,
}

impl std::fmt::Debug for Inventory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inventory").finish_non_exhaustive()
    }
}

impl Inventory {
    pub fn new(records: Arc<dyn RecordStore>, photos: Arc<dyn PhotoStore>) -> Self {
        Self { records, photos }
    }

    /// Disk-backed inventory: the JSON document `store_file` and all photos
    /// live in `cache_dir`, which is created if absent.
    pub async fn open(cache_dir: &Path, store_file: &str) -> StoreResult<Self> {
        let photos = DiskPhotoStore::create(cache_dir).await?;
        let path = cache_dir.join(store_file);
        let records = tokio::task::spawn_blocking(move || JsonFileStore::open(path)).await??;
        Ok(Self::new(Arc::new(records), Arc::new(photos)))
    }

    /// Ephemeral inventory for tests and embedding.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryRecordStore::new()),
            Arc::new(InMemoryPhotoStore::new()),
        )
    }

    /// Run `op` against the record store on the blocking pool.
    async fn with_records<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn RecordStore) -> StoreResult<T> + Send + 'static,
    {
        let records = Arc::clone(&self.records);
        tokio::task::spawn_blocking(move || op(records.as_ref())).await?
    }

    /// All records in creation order.
    pub async fn list(&self) -> StoreResult<Vec<InventoryRecord>> {
        self.with_records(|records| records.list_all()).await
    }

    pub async fn get(&self, id: &RecordId) -> StoreResult<InventoryRecord> {
        let key = id.clone();
        self.with_records(move |records| records.get(&key))
            .await?
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Create a record, storing its photo first when one is supplied.
    ///
    /// The name is validated before any photo is written. If the record
    /// cannot be inserted, the just-saved photo is removed again.
    pub async fn register(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        photo: Option<PhotoUpload>,
    ) -> StoreResult<InventoryRecord> {
        let mut new = NewRecord::new(name, description);
        new.validate()?;

        if let Some(upload) = photo {
            let saved = self
                .photos
                .save(upload.data, upload.extension.as_deref())
                .await?;
            new = new.with_photo(saved);
        }

        let orphan = new.photo.clone();
        match self.with_records(move |records| records.insert(new)).await {
            Ok(record) => {
                info!(id = %record.id, photo = record.photo.is_some(), "registered inventory item");
                Ok(record)
            }
            Err(e) => {
                if let Some(photo) = orphan {
                    self.discard_photo(&photo.to_string(), self.photos.delete(&photo).await);
                }
                Err(e)
            }
        }
    }

    /// Apply a partial update. Empty fields leave the stored value unchanged.
    pub async fn update(&self, id: &RecordId, patch: &RecordPatch) -> StoreResult<InventoryRecord> {
        let (key, patch) = (id.clone(), patch.clone());
        let record = self
            .with_records(move |records| records.update(&key, &patch))
            .await?
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        info!(id = %id, "updated inventory item");
        Ok(record)
    }

    /// Delete a record and, best-effort, the photo it owns.
    ///
    /// Photo deletion failures are logged and never fail the removal.
    pub async fn remove(&self, id: &RecordId) -> StoreResult<InventoryRecord> {
        let key = id.clone();
        let removed = self
            .with_records(move |records| records.delete(&key))
            .await?
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        if let Some(photo) = &removed.photo {
            self.discard_photo(photo.as_str(), self.photos.delete(photo).await);
        }
        info!(id = %id, "deleted inventory item");
        Ok(removed)
    }

    /// Open the photo of record `id` for streaming.
    pub async fn photo(&self, id: &RecordId) -> StoreResult<PhotoContent> {
        let record = self.get(id).await?;
        let photo = record
            .photo
            .ok_or_else(|| StoreError::PhotoNotFound(id.to_string()))?;
        let reader = self.photos.open(&photo).await?;
        Ok(PhotoContent {
            reader,
            content_type: photo.content_type(),
        })
    }

    fn discard_photo(&self, photo: &str, outcome: StoreResult<bool>) {
        match outcome {
            Ok(true) => {}
            Ok(false) => warn!(photo, "photo already missing during cleanup"),
            Err(e) => warn!(photo, error = %e, "failed to delete photo"),
        }
    }
}
