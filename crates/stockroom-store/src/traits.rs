use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncRead;
use stockroom_types::{InventoryRecord, NewRecord, PhotoRef, RecordId, RecordPatch};

use crate::error::StoreResult;

/// Ordered collection of inventory records.
///
/// All implementations must satisfy these invariants:
/// - Record ids are unique.
/// - `list_all` returns records in insertion order; updates and deletes of
///   other records never reorder the survivors.
/// - Mutations are serialized: no two mutating calls interleave.
/// - A persisted backend never leaves a partially written document behind.
pub trait RecordStore: Send + Sync {
    /// All records in insertion order.
    fn list_all(&self) -> StoreResult<Vec<InventoryRecord>>;

    /// Look up a record. Returns `Ok(None)` if the id is unknown.
    fn get(&self, id: &RecordId) -> StoreResult<Option<InventoryRecord>>;

    /// Validate `record`, assign a fresh id, append it, and persist.
    fn insert(&self, record: NewRecord) -> StoreResult<InventoryRecord>;

    /// Apply `patch` to an existing record and persist.
    ///
    /// Returns `Ok(None)` if the id is unknown.
    fn update(&self, id: &RecordId, patch: &RecordPatch) -> StoreResult<Option<InventoryRecord>>;

    /// Remove a record and persist. Returns the removed record so the caller
    /// can release what it owned, or `Ok(None)` if the id is unknown.
    ///
    /// Photo cleanup is not the record store's job; see [`crate::Inventory`].
    fn delete(&self, id: &RecordId) -> StoreResult<Option<InventoryRecord>>;

    /// Number of records.
    fn len(&self) -> StoreResult<usize> {
        Ok(self.list_all()?.len())
    }

    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

/// Photo content as an async byte stream.
pub type PhotoReader = Box<dyn AsyncRead + Send + Unpin>;

/// Blob storage for uploaded photos.
///
/// Transfers are async and never hold a record-store lock.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Persist `data` under a new unique filename, keeping `extension` when
    /// it is usable. Returns the filename.
    async fn save(&self, data: Bytes, extension: Option<&str>) -> StoreResult<PhotoRef>;

    /// Open a photo for reading. Fails with `PhotoNotFound` if it is missing.
    async fn open(&self, photo: &PhotoRef) -> StoreResult<PhotoReader>;

    /// Best-effort removal. A missing photo is not an error and yields
    /// `Ok(false)`.
    async fn delete(&self, photo: &PhotoRef) -> StoreResult<bool>;
}
