//! Record and photo storage for stockroom.
//!
//! Inventory records are kept in a single JSON document; uploaded photos are
//! kept as individual files next to it in the cache directory.
//!
//! # Storage Backends
//!
//! Records implement the [`RecordStore`] trait:
//!
//! - [`JsonFileStore`] -- one JSON array on disk, rewritten atomically per mutation
//! - [`InMemoryRecordStore`] -- `Vec`-based store for tests and embedding
//!
//! Photos implement the [`PhotoStore`] trait:
//!
//! - [`DiskPhotoStore`] -- one file per photo, named by a UUID v7
//! - [`InMemoryPhotoStore`] -- `HashMap`-based store for tests
//!
//! [`Inventory`] ties the two together and owns the record→photo cascade.
//!
//! # Design Rules
//!
//! 1. Listing order is insertion order.
//! 2. At most one load-mutate-persist cycle runs at a time per store.
//! 3. The document at rest is always a complete serialization.
//! 4. A record owns its photo; deleting the record deletes the photo.
//! 5. Photo cleanup is best-effort and never fails the owning operation.

mod collection;
pub mod error;
pub mod file;
pub mod inventory;
pub mod memory;
pub mod photo;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::JsonFileStore;
pub use inventory::{Inventory, PhotoContent, PhotoUpload};
pub use memory::{InMemoryPhotoStore, InMemoryRecordStore};
pub use photo::DiskPhotoStore;
pub use traits::{PhotoReader, PhotoStore, RecordStore};
