//! Foundation types for stockroom.
//!
//! Every other stockroom crate depends on `stockroom-types`.
//!
//! # Key Types
//!
//! - [`InventoryRecord`] — One inventory item as persisted in the store document
//! - [`RecordId`] — Opaque record identifier (UUID v7 text when generated)
//! - [`PhotoRef`] — Bare filename of a photo inside the cache directory
//! - [`NewRecord`] — Validated input for record creation
//! - [`RecordPatch`] — Partial update applied with "empty means unchanged" semantics

pub mod error;
pub mod photo;
pub mod record;

pub use error::TypeError;
pub use photo::PhotoRef;
pub use record::{InventoryRecord, NewRecord, RecordId, RecordPatch};
