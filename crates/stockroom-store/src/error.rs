use std::path::PathBuf;

use stockroom_types::{PhotoRef, RecordId, TypeError};

/// Errors from record and photo store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record with this id exists.
    #[error("inventory item not found: {0}")]
    NotFound(RecordId),

    /// The record exists but has no photo, or the photo file is gone.
    #[error("photo not found: {0}")]
    PhotoNotFound(String),

    /// Input rejected before touching storage.
    #[error("validation error: {0}")]
    Validation(#[from] TypeError),

    /// A freshly generated id collided with an existing record.
    #[error("duplicate record id: {0}")]
    DuplicateId(RecordId),

    /// Another record already owns this photo.
    #[error("photo already referenced by another record: {0}")]
    DuplicatePhoto(PhotoRef),

    /// The persisted document could not be parsed.
    #[error("corrupt store document {}: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    /// Serialization failure while writing the document.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking store call panicked or was cancelled.
    #[error("blocking store task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// A lock guarding the store was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub fn photo_not_found(photo: &PhotoRef) -> Self {
        Self::PhotoNotFound(photo.to_string())
    }

    /// Returns `true` for the "does not exist" family of errors.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::PhotoNotFound(_))
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
