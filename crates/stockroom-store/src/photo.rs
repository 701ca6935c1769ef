use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use stockroom_types::PhotoRef;
use tokio::fs;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::{PhotoReader, PhotoStore};

/// Photo store writing one file per photo into the cache directory.
#[derive(Clone, Debug)]
pub struct DiskPhotoStore {
    root: PathBuf,
}

impl DiskPhotoStore {
    /// Create the photo directory if needed and return a store over it.
    pub async fn create(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// Absolute location of `photo`. `PhotoRef` is always a bare filename,
    /// so the join cannot leave the directory.
    pub fn path_of(&self, photo: &PhotoRef) -> PathBuf {
        self.root.join(photo.as_str())
    }
}

#[async_trait]
impl PhotoStore for DiskPhotoStore {
    async fn save(&self, data: Bytes, extension: Option<&str>) -> StoreResult<PhotoRef> {
        let photo = PhotoRef::generate(extension);
        let path = self.path_of(&photo);
        fs::write(&path, &data).await?;
        debug!(photo = %photo, bytes = data.len(), "saved photo");
        Ok(photo)
    }

    async fn open(&self, photo: &PhotoRef) -> StoreResult<PhotoReader> {
        match fs::File::open(self.path_of(photo)).await {
            Ok(file) => Ok(Box::new(file)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::photo_not_found(photo)),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, photo: &PhotoRef) -> StoreResult<bool> {
        match fs::remove_file(self.path_of(photo)).await {
            Ok(()) => {
                debug!(photo = %photo, "deleted photo");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
