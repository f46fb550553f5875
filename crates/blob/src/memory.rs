use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use scorecard_core::path::is_safe_relative_path;

use crate::error::BlobError;
use crate::store::BlobStore;
use crate::types::{BlobTarget, StoredBlob};

/// In-memory [`BlobStore`] backed by a [`DashMap`]. Useful for local
/// development and tests; contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: DashMap<String, Bytes>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

fn checked(relative_path: &str) -> Result<&str, BlobError> {
    if is_safe_relative_path(relative_path) {
        Ok(relative_path)
    } else {
        Err(BlobError::InvalidPath(relative_path.to_owned()))
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn save(&self, data: Bytes, target: &BlobTarget<'_>) -> Result<StoredBlob, BlobError> {
        let blob = StoredBlob::describe(&target.folder(), target.generate_file_name(), &data);
        self.blobs.insert(blob.relative_path.clone(), data);
        Ok(blob)
    }

    async fn read(&self, relative_path: &str) -> Result<Option<Bytes>, BlobError> {
        let key = checked(relative_path)?;
        Ok(self.blobs.get(key).map(|b| b.value().clone()))
    }

    async fn exists(&self, relative_path: &str) -> Result<bool, BlobError> {
        let key = checked(relative_path)?;
        Ok(self.blobs.contains_key(key))
    }
}
