use async_trait::async_trait;
use bytes::Bytes;

use crate::error::BlobError;
use crate::types::{BlobTarget, StoredBlob};

/// Pluggable blob storage backend for evidence files.
///
/// Blobs are addressed by a relative path `{owner folder}/{generated name}`
/// that the store chooses on [`save`](Self::save). Stored blobs are never
/// overwritten.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under a freshly generated path for `target`.
    async fn save(&self, data: Bytes, target: &BlobTarget<'_>) -> Result<StoredBlob, BlobError>;

    /// Read a blob. Returns `None` if nothing is stored at `relative_path`.
    async fn read(&self, relative_path: &str) -> Result<Option<Bytes>, BlobError>;

    /// Whether a blob is stored at `relative_path`.
    async fn exists(&self, relative_path: &str) -> Result<bool, BlobError>;
}
