use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use scorecard_core::path::is_safe_relative_path;

use crate::error::BlobError;
use crate::store::BlobStore;
use crate::types::{BlobTarget, StoredBlob};

/// [`BlobStore`] writing evidence files under a root directory on disk.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, relative_path: &str) -> Result<PathBuf, BlobError> {
        if !is_safe_relative_path(relative_path) {
            return Err(BlobError::InvalidPath(relative_path.to_owned()));
        }
        Ok(self.root.join(relative_path))
    }
}

async fn write_durably(file: &mut tokio::fs::File, data: &[u8]) -> std::io::Result<()> {
    file.write_all(data).await?;
    file.sync_all().await
}

/// Turn a failed write into an error, removing the partial file at `path`.
async fn discard_on_error(path: &Path, written: std::io::Result<()>) -> Result<(), BlobError> {
    let Err(e) = written else {
        return Ok(());
    };
    if let Err(cleanup) = tokio::fs::remove_file(path).await
        && cleanup.kind() != ErrorKind::NotFound
    {
        warn!(path = %path.display(), error = %cleanup, "failed to remove partial evidence blob");
    }
    Err(e.into())
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn save(&self, data: Bytes, target: &BlobTarget<'_>) -> Result<StoredBlob, BlobError> {
        let folder = target.folder();
        let dir = self.root.join(&folder);
        tokio::fs::create_dir_all(&dir).await?;

        let blob = StoredBlob::describe(&folder, target.generate_file_name(), &data);
        let path = dir.join(&blob.file_name);

        // create_new: generated names are unique, never clobber an existing file
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        let written = write_durably(&mut file, &data).await;
        drop(file);
        discard_on_error(&path, written).await?;

        debug!(path = %path.display(), size = blob.size, "evidence blob written");
        Ok(blob)
    }

    async fn read(&self, relative_path: &str) -> Result<Option<Bytes>, BlobError> {
        let path = self.resolve(relative_path)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, relative_path: &str) -> Result<bool, BlobError> {
        let path = self.resolve(relative_path)?;
        Ok(tokio::fs::try_exists(&path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> BlobTarget<'static> {
        BlobTarget {
            owner_name: "Ana Ruiz",
            assignment_id: "asg-1",
            method_name: "acta",
            original_name: "acta.pdf",
        }
    }

    #[tokio::test]
    async fn save_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());

        let blob = store
            .save(Bytes::from_static(b"%PDF-1.7"), &target())
            .await
            .unwrap();
        assert!(blob.relative_path.starts_with("Ana_Ruiz/acta_asg-1_"));
        assert_eq!(blob.size, 8);
        assert!(dir.path().join(&blob.relative_path).is_file());

        assert!(store.exists(&blob.relative_path).await.unwrap());
        let data = store.read(&blob.relative_path).await.unwrap().unwrap();
        assert_eq!(&data[..], b"%PDF-1.7");
    }

    #[tokio::test]
    async fn missing_blob_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());
        assert!(store.read("nobody/none.pdf").await.unwrap().is_none());
        assert!(!store.exists("nobody/none.pdf").await.unwrap());
    }

    #[tokio::test]
    async fn traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path().join("root"));
        let err = store.read("../outside.txt").await.unwrap_err();
        assert!(matches!(err, BlobError::InvalidPath(_)));
        let err = store.exists("/etc/passwd").await.unwrap_err();
        assert!(matches!(err, BlobError::InvalidPath(_)));
    }

    #[tokio::test]
    async fn failed_write_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("acta_partial.pdf");
        tokio::fs::write(&path, b"%PDF-1").await.unwrap();

        let err = discard_on_error(&path, Err(std::io::Error::other("disk full")))
            .await
            .unwrap_err();
        assert!(matches!(err, BlobError::Io(_)));
        assert!(!path.exists());

        tokio::fs::write(&path, b"%PDF-1.7").await.unwrap();
        discard_on_error(&path, Ok(())).await.unwrap();
        assert!(path.is_file());
    }

    #[tokio::test]
    async fn repeated_saves_never_collide() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());
        let a = store.save(Bytes::from_static(b"a"), &target()).await.unwrap();
        let b = store.save(Bytes::from_static(b"b"), &target()).await.unwrap();
        assert_ne!(a.relative_path, b.relative_path);
        assert_eq!(&store.read(&a.relative_path).await.unwrap().unwrap()[..], b"a");
    }
}
