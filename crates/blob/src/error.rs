use thiserror::Error;

/// Errors that can occur during blob storage operations.
#[derive(Debug, Error)]
pub enum BlobError {
    /// The relative path is empty, absolute or escapes the store root.
    #[error("invalid blob path: {0}")]
    InvalidPath(String),

    /// An I/O error from a filesystem backend.
    #[error("blob io error: {0}")]
    Io(#[from] std::io::Error),

    /// A storage backend error occurred.
    #[error("blob storage error: {0}")]
    Storage(String),
}
