use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use scorecard_core::path::{extension, sanitize_segment};

/// Where and for whom a new evidence blob is being stored.
#[derive(Debug, Clone, Copy)]
pub struct BlobTarget<'a> {
    /// Display name of the uploading user; becomes the folder name.
    pub owner_name: &'a str,
    pub assignment_id: &'a str,
    pub method_name: &'a str,
    /// Filename as sent by the client, used only for its extension.
    pub original_name: &'a str,
}

impl BlobTarget<'_> {
    /// Folder that holds this owner's blobs.
    #[must_use]
    pub fn folder(&self) -> String {
        sanitize_segment(self.owner_name)
    }

    /// Generate a fresh unique filename:
    /// `{method}_{assignment}_{uuid}[.ext]`.
    #[must_use]
    pub fn generate_file_name(&self) -> String {
        let unique = uuid::Uuid::now_v7().simple();
        let base = format!(
            "{}_{}_{unique}",
            sanitize_segment(self.method_name),
            sanitize_segment(self.assignment_id),
        );
        match extension(self.original_name) {
            Some(ext) => format!("{base}.{ext}"),
            None => base,
        }
    }
}

/// Metadata for a blob that was written successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBlob {
    /// `{folder}/{file_name}`, relative to the store root.
    pub relative_path: String,
    /// Generated unique filename.
    pub file_name: String,
    /// Size in bytes.
    pub size: u64,
    /// `SHA-256` hex digest of the blob content.
    pub checksum_sha256: String,
}

impl StoredBlob {
    /// Describe `data` stored as `file_name` inside `folder`.
    #[must_use]
    pub fn describe(folder: &str, file_name: String, data: &[u8]) -> Self {
        Self {
            relative_path: format!("{folder}/{file_name}"),
            file_name,
            size: data.len() as u64,
            checksum_sha256: hex::encode(Sha256::digest(data)),
        }
    }
}
