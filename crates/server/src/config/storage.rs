use std::path::PathBuf;

use serde::Deserialize;

/// Configuration for evidence file storage.
///
/// # Example
///
/// ```toml
/// [storage]
/// backend = "fs"
/// root = "/var/lib/scorecard/uploads"
/// allowed_content_types = ["application/pdf"]
/// ```
#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    /// `"fs"` or `"memory"`.
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Root directory for the `fs` backend.
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Accepted MIME types. An empty list accepts any type.
    #[serde(default = "default_allowed_content_types")]
    pub allowed_content_types: Vec<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            root: default_root(),
            allowed_content_types: default_allowed_content_types(),
        }
    }
}

fn default_backend() -> String {
    "fs".to_owned()
}

fn default_root() -> PathBuf {
    PathBuf::from("./uploads")
}

fn default_allowed_content_types() -> Vec<String> {
    [
        "application/pdf",
        "application/msword",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}
