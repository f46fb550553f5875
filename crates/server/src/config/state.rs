use serde::Deserialize;

/// Configuration for the document store backend.
#[derive(Debug, Deserialize)]
pub struct StateConfig {
    /// Which backend to use. Only `"memory"` is available.
    #[serde(default = "default_backend")]
    pub backend: String,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
        }
    }
}

fn default_backend() -> String {
    "memory".to_owned()
}
