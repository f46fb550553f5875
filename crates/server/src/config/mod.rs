mod notifications;
mod server;
mod state;
mod storage;
mod telemetry;


pub use notifications::*;
pub use server::*;
pub use state::*;
pub use storage::*;
pub use telemetry::*;

use std::path::Path;

use serde::Deserialize;

use crate::error::ServerError;

/// Top-level configuration for the scorecard server, loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct ScorecardConfig {
    /// HTTP server bind configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Document store backend.
    #[serde(default)]
    pub state: StateConfig,
    /// Evidence blob storage.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Notification delivery.
    #[serde(default)]
    pub notifications: NotificationsConfig,
    /// `OpenTelemetry` distributed tracing.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl ScorecardConfig {
    /// Load configuration from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ServerError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ServerError> {
        toml::from_str(contents).map_err(|e| ServerError::Config(e.to_string()))
    }
}
