use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while delivering notifications.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The transport refused or failed to deliver.
    #[error("delivery failed: {0}")]
    DeliveryFailed(String),

    /// The transport did not respond within the allowed duration.
    #[error("timeout after {0:?}")]
    Timeout(Duration),

    /// A network or transport-level error occurred.
    #[error("connection error: {0}")]
    Connection(String),

    /// The transport was given invalid configuration.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Persisting or encoding the notification failed.
    #[error("storage error: {0}")]
    Storage(#[from] scorecard_state::StateError),
}

impl NotifyError {
    /// Returns `true` if the error is transient and the operation may succeed
    /// on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Connection(_))
    }
}
