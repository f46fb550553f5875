//! Build backends and the [`AppState`] from configuration.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use scorecard_blob::{BlobStore, FsBlobStore, MemoryBlobStore};
use scorecard_notify::{
    LogTransport, NotificationInbox, NotificationTransport, Notifier, StoreTransport,
    WebhookConfig, WebhookTransport,
};
use scorecard_state::DocumentStore;
use scorecard_state_memory::MemoryDocumentStore;
use scorecard_workflow::{EvidenceService, UploadPolicy};

use crate::api::AppState;
use crate::config::{NotificationsConfig, ScorecardConfig, StateConfig, StorageConfig};
use crate::error::ServerError;

pub fn create_document_store(config: &StateConfig) -> Result<Arc<dyn DocumentStore>, ServerError> {
    match config.backend.as_str() {
        "memory" => Ok(Arc::new(MemoryDocumentStore::new())),
        other => Err(ServerError::Config(format!(
            "unsupported state backend: {other}"
        ))),
    }
}

pub fn create_blob_store(config: &StorageConfig) -> Result<Arc<dyn BlobStore>, ServerError> {
    match config.backend.as_str() {
        "fs" => Ok(Arc::new(FsBlobStore::new(&config.root))),
        "memory" => Ok(Arc::new(MemoryBlobStore::new())),
        other => Err(ServerError::Config(format!(
            "unsupported storage backend: {other}"
        ))),
    }
}

pub fn create_transport(
    config: &NotificationsConfig,
    store: Arc<dyn DocumentStore>,
) -> Result<Arc<dyn NotificationTransport>, ServerError> {
    match config.transport.as_str() {
        "store" => Ok(Arc::new(StoreTransport::new(store))),
        "log" => Ok(Arc::new(LogTransport::new("log"))),
        "webhook" => {
            let url = config.webhook_url.clone().ok_or_else(|| {
                ServerError::Config("notifications.webhook_url is required".into())
            })?;
            let mut webhook = WebhookConfig::new(url);
            webhook.timeout = Duration::from_secs(config.webhook_timeout_seconds);
            let transport =
                WebhookTransport::new(webhook).map_err(|e| ServerError::Config(e.to_string()))?;
            Ok(Arc::new(transport))
        }
        other => Err(ServerError::Config(format!(
            "unsupported notification transport: {other}"
        ))),
    }
}

/// Wire the document store, blob store, dispatcher and service together.
pub fn build_app_state(config: &ScorecardConfig) -> Result<AppState, ServerError> {
    let store = create_document_store(&config.state)?;
    let blobs = create_blob_store(&config.storage)?;
    let transport = create_transport(&config.notifications, Arc::clone(&store))?;

    info!(
        state = %config.state.backend,
        storage = %config.storage.backend,
        transport = transport.name(),
        "backends initialized"
    );

    let service = EvidenceService::builder()
        .store(Arc::clone(&store))
        .blobs(blobs)
        .dispatcher(Arc::new(Notifier::new(transport)))
        .policy(UploadPolicy {
            max_bytes: config.server.max_upload_bytes,
            allowed_content_types: config.storage.allowed_content_types.clone(),
        })
        .build()?;

    Ok(AppState {
        service: Arc::new(service),
        inbox: NotificationInbox::new(store),
    })
}
