use std::sync::Arc;

use scorecard_blob::BlobStore;
use scorecard_notify::NotificationDispatcher;
use scorecard_state::DocumentStore;

use crate::error::WorkflowError;
use crate::metrics::WorkflowMetrics;
use crate::policy::UploadPolicy;
use crate::service::EvidenceService;

/// Fluent builder for an [`EvidenceService`].
///
/// A document store, a blob store and a notification dispatcher are
/// required. The upload policy defaults to [`UploadPolicy::default`].
#[derive(Default)]
pub struct EvidenceServiceBuilder {
    store: Option<Arc<dyn DocumentStore>>,
    blobs: Option<Arc<dyn BlobStore>>,
    dispatcher: Option<Arc<dyn NotificationDispatcher>>,
    policy: UploadPolicy,
    metrics: Option<Arc<WorkflowMetrics>>,
}

impl EvidenceServiceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    #[must_use]
    pub fn blobs(mut self, blobs: Arc<dyn BlobStore>) -> Self {
        self.blobs = Some(blobs);
        self
    }

    #[must_use]
    pub fn dispatcher(mut self, dispatcher: Arc<dyn NotificationDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    #[must_use]
    pub fn policy(mut self, policy: UploadPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Share an existing metrics instance instead of creating a new one.
    #[must_use]
    pub fn metrics(mut self, metrics: Arc<WorkflowMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn build(self) -> Result<EvidenceService, WorkflowError> {
        let store = self
            .store
            .ok_or_else(|| WorkflowError::Configuration("document store is required".into()))?;
        let blobs = self
            .blobs
            .ok_or_else(|| WorkflowError::Configuration("blob store is required".into()))?;
        let dispatcher = self.dispatcher.ok_or_else(|| {
            WorkflowError::Configuration("notification dispatcher is required".into())
        })?;

        Ok(EvidenceService {
            store,
            blobs,
            dispatcher,
            policy: self.policy,
            metrics: self.metrics.unwrap_or_default(),
        })
    }
}
