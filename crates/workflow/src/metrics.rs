use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters tracking evidence workflow outcomes.
///
/// All counters use relaxed ordering. For a consistent point-in-time view,
/// call [`snapshot`](Self::snapshot).
#[derive(Debug, Default)]
pub struct WorkflowMetrics {
    /// Uploads stored and persisted.
    pub uploads_accepted: AtomicU64,
    /// Uploads refused by validation, ownership or the upload gate.
    pub uploads_denied: AtomicU64,
    /// Blob writes that failed.
    pub storage_failures: AtomicU64,
    /// Document writes that failed after the blob was stored.
    pub persist_failures: AtomicU64,
    /// Writes rejected because the assignment changed concurrently.
    pub conflicts: AtomicU64,
    /// Notifications handed to the dispatcher successfully.
    pub notifications_sent: AtomicU64,
    /// Notifications that could not be delivered.
    pub notification_failures: AtomicU64,
    /// Reviews applied.
    pub reviews: AtomicU64,
}

impl WorkflowMetrics {
    pub fn increment_uploads_accepted(&self) {
        self.uploads_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_uploads_denied(&self) {
        self.uploads_denied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_storage_failures(&self) {
        self.storage_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_persist_failures(&self) {
        self.persist_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_conflicts(&self) {
        self.conflicts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_notifications_sent(&self) {
        self.notifications_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_notification_failures(&self) {
        self.notification_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_reviews(&self) {
        self.reviews.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time snapshot of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uploads_accepted: self.uploads_accepted.load(Ordering::Relaxed),
            uploads_denied: self.uploads_denied.load(Ordering::Relaxed),
            storage_failures: self.storage_failures.load(Ordering::Relaxed),
            persist_failures: self.persist_failures.load(Ordering::Relaxed),
            conflicts: self.conflicts.load(Ordering::Relaxed),
            notifications_sent: self.notifications_sent.load(Ordering::Relaxed),
            notification_failures: self.notification_failures.load(Ordering::Relaxed),
            reviews: self.reviews.load(Ordering::Relaxed),
        }
    }
}

/// A plain data snapshot of [`WorkflowMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub uploads_accepted: u64,
    pub uploads_denied: u64,
    pub storage_failures: u64,
    pub persist_failures: u64,
    pub conflicts: u64,
    pub notifications_sent: u64,
    pub notification_failures: u64,
    pub reviews: u64,
}
