use std::collections::BTreeSet;

use async_trait::async_trait;
use tracing::info;

use scorecard_core::UserId;

use crate::error::NotifyError;
use crate::transport::{NotificationPayload, NotificationTransport};

/// A transport that logs the notification and reports success without
/// performing any external I/O.
///
/// Useful for local development where nobody reads the notifications.
pub struct LogTransport {
    name: String,
}

impl LogTransport {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl NotificationTransport for LogTransport {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(
        &self,
        recipients: &BTreeSet<UserId>,
        payload: &NotificationPayload,
    ) -> Result<(), NotifyError> {
        let recipients: Vec<&str> = recipients.iter().map(UserId::as_str).collect();
        info!(
            transport = %self.name,
            kind = ?payload.notice.kind,
            assignment_id = %payload.notice.assignment_id,
            recipients = ?recipients,
            message = %payload.message,
            "notification logged"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use scorecard_core::{AssignmentId, Notice};

    use super::*;

    #[tokio::test]
    async fn log_transport_succeeds() {
        let transport = LogTransport::new("log");
        assert_eq!(transport.name(), "log");
        let payload = NotificationPayload::new(
            Notice::submitted(AssignmentId::new("asg-1"), "Ana"),
            Utc::now(),
        );
        transport
            .send(&BTreeSet::from([UserId::new("j-1")]), &payload)
            .await
            .unwrap();
    }
}
