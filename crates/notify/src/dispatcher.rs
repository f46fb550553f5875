use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, instrument};

use scorecard_core::{Notice, UserId};

use crate::error::NotifyError;
use crate::transport::{NotificationPayload, NotificationTransport};

/// Announces workflow events to a set of users.
///
/// Delivery is best-effort: callers log a returned error and carry on.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn notify(&self, recipients: &BTreeSet<UserId>, notice: &Notice)
    -> Result<(), NotifyError>;
}

/// Default dispatcher: renders a [`NotificationPayload`] and hands it to a
/// transport.
#[derive(Clone)]
pub struct Notifier {
    transport: Arc<dyn NotificationTransport>,
}

impl Notifier {
    pub fn new(transport: Arc<dyn NotificationTransport>) -> Self {
        Self { transport }
    }

    pub fn transport_name(&self) -> &str {
        self.transport.name()
    }
}

#[async_trait]
impl NotificationDispatcher for Notifier {
    #[instrument(skip_all, fields(assignment_id = %notice.assignment_id, transport = %self.transport.name()))]
    async fn notify(
        &self,
        recipients: &BTreeSet<UserId>,
        notice: &Notice,
    ) -> Result<(), NotifyError> {
        if recipients.is_empty() {
            debug!("no recipients, notification skipped");
            return Ok(());
        }
        let payload = NotificationPayload::new(notice.clone(), Utc::now());
        self.transport.send(recipients, &payload).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use scorecard_core::AssignmentId;

    use super::*;

    #[derive(Default)]
    struct Recording {
        sent: Mutex<Vec<(BTreeSet<UserId>, NotificationPayload)>>,
    }

    #[async_trait]
    impl NotificationTransport for Recording {
        #[allow(clippy::unnecessary_literal_bound)]
        fn name(&self) -> &str {
            "recording"
        }

        async fn send(
            &self,
            recipients: &BTreeSet<UserId>,
            payload: &NotificationPayload,
        ) -> Result<(), NotifyError> {
            self.sent
                .lock()
                .unwrap()
                .push((recipients.clone(), payload.clone()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn forwards_rendered_payload() {
        let transport = Arc::new(Recording::default());
        let notifier = Notifier::new(transport.clone());
        let jury = BTreeSet::from([UserId::new("j-1"), UserId::new("j-2")]);
        let notice = Notice::submitted(AssignmentId::new("asg-1"), "Ana");

        notifier.notify(&jury, &notice).await.unwrap();

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, jury);
        assert_eq!(sent[0].1.message, "Ana submitted evidence for assignment asg-1");
    }

    #[tokio::test]
    async fn empty_recipients_send_nothing() {
        let transport = Arc::new(Recording::default());
        let notifier = Notifier::new(transport.clone());
        let notice = Notice::submitted(AssignmentId::new("asg-1"), "Ana");

        notifier.notify(&BTreeSet::new(), &notice).await.unwrap();
        assert!(transport.sent.lock().unwrap().is_empty());
    }
}
