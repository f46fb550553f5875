use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use scorecard_core::{Notice, UserId};

use crate::error::NotifyError;

/// What a transport delivers: the notice plus its rendered message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    #[serde(flatten)]
    pub notice: Notice,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl NotificationPayload {
    #[must_use]
    pub fn new(notice: Notice, created_at: DateTime<Utc>) -> Self {
        Self {
            message: notice.message(),
            notice,
            created_at,
        }
    }
}

/// Delivery mechanism for notifications (document store, webhook, log).
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Deliver `payload` to every recipient.
    async fn send(
        &self,
        recipients: &BTreeSet<UserId>,
        payload: &NotificationPayload,
    ) -> Result<(), NotifyError>;
}
