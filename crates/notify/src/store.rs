//! Notifications persisted as documents, one per recipient.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use scorecard_core::{Notification, NotificationId, UserId};
use scorecard_state::typed;
use scorecard_state::{Collection, DocumentStore, StateError};

use crate::error::NotifyError;
use crate::transport::{NotificationPayload, NotificationTransport};

/// Transport writing each notification into the `notifications` collection.
pub struct StoreTransport {
    store: Arc<dyn DocumentStore>,
}

impl StoreTransport {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl NotificationTransport for StoreTransport {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "store"
    }

    async fn send(
        &self,
        recipients: &BTreeSet<UserId>,
        payload: &NotificationPayload,
    ) -> Result<(), NotifyError> {
        for recipient in recipients {
            let notification = Notification {
                id: NotificationId::new(uuid::Uuid::now_v7().to_string()),
                recipient_id: recipient.clone(),
                notice: payload.notice.clone(),
                message: payload.message.clone(),
                created_at: payload.created_at,
                read: false,
            };
            typed::create(
                self.store.as_ref(),
                &Collection::Notifications,
                notification.id.as_str(),
                &notification,
            )
            .await?;
        }
        Ok(())
    }
}

/// Read side of stored notifications.
#[derive(Clone)]
pub struct NotificationInbox {
    store: Arc<dyn DocumentStore>,
}

impl NotificationInbox {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Notifications addressed to `user`, newest first.
    pub async fn list_for(&self, user: &UserId) -> Result<Vec<Notification>, StateError> {
        let mut items: Vec<Notification> = typed::list_where(
            self.store.as_ref(),
            &Collection::Notifications,
            "recipientId",
            &Value::String(user.to_string()),
        )
        .await?
        .into_iter()
        .map(|v| v.value)
        .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(items)
    }

    /// Mark a notification as read. Returns `None` if it does not exist.
    pub async fn mark_read(&self, id: &NotificationId) -> Result<Option<Notification>, StateError> {
        let Some(found) =
            typed::get::<Notification>(self.store.as_ref(), &Collection::Notifications, id).await?
        else {
            return Ok(None);
        };
        let mut notification = found.value;
        if notification.read {
            return Ok(Some(notification));
        }
        notification.read = true;

        let mut fields = Map::new();
        fields.insert("read".to_owned(), Value::Bool(true));
        self.store
            .update(&Collection::Notifications, id, &fields)
            .await?;
        Ok(Some(notification))
    }

    /// Number of unread notifications for `user`.
    pub async fn unread_count(&self, user: &UserId) -> Result<usize, StateError> {
        Ok(self.list_for(user).await?.iter().filter(|n| !n.read).count())
    }
}
