use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use scorecard_core::UserId;

use crate::error::NotifyError;
use crate::transport::{NotificationPayload, NotificationTransport};

/// Configuration for [`WebhookTransport`].
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Endpoint receiving a JSON `POST` per notification.
    pub url: String,
    pub timeout: Duration,
}

impl WebhookConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WebhookBody<'a> {
    recipients: Vec<&'a str>,
    #[serde(flatten)]
    payload: &'a NotificationPayload,
}

/// Delivers notifications to an external HTTP endpoint.
pub struct WebhookTransport {
    config: WebhookConfig,
    client: Client,
}

impl WebhookTransport {
    /// Create a new webhook transport with its own HTTP client.
    pub fn new(config: WebhookConfig) -> Result<Self, NotifyError> {
        if config.url.is_empty() {
            return Err(NotifyError::Configuration(
                "webhook url must not be empty".to_owned(),
            ));
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| NotifyError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    /// Create a new webhook transport with a custom HTTP client.
    pub fn with_client(config: WebhookConfig, client: Client) -> Self {
        Self { config, client }
    }

    fn build_body<'a>(
        recipients: &'a BTreeSet<UserId>,
        payload: &'a NotificationPayload,
    ) -> WebhookBody<'a> {
        WebhookBody {
            recipients: recipients.iter().map(UserId::as_str).collect(),
            payload,
        }
    }
}

#[async_trait]
impl NotificationTransport for WebhookTransport {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "webhook"
    }

    #[instrument(skip_all, fields(url = %self.config.url))]
    async fn send(
        &self,
        recipients: &BTreeSet<UserId>,
        payload: &NotificationPayload,
    ) -> Result<(), NotifyError> {
        let body = Self::build_body(recipients, payload);
        debug!(recipients = body.recipients.len(), "posting notification webhook");

        let response = self
            .client
            .post(&self.config.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NotifyError::Timeout(self.config.timeout)
                } else {
                    NotifyError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "notification webhook rejected");
            return Err(NotifyError::DeliveryFailed(format!(
                "webhook returned HTTP {}",
                status.as_u16()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use scorecard_core::{AssignmentId, Notice};

    use super::*;

    #[test]
    fn empty_url_is_rejected() {
        let err = WebhookTransport::new(WebhookConfig::new("")).err().unwrap();
        assert!(matches!(err, NotifyError::Configuration(_)));
    }

    #[test]
    fn body_lists_recipients_and_flattens_payload() {
        let recipients = BTreeSet::from([UserId::new("j-2"), UserId::new("j-1")]);
        let payload = NotificationPayload::new(
            Notice::submitted(AssignmentId::new("asg-1"), "Ana"),
            Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        );
        let json = serde_json::to_value(WebhookTransport::build_body(&recipients, &payload)).unwrap();
        assert_eq!(json["recipients"], serde_json::json!(["j-1", "j-2"]));
        assert_eq!(json["kind"], "evidence_submitted");
        assert_eq!(json["assignmentId"], "asg-1");
        assert_eq!(json["createdAt"], "2024-06-01T12:00:00Z");
    }
}
