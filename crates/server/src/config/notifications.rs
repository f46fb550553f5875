use serde::Deserialize;

/// How workflow notifications are delivered.
#[derive(Debug, Deserialize)]
pub struct NotificationsConfig {
    /// `"store"` keeps an inbox per user, `"log"` only logs,
    /// `"webhook"` posts to `webhook_url`.
    #[serde(default = "default_transport")]
    pub transport: String,
    pub webhook_url: Option<String>,
    #[serde(default = "default_webhook_timeout")]
    pub webhook_timeout_seconds: u64,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            transport: default_transport(),
            webhook_url: None,
            webhook_timeout_seconds: default_webhook_timeout(),
        }
    }
}

fn default_transport() -> String {
    "store".to_owned()
}

fn default_webhook_timeout() -> u64 {
    10
}
