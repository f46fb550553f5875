pub mod dispatcher;
pub mod error;
pub mod log;
pub mod store;
pub mod transport;
pub mod webhook;

pub use dispatcher::{NotificationDispatcher, Notifier};
pub use error::NotifyError;
pub use log::LogTransport;
pub use store::{NotificationInbox, StoreTransport};
pub use transport::{NotificationPayload, NotificationTransport};
pub use webhook::{WebhookConfig, WebhookTransport};
