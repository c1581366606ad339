// src/notify/webhook.rs
// =============================================================================
// Posts discoveries to a chat webhook.
//
// Payload: {"content": "<message>"}, the shape Discord-style webhooks accept.
// A missing webhook URL, a network failure and a non-2xx response all come
// back as NotifyError for the caller to log.
// =============================================================================

use super::{Discovery, Notifier};
use crate::error::NotifyError;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct WebhookPayload {
    pub content: String,
}

pub struct WebhookNotifier {
    client: Client,
    url: Option<String>,
}

impl WebhookNotifier {
    pub fn new(url: Option<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }
}

impl Notifier for WebhookNotifier {
    async fn notify(&self, discovery: &Discovery) -> Result<(), NotifyError> {
        let url = self.url.as_deref().ok_or(NotifyError::NotConfigured)?;

        let payload = WebhookPayload {
            content: format_message(discovery),
        };

        let response = self.client.post(url).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }

        info!("Sent notification for {}", discovery.url);
        Ok(())
    }
}

/// The human-readable message for one discovery
pub fn format_message(discovery: &Discovery) -> String {
    match &discovery.title {
        Some(title) => format!(
            "🚀 **New working form found:** {} ({})",
            discovery.url, title
        ),
        None => format!("🚀 **New working form found:** {}", discovery.url),
    }
}
