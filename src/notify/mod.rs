// src/notify/mod.rs
// =============================================================================
// This module tells the outside world about newly discovered forms.
//
// The run loop calls a Notifier once per new valid URL. Delivery is best
// effort: the loop logs a NotifyError and moves on, it never retries.
// =============================================================================

mod webhook;

use crate::error::NotifyError;

pub use webhook::WebhookNotifier;

/// A newly found form, as handed to a notifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub url: String,
    pub title: Option<String>,
}

pub trait Notifier {
    async fn notify(&self, discovery: &Discovery) -> Result<(), NotifyError>;
}
