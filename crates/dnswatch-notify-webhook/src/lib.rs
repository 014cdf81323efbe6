// # Webhook Notifier
//
// This crate provides a webhook-based Notifier implementation for the
// dnswatch system.
//
// ## Purpose
//
// Delivers alert messages as JSON payloads to an incoming-webhook
// endpoint (Slack-compatible `{"text": "..."}` shape). One POST per
// alert, no retries, no queueing; redelivery policy belongs to the
// caller, not here.
//
// ## Delivery Contract
//
// - Payload: `{"text": "<message>"}` with the message verbatim
// - Success: HTTP 200 exactly; every other status is a failed delivery
// - Request timeout: 10 seconds, after which delivery counts as failed
// - Unconfigured endpoint: logged and reported as failed, never fatal
//
// ## Security
//
// Incoming-webhook URLs are capability URLs (the path embeds the
// credential). The endpoint therefore NEVER appears in logs or Debug
// output.

use async_trait::async_trait;
use dnswatch_core::traits::Notifier;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default HTTP timeout for webhook delivery (10 seconds)
const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Webhook notifier
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the notifier logs the message that would have
/// been sent and reports success without touching the network. This
/// allows exercising the full check path without spamming a channel.
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the endpoint.
// Custom Debug implementation that hides the webhook URL
impl std::fmt::Debug for WebhookNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookNotifier")
            .field("endpoint", &self.endpoint.as_ref().map(|_| "<REDACTED>"))
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

pub struct WebhookNotifier {
    /// Webhook endpoint URL
    /// ⚠️ NEVER log this value
    endpoint: Option<String>,

    /// HTTP client for webhook requests
    client: reqwest::Client,

    /// Dry-run mode: if true, log the message and skip the POST
    dry_run: bool,
}

impl WebhookNotifier {
    /// Create a new webhook notifier
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Webhook URL; `None` (or empty) means unconfigured,
    ///   in which case every delivery is reported as failed
    /// - `dry_run`: If true, log instead of POSTing
    ///
    /// # Security
    ///
    /// The endpoint will NEVER be logged or displayed in error messages.
    pub fn new(endpoint: Option<String>, dry_run: bool) -> Self {
        // Build HTTP client with timeout
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_NOTIFY_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        // Treat an empty endpoint the same as an absent one
        let endpoint = endpoint.filter(|e| !e.is_empty());

        Self {
            endpoint,
            client,
            dry_run,
        }
    }

    /// Create a new webhook notifier (production/live mode)
    pub fn new_live(endpoint: Option<String>) -> Self {
        Self::new(endpoint, false)
    }

    /// Create a new webhook notifier (dry-run mode)
    pub fn new_dry_run(endpoint: Option<String>) -> Self {
        Self::new(endpoint, true)
    }
}

/// Build the webhook payload for a message
fn payload_for(message: &str) -> serde_json::Value {
    serde_json::json!({ "text": message })
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, message: &str) -> bool {
        let endpoint = match &self.endpoint {
            Some(endpoint) => endpoint,
            None => {
                warn!("No webhook endpoint configured, dropping notification");
                return false;
            }
        };

        if self.dry_run {
            info!("[DRY-RUN] Would send webhook notification: {:?}", message);
            return true;
        }

        match self
            .client
            .post(endpoint)
            .json(&payload_for(message))
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status();
                // Strict: only 200 counts, 2xx variants like 204 do not
                if status == reqwest::StatusCode::OK {
                    debug!("Webhook accepted notification");
                    true
                } else {
                    warn!("Webhook rejected notification: HTTP {}", status);
                    false
                }
            }
            Err(e) => {
                warn!("Webhook request failed: {}", e);
                false
            }
        }
    }

    fn notifier_name(&self) -> &'static str {
        "webhook"
    }
}
