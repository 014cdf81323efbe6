// # Notifier Trait
//
// Defines the interface for delivering alert messages.
//
// ## Implementations
//
// - Webhook (HTTP POST): `dnswatch-notify-webhook` crate
// - Future: email, chat gateways, paging systems

use async_trait::async_trait;

/// Trait for notification implementations
///
/// Delivery is fire-and-forget: one attempt, a boolean result, no queuing
/// and no retry. A failed delivery must never abort the caller; the
/// engine records the result and moves on to the next domain.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a notification message
    ///
    /// # Parameters
    ///
    /// - `message`: The alert text, delivered as-is
    ///
    /// # Returns
    ///
    /// `true` if the destination confirmed delivery, `false` for every
    /// failure path (no destination configured, transport failure,
    /// non-success response). Implementations must capture all failures
    /// internally; this method never panics and never returns an error.
    async fn notify(&self, message: &str) -> bool;

    /// Get the notifier name (for logging/debugging)
    fn notifier_name(&self) -> &'static str;
}
