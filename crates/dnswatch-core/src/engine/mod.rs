//! Core check engine
//!
//! The WatchEngine is responsible for:
//! - Resolving each configured domain via DomainResolver
//! - Classifying the outcome against the expected address
//! - Sending an alert via Notifier for anything that is not a clean match
//! - Emitting events for external monitoring
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐
//! │ WatchConfig  │─── entries ───┐
//! └──────────────┘               │
//!                                ▼
//!                       ┌──────────────┐
//!                       │ WatchEngine  │
//!                       └──────────────┘
//!                                │
//!          ┌─────────────────────┼─────────────────────┐
//!          │                     │                     │
//!          ▼                     ▼                     ▼
//! ┌────────────────┐    ┌──────────────┐    ┌─────────────┐
//! │ DomainResolver │    │   Notifier   │    │   Events    │
//! │ (resolve)      │    │ (alert)      │    │ (observe)   │
//! └────────────────┘    └──────────────┘    └─────────────┘
//! ```
//!
//! ## Check Flow
//!
//! 1. Resolve the domain's A records
//! 2. Classify: match, mismatch, or failure
//! 3. Mismatch/failure → compose alert message, notify
//! 4. Record the result and continue with the next entry
//! 5. Emit a pass report when all entries are done

use crate::config::{DomainCheckEntry, WatchConfig};
use crate::error::Result;
use crate::traits::{DomainResolver, FailureKind, Notifier, ResolutionOutcome};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::net::Ipv4Addr;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Events emitted by the WatchEngine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckEvent {
    /// A check pass started
    PassStarted {
        domain_count: usize,
    },

    /// Domain resolved to its expected address
    DomainOk {
        domain: String,
        address: Ipv4Addr,
    },

    /// Domain resolved to a different address than expected
    DomainMismatch {
        domain: String,
        expected: String,
        actual: Ipv4Addr,
    },

    /// Lookup failed for a domain
    LookupFailed {
        domain: String,
        kind: FailureKind,
        detail: String,
    },

    /// Alert delivered for a domain
    NotificationSent {
        domain: String,
    },

    /// Alert delivery failed for a domain
    NotificationFailed {
        domain: String,
    },

    /// A check pass completed
    PassCompleted {
        report: PassReport,
    },
}

/// Classified result of checking one domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Resolved to the expected address
    Match {
        /// The resolved address
        address: Ipv4Addr,
    },
    /// Resolved, but to a different address
    Mismatch {
        /// The configured expected address
        expected: String,
        /// The first resolved address
        actual: Ipv4Addr,
    },
    /// The lookup failed
    Failed {
        /// Failure classification
        kind: FailureKind,
        /// Human-readable detail
        detail: String,
    },
}

impl CheckStatus {
    /// Compose the alert message for this status, if it warrants one
    ///
    /// The formats are part of the external contract (they land verbatim
    /// in the webhook payload):
    ///
    /// ```text
    /// DNS lookup failed
    /// domain: {domain}
    /// message: {detail}
    /// ```
    ///
    /// ```text
    /// DNS mismatch
    /// domain: {domain}
    /// expected: {expected}
    /// actual: {actual}
    /// ```
    ///
    /// A clean match returns `None`.
    pub fn alert_message(&self, domain: &str) -> Option<String> {
        match self {
            CheckStatus::Match { .. } => None,
            CheckStatus::Mismatch { expected, actual } => Some(format!(
                "DNS mismatch\ndomain: {}\nexpected: {}\nactual: {}",
                domain, expected, actual
            )),
            CheckStatus::Failed { detail, .. } => Some(format!(
                "DNS lookup failed\ndomain: {}\nmessage: {}",
                domain, detail
            )),
        }
    }
}

/// Classify a resolution outcome against the entry's expected address
///
/// The comparison is the canonical rendering of the resolved address
/// against the configured string, so `"010.0.0.1"` never matches. This is
/// a pure function; all I/O stays in [`WatchEngine::run_once`].
pub fn classify(entry: &DomainCheckEntry, outcome: ResolutionOutcome) -> CheckStatus {
    match outcome {
        ResolutionOutcome::Resolved(address) => {
            if address.to_string() == entry.expected_ip {
                CheckStatus::Match { address }
            } else {
                CheckStatus::Mismatch {
                    expected: entry.expected_ip.clone(),
                    actual: address,
                }
            }
        }
        ResolutionOutcome::Failed(failure) => CheckStatus::Failed {
            kind: failure.kind,
            detail: failure.detail,
        },
    }
}

/// Summary of one completed check pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassReport {
    /// When the pass started
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration of the pass
    pub duration_ms: u64,
    /// Number of entries checked
    pub checked: usize,
    /// Entries that resolved to their expected address
    pub ok: usize,
    /// Entries that resolved to a different address
    pub mismatched: usize,
    /// Entries whose lookup failed
    pub failed: usize,
    /// Alerts confirmed delivered
    pub notifications_sent: usize,
    /// Alerts that could not be delivered
    pub notifications_failed: usize,
}

/// Core check engine
///
/// The engine runs one finite pass over the configured entries per
/// [`WatchEngine::run_once`] call. Periodic re-invocation is the caller's
/// concern (the daemon re-invokes on an interval); the engine itself never
/// schedules anything.
///
/// ## Lifecycle
///
/// 1. Create with [`WatchEngine::new()`], which also yields the event receiver
/// 2. Call [`WatchEngine::run_once()`] per pass
/// 3. Drop to close the event channel
///
/// ## Guarantees
///
/// - Entries are checked strictly in configuration order
/// - Exactly one resolve call per entry per pass
/// - A failed notification never aborts the pass
/// - Event emission never blocks the pass (full channel drops the event
///   with a warning)
pub struct WatchEngine {
    /// Resolver for A-record lookups
    resolver: Box<dyn DomainResolver>,

    /// Notifier for alert delivery
    notifier: Box<dyn Notifier>,

    /// Domains to check, in order
    entries: Vec<DomainCheckEntry>,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<CheckEvent>,
}

impl WatchEngine {
    /// Create a new check engine
    ///
    /// # Parameters
    ///
    /// - `resolver`: Domain resolver implementation
    /// - `notifier`: Notifier implementation
    /// - `config`: Watch configuration (validated here)
    ///
    /// # Returns
    ///
    /// A tuple of (engine, event_receiver) where event_receiver yields
    /// check events
    pub fn new(
        resolver: Box<dyn DomainResolver>,
        notifier: Box<dyn Notifier>,
        config: WatchConfig,
    ) -> Result<(Self, mpsc::Receiver<CheckEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.engine.event_channel_capacity);

        let engine = Self {
            resolver,
            notifier,
            entries: config.domains,
            event_tx: tx,
        };

        Ok((engine, rx))
    }

    /// Run one check pass over all configured entries
    ///
    /// Strictly finite: resolves each entry exactly once, in order, and
    /// returns the pass summary. Per-domain failures are contained to that
    /// domain's check; nothing here returns an error.
    pub async fn run_once(&self) -> PassReport {
        let started_at = Utc::now();
        let pass_timer = std::time::Instant::now();

        info!(
            "Starting check pass over {} domain(s) (resolver: {}, notifier: {})",
            self.entries.len(),
            self.resolver.resolver_name(),
            self.notifier.notifier_name()
        );
        self.emit_event(CheckEvent::PassStarted {
            domain_count: self.entries.len(),
        });

        let mut ok = 0;
        let mut mismatched = 0;
        let mut failed = 0;
        let mut notifications_sent = 0;
        let mut notifications_failed = 0;

        for entry in &self.entries {
            let outcome = self.resolver.resolve(&entry.domain).await;
            let status = classify(entry, outcome);

            match &status {
                CheckStatus::Match { address } => {
                    info!(
                        "Domain {} resolved to expected address {}",
                        entry.domain, address
                    );
                    ok += 1;
                    self.emit_event(CheckEvent::DomainOk {
                        domain: entry.domain.clone(),
                        address: *address,
                    });
                }
                CheckStatus::Mismatch { expected, actual } => {
                    warn!(
                        "Domain {} resolved to {} (expected {})",
                        entry.domain, actual, expected
                    );
                    mismatched += 1;
                    self.emit_event(CheckEvent::DomainMismatch {
                        domain: entry.domain.clone(),
                        expected: expected.clone(),
                        actual: *actual,
                    });
                }
                CheckStatus::Failed { kind, detail } => {
                    warn!("Lookup failed for {} [{}]: {}", entry.domain, kind, detail);
                    failed += 1;
                    self.emit_event(CheckEvent::LookupFailed {
                        domain: entry.domain.clone(),
                        kind: *kind,
                        detail: detail.clone(),
                    });
                }
            }

            // Alert on anything that is not a clean match; a failed
            // delivery is recorded but never aborts the pass
            if let Some(message) = status.alert_message(&entry.domain) {
                if self.notifier.notify(&message).await {
                    debug!("Notification delivered for {}", entry.domain);
                    notifications_sent += 1;
                    self.emit_event(CheckEvent::NotificationSent {
                        domain: entry.domain.clone(),
                    });
                } else {
                    warn!("Notification delivery failed for {}", entry.domain);
                    notifications_failed += 1;
                    self.emit_event(CheckEvent::NotificationFailed {
                        domain: entry.domain.clone(),
                    });
                }
            }
        }

        let report = PassReport {
            started_at,
            duration_ms: pass_timer.elapsed().as_millis() as u64,
            checked: self.entries.len(),
            ok,
            mismatched,
            failed,
            notifications_sent,
            notifications_failed,
        };

        info!(
            "Check pass completed: {}/{} ok, {} mismatched, {} failed, {} alert(s) sent",
            report.ok, report.checked, report.mismatched, report.failed, report.notifications_sent
        );
        self.emit_event(CheckEvent::PassCompleted {
            report: report.clone(),
        });

        report
    }

    /// Emit a check event
    ///
    /// # Parameters
    ///
    /// - `event`: The event to emit
    fn emit_event(&self, event: CheckEvent) {
        // Send event, logging a warning if the channel is full. The event
        // is dropped rather than blocking the check pass.
        if self.event_tx.try_send(event).is_err() {
            warn!(
                "Event channel full, dropping event. Consider increasing event_channel_capacity or draining the receiver."
            );
        }
    }
}
