//! Test doubles and common utilities for check contract tests
//!
//! This module provides minimal test doubles that verify engine
//! behavior without touching real resolvers or webhooks.

use dnswatch_core::config::{DomainCheckEntry, WatchConfig};
use dnswatch_core::traits::{DomainResolver, LookupFailure, Notifier, ResolutionOutcome};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A resolver with scripted per-domain outcomes that tracks calls
pub struct ScriptedResolver {
    /// Scripted outcomes by domain
    answers: Arc<std::sync::Mutex<HashMap<String, ResolutionOutcome>>>,
    /// Call counter for resolve()
    resolve_call_count: Arc<AtomicUsize>,
    /// Recorded domains in resolution order
    resolved_domains: Arc<std::sync::Mutex<Vec<String>>>,
}

impl ScriptedResolver {
    pub fn new() -> Self {
        Self {
            answers: Arc::new(std::sync::Mutex::new(HashMap::new())),
            resolve_call_count: Arc::new(AtomicUsize::new(0)),
            resolved_domains: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    /// Script the outcome for a domain
    ///
    /// Domains without a scripted outcome resolve as NXDOMAIN.
    pub fn set_answer(&self, domain: &str, outcome: ResolutionOutcome) {
        self.answers
            .lock()
            .unwrap()
            .insert(domain.to_string(), outcome);
    }

    /// Get the number of times resolve() was called
    pub fn resolve_call_count(&self) -> usize {
        self.resolve_call_count.load(Ordering::SeqCst)
    }

    /// Get the domains that were resolved, in order
    pub fn resolved_domains(&self) -> Vec<String> {
        self.resolved_domains.lock().unwrap().clone()
    }

    /// Create a new ScriptedResolver that shares state with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            answers: Arc::clone(&other.answers),
            resolve_call_count: Arc::clone(&other.resolve_call_count),
            resolved_domains: Arc::clone(&other.resolved_domains),
        }
    }
}

#[async_trait::async_trait]
impl DomainResolver for ScriptedResolver {
    async fn resolve(&self, domain: &str) -> ResolutionOutcome {
        self.resolve_call_count.fetch_add(1, Ordering::SeqCst);
        self.resolved_domains
            .lock()
            .unwrap()
            .push(domain.to_string());

        match self.answers.lock().unwrap().get(domain) {
            Some(outcome) => outcome.clone(),
            None => ResolutionOutcome::Failed(LookupFailure::not_found(domain)),
        }
    }

    fn resolver_name(&self) -> &'static str {
        "scripted"
    }
}

/// A notifier that records messages and reports a fixed delivery result
pub struct RecordingNotifier {
    /// Result every delivery reports
    delivery_result: bool,
    /// Call counter for notify()
    notify_call_count: Arc<AtomicUsize>,
    /// Recorded messages in delivery order
    messages: Arc<std::sync::Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new(delivery_result: bool) -> Self {
        Self {
            delivery_result,
            notify_call_count: Arc::new(AtomicUsize::new(0)),
            messages: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    /// Get the number of times notify() was called
    pub fn notify_call_count(&self) -> usize {
        self.notify_call_count.load(Ordering::SeqCst)
    }

    /// Get the messages that were delivered, in order
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    /// Create a new RecordingNotifier that shares state with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            delivery_result: other.delivery_result,
            notify_call_count: Arc::clone(&other.notify_call_count),
            messages: Arc::clone(&other.messages),
        }
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) -> bool {
        self.notify_call_count.fetch_add(1, Ordering::SeqCst);
        self.messages.lock().unwrap().push(message.to_string());
        self.delivery_result
    }

    fn notifier_name(&self) -> &'static str {
        "recording"
    }
}

/// Helper to create a WatchConfig from (domain, expected_ip) pairs
pub fn watch_config(entries: &[(&str, &str)]) -> WatchConfig {
    WatchConfig::new(
        entries
            .iter()
            .map(|(domain, expected_ip)| DomainCheckEntry::new(*domain, *expected_ip))
            .collect(),
    )
}
