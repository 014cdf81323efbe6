//! Minimal embedding example for dnswatch-core
//!
//! This example demonstrates using dnswatch-core as a library in a custom
//! application: a scripted resolver and a stdout notifier are wired into
//! the engine, one check pass runs, and the pass report is printed.

use dnswatch_core::config::{DomainCheckEntry, WatchConfig};
use dnswatch_core::traits::{DomainResolver, LookupFailure, Notifier, ResolutionOutcome};
use dnswatch_core::{Result, WatchEngine};
use std::collections::HashMap;
use std::net::Ipv4Addr;

/// Resolver with scripted answers for embedded usage
struct ScriptedResolver {
    answers: HashMap<String, ResolutionOutcome>,
}

impl ScriptedResolver {
    fn new() -> Self {
        let mut answers = HashMap::new();
        answers.insert(
            "example.com".to_string(),
            ResolutionOutcome::Resolved(Ipv4Addr::new(93, 184, 216, 34)),
        );
        answers.insert(
            "moved.example.com".to_string(),
            ResolutionOutcome::Resolved(Ipv4Addr::new(203, 0, 113, 9)),
        );
        answers.insert(
            "gone.example.com".to_string(),
            ResolutionOutcome::Failed(LookupFailure::not_found("gone.example.com")),
        );
        Self { answers }
    }
}

#[async_trait::async_trait]
impl DomainResolver for ScriptedResolver {
    async fn resolve(&self, domain: &str) -> ResolutionOutcome {
        match self.answers.get(domain) {
            Some(outcome) => outcome.clone(),
            None => ResolutionOutcome::Failed(LookupFailure::not_found(domain)),
        }
    }

    fn resolver_name(&self) -> &'static str {
        "scripted"
    }
}

/// Notifier that prints alerts instead of delivering them
struct StdoutNotifier;

#[async_trait::async_trait]
impl Notifier for StdoutNotifier {
    async fn notify(&self, message: &str) -> bool {
        println!("[Scripted] Alert:\n{}\n", message);
        true
    }

    fn notifier_name(&self) -> &'static str {
        "stdout"
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Embedded dnswatch-core Example ===\n");

    tracing_subscriber::fmt().with_max_level(tracing::Level::WARN).init();

    // One matching, one mismatched, one missing domain
    let config = WatchConfig::new(vec![
        DomainCheckEntry::new("example.com", "93.184.216.34"),
        DomainCheckEntry::new("moved.example.com", "198.51.100.7"),
        DomainCheckEntry::new("gone.example.com", "192.0.2.1"),
    ]);

    let (engine, mut event_rx) = WatchEngine::new(
        Box::new(ScriptedResolver::new()),
        Box::new(StdoutNotifier),
        config,
    )?;

    let report = engine.run_once().await;

    // Show what the engine emitted along the way
    while let Ok(event) = event_rx.try_recv() {
        println!("[Scripted] Event: {:?}", event);
    }

    println!("\n[Scripted] Pass report:");
    match serde_json::to_string_pretty(&report) {
        Ok(rendered) => println!("{}", rendered),
        Err(e) => println!("(report not serializable: {})", e),
    }

    Ok(())
}
