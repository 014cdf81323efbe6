//! Contract Test: Alert Composition and Delivery
//!
//! This test verifies the alert messages the engine hands to the
//! notifier. The formats are external contract: downstream channels
//! parse them, so they are asserted byte for byte.
//!
//! Constraints verified:
//! - Mismatch alerts carry domain, expected, and actual address
//! - Failure alerts carry domain and failure detail, never "expected"
//! - One alert per problem domain per pass
//! - A failed delivery is recorded and the pass continues

mod common;

use common::*;
use dnswatch_core::WatchEngine;
use dnswatch_core::traits::{LookupFailure, ResolutionOutcome};
use std::net::Ipv4Addr;

#[tokio::test]
async fn mismatched_domain_sends_exactly_one_alert() {
    let resolver = ScriptedResolver::new();
    resolver.set_answer(
        "example.com",
        ResolutionOutcome::Resolved(Ipv4Addr::new(203, 0, 113, 9)),
    );
    let notifier = RecordingNotifier::new(true);

    let (engine, _event_rx) = WatchEngine::new(
        Box::new(ScriptedResolver::sharing_counters_with(&resolver)),
        Box::new(RecordingNotifier::sharing_counters_with(&notifier)),
        watch_config(&[("example.com", "93.184.216.34")]),
    )
    .expect("engine construction succeeds");

    engine.run_once().await;

    assert_eq!(notifier.notify_call_count(), 1);
    assert_eq!(
        notifier.messages(),
        vec![
            "DNS mismatch\ndomain: example.com\nexpected: 93.184.216.34\nactual: 203.0.113.9"
                .to_string()
        ]
    );
}

#[tokio::test]
async fn failed_lookup_sends_alert_with_detail() {
    let resolver = ScriptedResolver::new();
    resolver.set_answer(
        "gone.example",
        ResolutionOutcome::Failed(LookupFailure::not_found("gone.example")),
    );
    let notifier = RecordingNotifier::new(true);

    let (engine, _event_rx) = WatchEngine::new(
        Box::new(ScriptedResolver::sharing_counters_with(&resolver)),
        Box::new(RecordingNotifier::sharing_counters_with(&notifier)),
        watch_config(&[("gone.example", "10.0.0.1")]),
    )
    .expect("engine construction succeeds");

    engine.run_once().await;

    let messages = notifier.messages();
    assert_eq!(
        messages,
        vec![
            "DNS lookup failed\ndomain: gone.example\nmessage: domain does not exist: gone.example"
                .to_string()
        ]
    );
    // Failure alerts never mention the expected address
    assert!(!messages[0].contains("expected"));
}

#[tokio::test]
async fn alert_for_unknown_failure_includes_cause() {
    let resolver = ScriptedResolver::new();
    resolver.set_answer(
        "odd.example",
        ResolutionOutcome::Failed(LookupFailure::unknown("odd.example", "connection refused")),
    );
    let notifier = RecordingNotifier::new(true);

    let (engine, _event_rx) = WatchEngine::new(
        Box::new(ScriptedResolver::sharing_counters_with(&resolver)),
        Box::new(RecordingNotifier::sharing_counters_with(&notifier)),
        watch_config(&[("odd.example", "10.0.0.1")]),
    )
    .expect("engine construction succeeds");

    engine.run_once().await;

    assert_eq!(
        notifier.messages(),
        vec![
            "DNS lookup failed\ndomain: odd.example\nmessage: unexpected error: odd.example - connection refused"
                .to_string()
        ]
    );
}

#[tokio::test]
async fn failed_delivery_does_not_stop_the_pass() {
    let resolver = ScriptedResolver::new();
    resolver.set_answer(
        "a.example",
        ResolutionOutcome::Resolved(Ipv4Addr::new(203, 0, 113, 1)),
    );
    resolver.set_answer(
        "b.example",
        ResolutionOutcome::Resolved(Ipv4Addr::new(203, 0, 113, 2)),
    );
    // Every delivery fails (e.g., webhook endpoint unreachable)
    let notifier = RecordingNotifier::new(false);

    let (engine, _event_rx) = WatchEngine::new(
        Box::new(ScriptedResolver::sharing_counters_with(&resolver)),
        Box::new(RecordingNotifier::sharing_counters_with(&notifier)),
        watch_config(&[("a.example", "10.0.0.1"), ("b.example", "10.0.0.2")]),
    )
    .expect("engine construction succeeds");

    let report = engine.run_once().await;

    // Both domains were still checked and both alerts attempted
    assert_eq!(resolver.resolve_call_count(), 2);
    assert_eq!(notifier.notify_call_count(), 2);
    assert_eq!(report.checked, 2);
    assert_eq!(report.mismatched, 2);
    assert_eq!(report.notifications_sent, 0);
    assert_eq!(report.notifications_failed, 2);
}
