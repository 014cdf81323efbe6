// # Domain Resolver Trait
//
// Defines the interface for resolving a domain's IPv4 address records.
//
// ## Implementations
//
// - Hickory-based (system resolver): `dnswatch-resolver-hickory` crate
// - Future: DoH/DoT transports, fixed-nameserver resolvers
//
// ## Usage
//
// ```rust,ignore
// use dnswatch_core::traits::{DomainResolver, ResolutionOutcome};
//
// #[tokio::main]
// async fn main() {
//     let resolver = /* DomainResolver implementation */;
//
//     match resolver.resolve("example.com").await {
//         ResolutionOutcome::Resolved(address) => println!("-> {}", address),
//         ResolutionOutcome::Failed(failure) => println!("!! {}", failure.detail),
//     }
// }
// ```

use async_trait::async_trait;
use std::fmt;
use std::net::Ipv4Addr;

/// Classification of a failed lookup
///
/// This is a closed set: every resolver implementation must map its
/// library's error surface onto exactly these four kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The domain does not exist (NXDOMAIN)
    NotFound,
    /// The domain exists but has no A record
    NoRecord,
    /// The lookup did not complete within its timeout
    TimedOut,
    /// Any other resolver failure
    Unknown,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // DNS vocabulary rather than variant names
        let name = match self {
            FailureKind::NotFound => "NXDOMAIN",
            FailureKind::NoRecord => "NoAnswer",
            FailureKind::TimedOut => "Timeout",
            FailureKind::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// A failed lookup: its classification plus a human-readable detail line
///
/// The detail strings are fixed formats owned by the constructors below.
/// Alert messages embed them verbatim, so implementations must not invent
/// their own phrasing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupFailure {
    /// Failure classification
    pub kind: FailureKind,
    /// Human-readable detail, embedded verbatim in alert messages
    pub detail: String,
}

impl LookupFailure {
    /// The domain does not exist (NXDOMAIN)
    pub fn not_found(domain: &str) -> Self {
        Self {
            kind: FailureKind::NotFound,
            detail: format!("domain does not exist: {}", domain),
        }
    }

    /// The domain exists but returned no A records
    pub fn no_record(domain: &str) -> Self {
        Self {
            kind: FailureKind::NoRecord,
            detail: format!("no A record: {}", domain),
        }
    }

    /// The lookup exceeded its timeout
    pub fn timed_out(domain: &str) -> Self {
        Self {
            kind: FailureKind::TimedOut,
            detail: format!("lookup timed out: {}", domain),
        }
    }

    /// Any other failure, with the underlying cause
    pub fn unknown(domain: &str, cause: impl fmt::Display) -> Self {
        Self {
            kind: FailureKind::Unknown,
            detail: format!("unexpected error: {} - {}", domain, cause),
        }
    }
}

/// Outcome of resolving a single domain
///
/// Lookup failures are data, not errors: they never cross the engine
/// boundary as `Err`, which keeps the check loop a pure function of
/// outcomes rather than of a resolver library's error hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// The first A record, in the order the resolver returned them
    Resolved(Ipv4Addr),
    /// The lookup failed
    Failed(LookupFailure),
}

/// Trait for domain resolver implementations
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Behavior Contract
///
/// - `resolve()` performs exactly one lookup attempt per call; retry
///   policy (if any) belongs to the caller, not the implementation.
/// - Every failure mode must be mapped to a [`LookupFailure`] via its
///   constructors. `resolve()` never panics and never returns an error
///   type.
/// - The lookup must be bounded by a timeout so a single domain cannot
///   stall a check pass indefinitely.
#[async_trait]
pub trait DomainResolver: Send + Sync {
    /// Resolve the A records for a domain
    ///
    /// # Parameters
    ///
    /// - `domain`: The DNS name to resolve (e.g., "example.com")
    ///
    /// # Returns
    ///
    /// - `ResolutionOutcome::Resolved(address)`: the first returned A record
    /// - `ResolutionOutcome::Failed(failure)`: the classified failure
    async fn resolve(&self, domain: &str) -> ResolutionOutcome;

    /// Get the resolver name (for logging/debugging)
    fn resolver_name(&self) -> &'static str;
}
