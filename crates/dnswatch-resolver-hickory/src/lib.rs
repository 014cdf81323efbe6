// # Hickory Domain Resolver
//
// This crate provides a DomainResolver backed by hickory-resolver's
// Tokio runtime integration.
//
// ## Purpose
//
// This is the **production resolver** for dnswatch. It reads the system
// resolver configuration (`/etc/resolv.conf` on Unix) and performs
// A-record lookups with a bounded per-lookup timeout.
//
// ## Outcome Mapping
//
// Hickory reports failures through a layered error type; this crate
// flattens them into the closed `FailureKind` set:
//
// - NXDOMAIN response               -> `NotFound`
// - answer without A records        -> `NoRecord`
// - lookup exceeded the timeout     -> `TimedOut`
// - everything else                 -> `Unknown` (cause preserved in detail)
//
// ## Multi-Record Answers
//
// When a domain has several A records, the first record reported by the
// resolver is the one compared against the expected address. Record order
// is not stable across lookups (round-robin rotation is common), so a
// multi-homed domain can alternate between match and mismatch.

use dnswatch_core::traits::{DomainResolver, LookupFailure, ResolutionOutcome};
use dnswatch_core::{Error, Result};

use std::net::Ipv4Addr;
use std::time::Duration;

use hickory_resolver::proto::ProtoErrorKind;
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::{ResolveError, ResolveErrorKind, TokioResolver};
use tracing::debug;

/// Default per-lookup timeout
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Hickory-backed domain resolver
pub struct HickoryResolver {
    /// Inner async resolver handle
    resolver: TokioResolver,
}

impl HickoryResolver {
    /// Create a resolver from the system configuration
    ///
    /// # Parameters
    ///
    /// - `lookup_timeout`: Upper bound for a single lookup, including
    ///   upstream retries
    ///
    /// # Errors
    ///
    /// Returns an error if the system resolver configuration cannot be
    /// read (e.g., missing or unparsable `/etc/resolv.conf`).
    pub fn new(lookup_timeout: Duration) -> Result<Self> {
        let mut builder = TokioResolver::builder_tokio().map_err(|e| {
            Error::resolver(format!(
                "Failed to read system resolver configuration: {}",
                e
            ))
        })?;
        builder.options_mut().timeout = lookup_timeout;

        Ok(Self {
            resolver: builder.build(),
        })
    }

    /// Create a resolver with the default lookup timeout
    pub fn system_default() -> Result<Self> {
        Self::new(DEFAULT_LOOKUP_TIMEOUT)
    }

    /// Wrap an already-configured hickory resolver
    ///
    /// Useful for tests and for callers that need non-system upstreams.
    pub fn from_resolver(resolver: TokioResolver) -> Self {
        Self { resolver }
    }
}

#[async_trait::async_trait]
impl DomainResolver for HickoryResolver {
    async fn resolve(&self, domain: &str) -> ResolutionOutcome {
        match self.resolver.ipv4_lookup(domain).await {
            Ok(lookup) => {
                let addresses: Vec<Ipv4Addr> = lookup.iter().map(|a| a.0).collect();
                outcome_from_addresses(domain, &addresses)
            }
            Err(err) => {
                debug!("Lookup for {} failed: {}", domain, err);
                ResolutionOutcome::Failed(classify_error(domain, &err))
            }
        }
    }

    fn resolver_name(&self) -> &'static str {
        "hickory"
    }
}

/// Turn a successful lookup's address list into an outcome
///
/// An answer that came back without any A records (possible when the name
/// exists but only carries other record types) counts as `NoRecord`.
fn outcome_from_addresses(domain: &str, addresses: &[Ipv4Addr]) -> ResolutionOutcome {
    match addresses.first() {
        Some(first) => {
            debug!(
                "Resolved {} to {:?}, comparing first address {}",
                domain, addresses, first
            );
            ResolutionOutcome::Resolved(*first)
        }
        None => ResolutionOutcome::Failed(LookupFailure::no_record(domain)),
    }
}

/// Flatten a hickory resolve error into a LookupFailure
fn classify_error(domain: &str, err: &ResolveError) -> LookupFailure {
    match err.kind() {
        ResolveErrorKind::Proto(proto) => match proto.kind() {
            ProtoErrorKind::NoRecordsFound { response_code, .. } => {
                if *response_code == ResponseCode::NXDomain {
                    LookupFailure::not_found(domain)
                } else {
                    LookupFailure::no_record(domain)
                }
            }
            ProtoErrorKind::Timeout => LookupFailure::timed_out(domain),
            _ => LookupFailure::unknown(domain, err),
        },
        // Both error enums are non_exhaustive; anything unrecognized
        // keeps its cause in the detail string
        _ => LookupFailure::unknown(domain, err),
    }
}
