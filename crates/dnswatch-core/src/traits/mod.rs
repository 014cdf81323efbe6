//! Core traits for the dnswatch system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`DomainResolver`]: Resolve a domain's IPv4 address records
//! - [`Notifier`]: Deliver alert messages to an external destination

pub mod resolver;
pub mod notifier;

pub use resolver::{DomainResolver, ResolutionOutcome, LookupFailure, FailureKind};
pub use notifier::Notifier;
