// # dnswatch-core
//
// Core library for the dnswatch domain monitoring system.
//
// ## Architecture Overview
//
// This library provides the core functionality for monitoring DNS records:
// - **DomainResolver**: Trait for resolving a domain's IPv4 addresses
// - **Notifier**: Trait for delivering alert messages
// - **WatchEngine**: Core engine that runs the resolve → classify → notify pass
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from implementations
// 2. **Outcome-as-Data**: Lookup failures are classified values, never errors
//    crossing the engine boundary
// 3. **Library-First**: The engine can be embedded in any tokio application
// 4. **Sequential Passes**: One domain at a time, every suspension point
//    bounded by an explicit timeout

pub mod traits;
pub mod engine;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{DomainResolver, Notifier, ResolutionOutcome, LookupFailure, FailureKind};
pub use engine::{WatchEngine, CheckEvent, CheckStatus, PassReport, classify};
pub use config::{WatchConfig, DomainCheckEntry, EngineConfig};
pub use error::{Error, Result};
