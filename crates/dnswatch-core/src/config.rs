//! Configuration types for the dnswatch system
//!
//! This module defines the configuration structures and the config file
//! loader. The file format is a JSON object with a `domains` array:
//!
//! ```json
//! {
//!   "domains": [
//!     { "domain": "example.com", "expected_ip": "93.184.216.34" }
//!   ]
//! }
//! ```
//!
//! Unknown fields are ignored so operators can annotate their config files.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::{Error, Result};

/// A single monitored domain and the address it is expected to resolve to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainCheckEntry {
    /// DNS name to resolve (e.g., "example.com")
    pub domain: String,

    /// Expected IPv4 address as a dotted-quad literal
    ///
    /// Compared as a string against the canonical rendering of the first
    /// resolved address. A non-canonical value here (leading zeros, etc.)
    /// will therefore always alert as a mismatch.
    pub expected_ip: String,
}

impl DomainCheckEntry {
    /// Create a new check entry
    pub fn new(domain: impl Into<String>, expected_ip: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            expected_ip: expected_ip.into(),
        }
    }
}

/// Main dnswatch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Domains to check, in check order
    pub domains: Vec<DomainCheckEntry>,

    /// Optional engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

impl WatchConfig {
    /// Create a configuration from a list of entries, with default
    /// engine settings
    pub fn new(domains: Vec<DomainCheckEntry>) -> Self {
        Self {
            domains,
            engine: EngineConfig::default(),
        }
    }

    /// Load and validate a configuration file
    ///
    /// Distinguishes the two fatal startup cases the daemon reports
    /// separately:
    /// - file absent → [`Error::ConfigMissing`]
    /// - unparsable content or constraint violation → [`Error::ConfigMalformed`]
    ///
    /// Any other I/O failure (permissions, etc.) is propagated as
    /// [`Error::Io`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::config_missing(path));
            }
            Err(e) => return Err(Error::Io(e)),
        };

        let config: WatchConfig = serde_json::from_str(&content)
            .map_err(|e| Error::config_malformed(path, e.to_string()))?;

        config
            .validate()
            .map_err(|e| Error::config_malformed(path, e.to_string()))?;

        info!("Configuration loaded: {} domain(s)", config.domains.len());
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.domains.is_empty() {
            return Err(Error::config("No domains configured"));
        }

        for entry in &self.domains {
            if entry.domain.is_empty() {
                return Err(Error::config("Domain name cannot be empty"));
            }
            if entry.expected_ip.is_empty() {
                return Err(Error::config(format!(
                    "Expected address for {} cannot be empty",
                    entry.domain
                )));
            }
        }

        Ok(())
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Capacity of the internal event channel
    ///
    /// When full, new check events will be dropped (with a warning log).
    /// This prevents unbounded memory growth when nothing drains the
    /// receiver.
    ///
    /// Default: 1000 events
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

fn default_event_channel_capacity() -> usize {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_config(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn parses_domains_array() {
        let json = r#"{"domains":[{"domain":"example.com","expected_ip":"93.184.216.34"}]}"#;
        let config: WatchConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.domains.len(), 1);
        assert_eq!(config.domains[0].domain, "example.com");
        assert_eq!(config.domains[0].expected_ip, "93.184.216.34");
        assert_eq!(config.engine.event_channel_capacity, 1000);
    }

    #[test]
    fn ignores_unknown_fields() {
        let json = r#"{
            "comment": "internal hosts",
            "domains": [{"domain": "a.example", "expected_ip": "10.0.0.1"}]
        }"#;
        let config: WatchConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.domains.len(), 1);
    }

    #[test]
    fn validate_rejects_empty_domain_list() {
        let config = WatchConfig::new(Vec::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_fields() {
        let config = WatchConfig::new(vec![DomainCheckEntry::new("", "10.0.0.1")]);
        assert!(config.validate().is_err());

        let config = WatchConfig::new(vec![DomainCheckEntry::new("a.example", "")]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_missing_file_is_config_missing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("does-not-exist.json");

        let err = WatchConfig::load(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigMissing { .. }), "got: {:?}", err);
    }

    #[test]
    fn load_unparsable_content_is_config_malformed() {
        let dir = tempdir().unwrap();
        let path = write_config(&dir, "broken.json", "not json at all");

        let err = WatchConfig::load(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigMalformed { .. }), "got: {:?}", err);
    }

    #[test]
    fn load_empty_domain_list_is_config_malformed() {
        let dir = tempdir().unwrap();
        let path = write_config(&dir, "empty.json", r#"{"domains":[]}"#);

        let err = WatchConfig::load(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigMalformed { .. }), "got: {:?}", err);
    }

    #[test]
    fn load_valid_file() {
        let dir = tempdir().unwrap();
        let path = write_config(
            &dir,
            "config.json",
            r#"{"domains":[
                {"domain": "example.com", "expected_ip": "93.184.216.34"},
                {"domain": "internal.example", "expected_ip": "10.1.2.3"}
            ]}"#,
        );

        let config = WatchConfig::load(&path).unwrap();
        assert_eq!(config.domains.len(), 2);
        assert_eq!(config.domains[1].domain, "internal.example");
    }
}
