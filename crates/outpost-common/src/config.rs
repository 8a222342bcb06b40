//! Global configuration model for an Outpost scan.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Configuration for one discovery run, shared read-only across all
/// per-container computations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Ordered interface addresses substituted for wildcard binds.
    pub interfaces: Vec<String>,
    /// Maximum number of containers scanned concurrently.
    pub max_concurrency: usize,
}

impl ScanConfig {
    /// Builds a configuration from a comma-separated interface spec,
    /// as accepted by the `OUTPOST_INTERFACES` environment variable.
    #[must_use]
    pub fn from_interface_spec(spec: &str) -> Self {
        Self {
            interfaces: parse_interface_list(spec),
            max_concurrency: constants::DEFAULT_SCAN_CONCURRENCY,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            interfaces: vec![constants::DEFAULT_INTERFACE.to_string()],
            max_concurrency: constants::DEFAULT_SCAN_CONCURRENCY,
        }
    }
}

/// Parses a comma-separated interface list.
///
/// Entries are trimmed and empty entries dropped; an entirely empty spec
/// yields the default `0.0.0.0` so wildcard fan-out always has at least
/// one target.
#[must_use]
pub fn parse_interface_list(spec: &str) -> Vec<String> {
    let interfaces: Vec<String> = spec
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToString::to_string)
        .collect();
    if interfaces.is_empty() {
        vec![constants::DEFAULT_INTERFACE.to_string()]
    } else {
        interfaces
    }
}
