//! Domain primitive types used across the Outpost workspace.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a container instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(String);

impl ContainerId {
    /// Creates a new container ID from a string value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An externally visible TCP endpoint: the unit returned in both the
/// listening and established lists of a [`ConnectionReport`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    /// Address in textual form (dotted-decimal IPv4, or the expanded
    /// four-word IPv6 form as decoded from the kernel table).
    pub address: String,
    /// TCP port number.
    pub port: u16,
}

impl Connection {
    /// Creates a connection from an address string and port.
    #[must_use]
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
        }
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

/// Network metadata for one container, immutable for the duration of a
/// single discovery call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerNetworkInfo {
    /// Whether the container shares the host's network namespace.
    pub host_network: bool,
    /// Container port to published host IP. An empty host IP means the
    /// binding was created without an explicit address and is treated
    /// as `0.0.0.0`.
    pub publish_bindings: BTreeMap<u16, String>,
}

impl ContainerNetworkInfo {
    /// Metadata for a host-network container (publish bindings are not
    /// meaningful in this mode and stay empty).
    #[must_use]
    pub fn host() -> Self {
        Self {
            host_network: true,
            publish_bindings: BTreeMap::new(),
        }
    }

    /// Metadata for a bridged container with the given publish bindings.
    #[must_use]
    pub fn bridged(publish_bindings: BTreeMap<u16, String>) -> Self {
        Self {
            host_network: false,
            publish_bindings,
        }
    }
}

/// Per-container discovery result: listening sockets normalized to
/// externally reachable addresses, plus established peer connections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionReport {
    /// Listening endpoints, after port-mapping resolution and wildcard
    /// fan-out. May contain duplicate (address, port) pairs only as a
    /// result of fan-out across configured interfaces.
    pub listening: Vec<Connection>,
    /// Established remote endpoints.
    pub established: Vec<Connection>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn connection_display() {
        let c = Connection::new("127.0.0.1", 8080);
        assert_eq!(c.to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn network_info_host_has_no_bindings() {
        let info = ContainerNetworkInfo::host();
        assert!(info.host_network);
        assert!(info.publish_bindings.is_empty());
    }

    #[test]
    fn report_serializes_with_both_lists() {
        let report = ConnectionReport {
            listening: vec![Connection::new("10.0.0.5", 80)],
            established: vec![],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["listening"][0]["address"], "10.0.0.5");
        assert_eq!(json["listening"][0]["port"], 80);
        assert!(json["established"].as_array().unwrap().is_empty());
    }
}
