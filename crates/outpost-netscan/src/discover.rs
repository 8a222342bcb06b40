//! Per-container connection discovery.
//!
//! Runs the full pipeline — parse, classify, ownership-filter, decode,
//! resolve, fan out — over both address families and assembles the final
//! [`ConnectionReport`]. All per-entry errors are consumed here with a log
//! line; the computation never fails at the container granularity.

use outpost_common::types::{Connection, ContainerNetworkInfo, ConnectionReport};
use tracing::warn;

use crate::codec::{self, AddressFamily};
use crate::filter;
use crate::portmap;
use crate::state::TcpState;
use crate::table;

/// The connection-discovery engine, configured once with the interface
/// list used for wildcard fan-out and shared read-only across containers.
#[derive(Debug, Clone)]
pub struct ConnectionDiscovery {
    interfaces: Vec<String>,
}

impl ConnectionDiscovery {
    /// Creates an engine that fans wildcard binds out across the given
    /// interface addresses. An empty list falls back to `0.0.0.0` so a
    /// wildcard listener is never silently erased.
    #[must_use]
    pub fn new(interfaces: Vec<String>) -> Self {
        let interfaces = if interfaces.is_empty() {
            vec![outpost_common::constants::DEFAULT_INTERFACE.to_string()]
        } else {
            interfaces
        };
        Self { interfaces }
    }

    /// Computes the connection report for one container.
    ///
    /// `tcp4_text` and `tcp6_text` are the raw socket tables fetched from
    /// the container's network namespace; `inodes` is the socket-inode
    /// allowlist of its main process (empty when attribution was not
    /// possible — a valid input, see [`crate::filter`]).
    #[must_use]
    pub fn compute(
        &self,
        info: &ContainerNetworkInfo,
        tcp4_text: &str,
        tcp6_text: &str,
        inodes: &[String],
    ) -> ConnectionReport {
        let (mut listening, mut established) =
            collect_family(tcp4_text, AddressFamily::V4, info, inodes);
        let (listening6, established6) =
            collect_family(tcp6_text, AddressFamily::V6, info, inodes);
        listening.extend(listening6);
        established.extend(established6);

        // Fallback attribution: with no usable inode allowlist on a
        // host-network container, only listeners on declared published
        // ports can be claimed. Established entries were already dropped
        // by the ownership filter in this situation.
        if info.host_network && inodes.is_empty() {
            listening.retain(|conn| info.publish_bindings.contains_key(&conn.port));
        }

        ConnectionReport {
            listening: self.normalize_listening(info, listening),
            established: established
                .into_iter()
                .map(|conn| Connection::new(codec::rewrite_mapped(&conn.address), conn.port))
                .collect(),
        }
    }

    /// Maps in-namespace listening addresses to externally reachable ones:
    /// publish-binding resolution for bridged containers, then wildcard
    /// fan-out and mapped-IPv4 rewriting.
    fn normalize_listening(
        &self,
        info: &ContainerNetworkInfo,
        listening: Vec<Connection>,
    ) -> Vec<Connection> {
        let mut normalized = Vec::with_capacity(listening.len());
        for conn in listening {
            let address = if info.host_network {
                conn.address
            } else {
                match portmap::resolve_published(&info.publish_bindings, conn.port) {
                    Ok(host_ip) => host_ip,
                    Err(err) => {
                        warn!(port = conn.port, %err, "dropping unattributable listener");
                        continue;
                    }
                }
            };
            if codec::is_wildcard(&address) {
                normalized.extend(codec::fan_out(conn.port, &self.interfaces));
            } else {
                normalized.push(Connection::new(codec::rewrite_mapped(&address), conn.port));
            }
        }
        normalized
    }
}

impl Default for ConnectionDiscovery {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// One pass over a single family's socket table: classify, apply the
/// ownership policy, and decode the relevant endpoint of each surviving
/// entry. Listening entries keep the local endpoint, established entries
/// the remote one.
fn collect_family(
    text: &str,
    family: AddressFamily,
    info: &ContainerNetworkInfo,
    inodes: &[String],
) -> (Vec<Connection>, Vec<Connection>) {
    let mut listening = Vec::new();
    let mut established = Vec::new();

    for entry in table::parse_table(text) {
        let state = match TcpState::from_code(entry.state_code) {
            Ok(state) => state,
            Err(err) => {
                warn!(%err, inode = entry.inode, "skipping socket-table entry");
                continue;
            }
        };
        match state {
            TcpState::Established => {
                if !filter::keep_established(info.host_network, inodes, entry.inode) {
                    continue;
                }
                match decode_endpoint(entry.remote_address, entry.remote_port, family) {
                    Ok(conn) => established.push(conn),
                    Err(err) => warn!(%err, "skipping undecodable established entry"),
                }
            }
            TcpState::Listen => {
                if !filter::keep_listening(info.host_network, inodes, entry.inode) {
                    continue;
                }
                match decode_endpoint(entry.local_address, entry.local_port, family) {
                    Ok(conn) => listening.push(conn),
                    Err(err) => warn!(%err, "skipping undecodable listening entry"),
                }
            }
            // All other recognized states never reach the report.
            _ => {}
        }
    }

    (listening, established)
}

fn decode_endpoint(
    address_hex: &str,
    port_hex: &str,
    family: AddressFamily,
) -> Result<Connection, crate::error::NetscanError> {
    let address = codec::decode_address(address_hex, family)?;
    let port = codec::decode_port(port_hex)?;
    Ok(Connection::new(address, port))
}
