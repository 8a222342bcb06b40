//! Concurrent per-container scanning.
//!
//! Each container is one unit of work: fetch its inode allowlist (host
//! network only), fetch both socket tables, run the discovery engine.
//! Units are independent and read-only, so they run concurrently over a
//! bounded pool; a failed container is logged and omitted without
//! touching the others.

use std::sync::Arc;

use outpost_common::config::ScanConfig;
use outpost_common::error::Result;
use outpost_common::types::Connection;
use outpost_netscan::{AddressFamily, ConnectionDiscovery};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::error::ScanError;
use crate::host::{ContainerHandle, ContainerHost};

/// Per-container scan result as serialized for consumers: identity plus
/// the discovery report's two lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerIntel {
    /// Container name.
    pub name: String,
    /// Image reference the container was created from.
    pub artefact: String,
    /// Externally reachable listening endpoints.
    pub listening: Vec<Connection>,
    /// Established remote endpoints.
    pub established: Vec<Connection>,
}

/// Drives discovery across all containers of a [`ContainerHost`].
pub struct Scanner {
    host: Arc<dyn ContainerHost>,
    discovery: Arc<ConnectionDiscovery>,
    max_concurrency: usize,
}

impl Scanner {
    /// Creates a scanner over the given host with the given configuration.
    #[must_use]
    pub fn new(host: Arc<dyn ContainerHost>, config: ScanConfig) -> Self {
        Self {
            host,
            discovery: Arc::new(ConnectionDiscovery::new(config.interfaces)),
            max_concurrency: config.max_concurrency.max(1),
        }
    }

    /// Scans every container the host lists, at most `max_concurrency` at
    /// a time, and returns the per-container intel in listing order.
    ///
    /// A container whose fetches fail is logged and omitted; its failure
    /// never affects the others.
    ///
    /// # Errors
    ///
    /// Returns an error only if the host cannot enumerate containers at
    /// all.
    pub async fn scan_all(&self) -> Result<Vec<ContainerIntel>> {
        let containers = self.host.containers()?;
        info!(count = containers.len(), "retrieving connections");

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut handles = Vec::with_capacity(containers.len());
        for container in containers {
            let host = Arc::clone(&self.host);
            let discovery = Arc::clone(&self.discovery);
            let semaphore = Arc::clone(&semaphore);
            handles.push(tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return None;
                };
                debug!(container = %container.id, "gathering intel");
                match scan_container(host.as_ref(), &discovery, &container) {
                    Ok(intel) => Some(intel),
                    Err(err) => {
                        warn!(container = %container.id, %err, "omitting container from report");
                        None
                    }
                }
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(Some(intel)) => results.push(intel),
                Ok(None) => {}
                Err(err) => warn!(%err, "scan task failed"),
            }
        }
        Ok(results)
    }
}

/// Runs one container's collaborator round-trip and discovery pass.
fn scan_container(
    host: &dyn ContainerHost,
    discovery: &ConnectionDiscovery,
    container: &ContainerHandle,
) -> std::result::Result<ContainerIntel, ScanError> {
    let fetch = |what: &'static str, source| ScanError::Fetch {
        what,
        id: container.id.to_string(),
        source,
    };

    let inodes = if container.network.host_network {
        let inodes = host
            .socket_inodes(container)
            .map_err(|e| fetch("socket inodes", e))?;
        if inodes.is_empty() {
            warn!(
                container = %container.id,
                "no inodes for the container's main process; some connections will be omitted to preserve accuracy"
            );
        }
        inodes
    } else {
        Vec::new()
    };

    let tcp4 = host
        .tcp_table(container, AddressFamily::V4)
        .map_err(|e| fetch("IPv4 socket table", e))?;
    let tcp6 = host
        .tcp_table(container, AddressFamily::V6)
        .map_err(|e| fetch("IPv6 socket table", e))?;

    let report = discovery.compute(&container.network, &tcp4, &tcp6, &inodes);
    Ok(ContainerIntel {
        name: container.name.clone(),
        artefact: container.artefact.clone(),
        listening: report.listening,
        established: report.established,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use outpost_common::error::OutpostError;
    use outpost_common::types::{ContainerId, ContainerNetworkInfo};

    use super::*;

    const V4_HEADER: &str = "  sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode";

    fn listener_table(local: &str, inode: &str) -> String {
        format!(
            "{V4_HEADER}\n   0: {local} 00000000:0000 0A 00000000:00000000 00:00000000 00000000  1000        0 {inode} 1\n"
        )
    }

    /// In-memory host: tables keyed by container id, missing ids fail.
    struct StubHost {
        containers: Vec<ContainerHandle>,
        tables: HashMap<String, String>,
    }

    impl ContainerHost for StubHost {
        fn containers(&self) -> Result<Vec<ContainerHandle>> {
            Ok(self.containers.clone())
        }

        fn tcp_table(
            &self,
            container: &ContainerHandle,
            family: AddressFamily,
        ) -> Result<String> {
            if family == AddressFamily::V6 {
                return Ok(String::new());
            }
            self.tables
                .get(container.id.as_str())
                .cloned()
                .ok_or_else(|| OutpostError::NotFound {
                    kind: "socket table",
                    id: container.id.to_string(),
                })
        }

        fn socket_inodes(&self, _container: &ContainerHandle) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    fn handle(id: &str, name: &str, bindings: BTreeMap<u16, String>) -> ContainerHandle {
        ContainerHandle {
            id: ContainerId::new(id),
            name: name.to_string(),
            artefact: "busybox:latest".to_string(),
            network: ContainerNetworkInfo::bridged(bindings),
        }
    }

    #[tokio::test]
    async fn scan_reports_each_container() {
        let bindings = BTreeMap::from([(80, "203.0.113.5".to_string())]);
        let host = StubHost {
            containers: vec![handle("c1", "/web", bindings)],
            tables: HashMap::from([("c1".to_string(), listener_table("00000000:0050", "11"))]),
        };

        let scanner = Scanner::new(Arc::new(host), ScanConfig::default());
        let intel = scanner.scan_all().await.unwrap();

        assert_eq!(intel.len(), 1);
        assert_eq!(intel[0].name, "/web");
        assert_eq!(intel[0].listening, vec![Connection::new("203.0.113.5", 80)]);
    }

    #[tokio::test]
    async fn failed_container_is_omitted_without_affecting_others() {
        let bindings = BTreeMap::from([(80, "203.0.113.5".to_string())]);
        let host = StubHost {
            containers: vec![
                handle("broken", "/broken", BTreeMap::new()),
                handle("c1", "/web", bindings),
            ],
            // No table for "broken": its fetch fails.
            tables: HashMap::from([("c1".to_string(), listener_table("00000000:0050", "11"))]),
        };

        let scanner = Scanner::new(Arc::new(host), ScanConfig::default());
        let intel = scanner.scan_all().await.unwrap();

        assert_eq!(intel.len(), 1);
        assert_eq!(intel[0].name, "/web");
    }

    #[tokio::test]
    async fn intel_serializes_in_the_published_shape() {
        let bindings = BTreeMap::from([(8080, String::new())]);
        let host = StubHost {
            containers: vec![handle("c1", "/api", bindings)],
            tables: HashMap::from([("c1".to_string(), listener_table("00000000:1F90", "11"))]),
        };

        let scanner = Scanner::new(
            Arc::new(host),
            ScanConfig::from_interface_spec("10.0.0.5,192.168.1.1"),
        );
        let intel = scanner.scan_all().await.unwrap();
        let json = serde_json::to_value(&intel).unwrap();

        assert_eq!(json[0]["name"], "/api");
        assert_eq!(json[0]["artefact"], "busybox:latest");
        assert_eq!(json[0]["listening"].as_array().unwrap().len(), 2);
        assert_eq!(json[0]["listening"][0]["address"], "10.0.0.5");
        assert_eq!(json[0]["listening"][1]["address"], "192.168.1.1");
        assert_eq!(json[0]["listening"][0]["port"], 8080);
    }
}
