//! Container host abstraction and the procfs-backed implementation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use outpost_common::constants;
use outpost_common::error::{OutpostError, Result};
use outpost_common::types::{ContainerId, ContainerNetworkInfo};
use outpost_netscan::AddressFamily;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::inode;

/// One container as listed by a [`ContainerHost`]: identity, artefact
/// (image reference), and the network metadata discovery needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerHandle {
    /// Unique identifier within the host.
    pub id: ContainerId,
    /// Human-readable container name.
    pub name: String,
    /// Image reference the container was created from.
    pub artefact: String,
    /// Network mode and publish bindings.
    pub network: ContainerNetworkInfo,
}

/// Collaborator that supplies raw discovery inputs for containers.
///
/// Implementors own all I/O: listing containers, reading socket tables
/// from inside each container's network namespace, and listing the socket
/// inodes of a container's main process. The discovery engine itself
/// never performs I/O.
pub trait ContainerHost: Send + Sync {
    /// Lists the running containers to scan.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot enumerate containers at all;
    /// this aborts the scan before any per-container work starts.
    fn containers(&self) -> Result<Vec<ContainerHandle>>;

    /// Fetches the raw text of one socket table as seen inside the
    /// container's network namespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be read; the scanner treats
    /// this as fatal for that container only.
    fn tcp_table(&self, container: &ContainerHandle, family: AddressFamily) -> Result<String>;

    /// Lists socket inodes open under the container's main process.
    ///
    /// An empty list is a valid, expected result meaning ownership could
    /// not be attributed; it is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error only for failures the implementation considers
    /// fatal for the container.
    fn socket_inodes(&self, container: &ContainerHandle) -> Result<Vec<String>>;
}

/// One container record in a procfs scan manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Human-readable container name.
    pub name: String,
    /// Image reference the container was created from.
    pub artefact: String,
    /// PID of the container's main process on this host.
    pub pid: u32,
    /// Whether the container shares the host network namespace.
    #[serde(default)]
    pub host_network: bool,
    /// Container port to published host IP (empty IP means `0.0.0.0`).
    #[serde(default)]
    pub publish_bindings: BTreeMap<u16, String>,
}

/// A [`ContainerHost`] backed by the local `/proc` filesystem.
///
/// Reads `/proc/<pid>/net/tcp{,6}` for socket tables — the per-process
/// view is the container's own namespace — and `/proc/<pid>/fd` symlinks
/// for socket inodes. Works without privileges for processes the calling
/// user may inspect.
#[derive(Debug, Clone)]
pub struct ProcfsHost {
    proc_root: PathBuf,
    entries: Vec<ManifestEntry>,
}

impl ProcfsHost {
    /// Creates a host over `/proc` for the given manifest entries.
    #[must_use]
    pub fn new(entries: Vec<ManifestEntry>) -> Self {
        Self::with_proc_root(PathBuf::from("/proc"), entries)
    }

    /// Creates a host with a custom proc root. Used by tests that lay out
    /// a fake proc tree.
    #[must_use]
    pub fn with_proc_root(proc_root: PathBuf, entries: Vec<ManifestEntry>) -> Self {
        Self { proc_root, entries }
    }

    /// Loads a manifest file (a JSON array of [`ManifestEntry`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if two
    /// entries share a PID — the PID is the container identity here, so
    /// a duplicate would silently alias two containers.
    pub fn from_manifest(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| OutpostError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: Vec<ManifestEntry> = serde_json::from_str(&content)?;
        let mut seen = std::collections::BTreeSet::new();
        for entry in &entries {
            if !seen.insert(entry.pid) {
                return Err(OutpostError::Config {
                    message: format!("duplicate pid {} in manifest", entry.pid),
                });
            }
        }
        Ok(Self::new(entries))
    }

    fn entry(&self, container: &ContainerHandle) -> Result<&ManifestEntry> {
        self.entries
            .iter()
            .find(|entry| entry.pid.to_string() == container.id.as_str())
            .ok_or_else(|| OutpostError::NotFound {
                kind: "container",
                id: container.id.to_string(),
            })
    }

    fn pid_path(&self, pid: u32) -> PathBuf {
        self.proc_root.join(pid.to_string())
    }
}

impl ContainerHost for ProcfsHost {
    fn containers(&self) -> Result<Vec<ContainerHandle>> {
        Ok(self
            .entries
            .iter()
            .map(|entry| ContainerHandle {
                id: ContainerId::new(entry.pid.to_string()),
                name: entry.name.clone(),
                artefact: entry.artefact.clone(),
                network: ContainerNetworkInfo {
                    host_network: entry.host_network,
                    publish_bindings: entry.publish_bindings.clone(),
                },
            })
            .collect())
    }

    fn tcp_table(&self, container: &ContainerHandle, family: AddressFamily) -> Result<String> {
        let entry = self.entry(container)?;
        let table = match family {
            AddressFamily::V4 => constants::PROC_NET_TCP,
            AddressFamily::V6 => constants::PROC_NET_TCP6,
        };
        let path = self.pid_path(entry.pid).join(table);
        fs::read_to_string(&path).map_err(|source| OutpostError::Io { path, source })
    }

    fn socket_inodes(&self, container: &ContainerHandle) -> Result<Vec<String>> {
        let entry = self.entry(container)?;
        let fd_dir = self.pid_path(entry.pid).join("fd");
        let listing = match fs::read_dir(&fd_dir) {
            Ok(listing) => listing,
            Err(err) => {
                // Mirrors the shell tolerance of `ls -l ... 2> /dev/null`:
                // an unreadable fd directory degrades to an empty
                // allowlist, which the ownership filter treats as
                // "attribution unavailable".
                warn!(path = %fd_dir.display(), %err, "cannot read fd listing");
                return Ok(Vec::new());
            }
        };
        // One symlink target per line, in fd-listing shape, so the same
        // parser serves proc reads and exec-style listings.
        let mut targets = String::new();
        for dir_entry in listing.flatten() {
            if let Ok(target) = fs::read_link(dir_entry.path()) {
                targets.push_str(&target.to_string_lossy());
                targets.push('\n');
            }
        }
        Ok(inode::parse_fd_listing(&targets))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn entries() -> Vec<ManifestEntry> {
        vec![ManifestEntry {
            name: "/web".to_string(),
            artefact: "nginx:latest".to_string(),
            pid: 4242,
            host_network: false,
            publish_bindings: BTreeMap::from([(80, "203.0.113.5".to_string())]),
        }]
    }

    #[test]
    fn containers_expose_manifest_metadata() {
        let host = ProcfsHost::new(entries());
        let handles = host.containers().unwrap();
        assert_eq!(handles.len(), 1);
        assert_eq!(handles[0].id.as_str(), "4242");
        assert_eq!(handles[0].name, "/web");
        assert!(!handles[0].network.host_network);
        assert_eq!(
            handles[0].network.publish_bindings.get(&80),
            Some(&"203.0.113.5".to_string())
        );
    }

    #[test]
    fn manifest_deserializes_with_defaults() {
        let json = r#"[{"name": "/db", "artefact": "postgres:16", "pid": 99}]"#;
        let parsed: Vec<ManifestEntry> = serde_json::from_str(json).unwrap();
        assert!(!parsed[0].host_network);
        assert!(parsed[0].publish_bindings.is_empty());
    }

    #[test]
    fn manifest_rejects_duplicate_pids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        fs::write(
            &path,
            r#"[{"name": "/a", "artefact": "busybox", "pid": 42},
                {"name": "/b", "artefact": "busybox", "pid": 42}]"#,
        )
        .unwrap();

        let err = ProcfsHost::from_manifest(&path).unwrap_err();
        assert!(matches!(err, OutpostError::Config { .. }), "got {err}");
    }

    #[test]
    fn manifest_with_distinct_pids_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        fs::write(
            &path,
            r#"[{"name": "/a", "artefact": "busybox", "pid": 42},
                {"name": "/b", "artefact": "busybox", "pid": 43}]"#,
        )
        .unwrap();

        let host = ProcfsHost::from_manifest(&path).unwrap();
        assert_eq!(host.containers().unwrap().len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn socket_inodes_come_from_fd_symlink_targets() {
        let dir = tempfile::tempdir().unwrap();
        let fd_dir = dir.path().join("4242").join("fd");
        fs::create_dir_all(&fd_dir).unwrap();
        std::os::unix::fs::symlink("socket:[48163]", fd_dir.join("3")).unwrap();
        std::os::unix::fs::symlink("pipe:[777]", fd_dir.join("4")).unwrap();
        std::os::unix::fs::symlink("/dev/null", fd_dir.join("5")).unwrap();

        let host = ProcfsHost::with_proc_root(dir.path().to_path_buf(), entries_for_pid(4242));
        let handles = host.containers().unwrap();

        assert_eq!(
            host.socket_inodes(&handles[0]).unwrap(),
            vec!["48163".to_string()]
        );
    }

    #[cfg(unix)]
    fn entries_for_pid(pid: u32) -> Vec<ManifestEntry> {
        vec![ManifestEntry {
            name: "/web".to_string(),
            artefact: "nginx:latest".to_string(),
            pid,
            host_network: true,
            publish_bindings: BTreeMap::new(),
        }]
    }

    #[test]
    fn unknown_handle_is_not_found() {
        let host = ProcfsHost::new(entries());
        let stray = ContainerHandle {
            id: ContainerId::new("1"),
            name: "/stray".to_string(),
            artefact: "busybox".to_string(),
            network: ContainerNetworkInfo::default(),
        };
        assert!(host.tcp_table(&stray, AddressFamily::V4).is_err());
    }
}
