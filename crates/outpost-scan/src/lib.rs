//! # outpost-scan
//!
//! The I/O half of Outpost: the [`ContainerHost`] collaborator trait that
//! supplies raw socket tables, socket inodes, and container metadata; a
//! procfs-backed implementation for processes the caller may inspect; and
//! the [`Scanner`] that drives per-container discovery concurrently over a
//! bounded task pool.
//!
//! Discovery itself is the pure engine in `outpost-netscan`; everything
//! here exists to feed it and to keep one container's failure from
//! touching another's results.

pub mod error;
pub mod host;
pub mod inode;
pub mod scanner;

pub use error::ScanError;
pub use host::{ContainerHandle, ContainerHost, ManifestEntry, ProcfsHost};
pub use scanner::{ContainerIntel, Scanner};
