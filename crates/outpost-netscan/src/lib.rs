//! # outpost-netscan
//!
//! The connection-discovery engine. Given the raw text of a container's
//! kernel TCP socket tables (the contents of `/proc/net/tcp` and
//! `/proc/net/tcp6` as seen inside its network namespace), the container's
//! network metadata, and an optional socket-inode allowlist, it produces the
//! set of listening sockets — normalized to externally reachable host
//! addresses — and established connections owned by that container.
//!
//! The engine is a pure, synchronous computation: it performs no I/O and
//! holds no external resource. Fetching table bytes and inode listings is
//! the caller's concern (see `outpost-scan`).

pub mod codec;
pub mod discover;
pub mod error;
pub mod filter;
pub mod portmap;
pub mod state;
pub mod table;

pub use codec::AddressFamily;
pub use discover::ConnectionDiscovery;
pub use error::NetscanError;
pub use state::TcpState;
