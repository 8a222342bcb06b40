//! System-wide constants and defaults.

/// Application name used in log output and the CLI.
pub const APP_NAME: &str = "outpost";

/// Environment variable holding the comma-separated interface list used
/// for wildcard-bind fan-out.
pub const INTERFACES_ENV: &str = "OUTPOST_INTERFACES";

/// Interface assumed when no interface list is configured.
pub const DEFAULT_INTERFACE: &str = "0.0.0.0";

/// Default number of containers scanned concurrently.
pub const DEFAULT_SCAN_CONCURRENCY: usize = 8;

/// Kernel socket-table file for IPv4 TCP, relative to a process's
/// `/proc/<pid>` directory.
pub const PROC_NET_TCP: &str = "net/tcp";

/// Kernel socket-table file for IPv6 TCP, relative to a process's
/// `/proc/<pid>` directory.
pub const PROC_NET_TCP6: &str = "net/tcp6";
