//! Socket-table text parsing.
//!
//! The kernel exposes TCP sockets as a whitespace-aligned table, one socket
//! per line after a header:
//!
//! ```text
//!   sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode
//!    0: 0100007F:1F90 00000000:0000 0A 00000000:00000000 00:00000000 00000000  1000        0 12345 ...
//! ```
//!
//! IPv6 tables have the same shape with 32-hex-char address fields.

use tracing::debug;

/// One data line of a socket table, fields still in their hex/decimal
/// textual form. Borrowed from the table text and consumed immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketEntry<'a> {
    /// Hex-encoded local address.
    pub local_address: &'a str,
    /// Hex-encoded local port.
    pub local_port: &'a str,
    /// Hex-encoded remote address.
    pub remote_address: &'a str,
    /// Hex-encoded remote port.
    pub remote_port: &'a str,
    /// 2-hex-digit TCP state code.
    pub state_code: &'a str,
    /// Decimal socket inode.
    pub inode: &'a str,
}

/// Minimum column count for a usable line: the inode lives in column 9.
const MIN_COLUMNS: usize = 10;

/// Parses raw socket-table text into entries.
///
/// The header line and blank lines are discarded. Lines with fewer than
/// ten whitespace-separated columns, or whose address fields lack the
/// `addr:port` separator, are skipped with a debug log — trailing
/// artifacts in fetched table bytes are expected, not an error.
#[must_use]
pub fn parse_table(text: &str) -> Vec<SocketEntry<'_>> {
    let mut entries = Vec::new();
    for line in text.lines().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let columns: Vec<&str> = line.split_whitespace().collect();
        if columns.len() < MIN_COLUMNS {
            debug!(columns = columns.len(), "skipping short socket-table line");
            continue;
        }
        let (Some((local_address, local_port)), Some((remote_address, remote_port))) =
            (columns[1].rsplit_once(':'), columns[2].rsplit_once(':'))
        else {
            debug!(local = columns[1], remote = columns[2], "skipping line without addr:port fields");
            continue;
        };
        entries.push(SocketEntry {
            local_address,
            local_port,
            remote_address,
            remote_port,
            state_code: columns[3],
            inode: columns[9],
        });
    }
    entries
}
