//! Inode-based socket ownership policy.
//!
//! A host-network container shares the host's socket tables, so every row
//! of `/proc/net/tcp` is visible whether or not the container owns it.
//! Attribution uses an allowlist of socket inodes gathered from the
//! container's main process; an empty allowlist means that gathering
//! failed or found nothing.
//!
//! The policy is deliberately asymmetric between established and listening
//! entries. An unattributed established connection is dropped outright,
//! while an unattributed listening socket is let through here and caught
//! by the aggregator's coarser published-port check instead — a port-level
//! attribution is still possible for listeners when an inode-level one is
//! not.

/// Whether an established entry survives ownership filtering.
///
/// Kept unless the container is host-network and the inode is not in the
/// allowlist. With an empty allowlist every host-network established
/// entry is dropped.
#[must_use]
pub fn keep_established(host_network: bool, allowlist: &[String], inode: &str) -> bool {
    !host_network || allowlist.iter().any(|owned| owned == inode)
}

/// Whether a listening entry survives ownership filtering.
///
/// Kept unless the container is host-network, the allowlist is non-empty,
/// and the inode is not in it. An empty allowlist keeps all listeners so
/// the aggregator can apply the published-port fallback.
#[must_use]
pub fn keep_listening(host_network: bool, allowlist: &[String], inode: &str) -> bool {
    !host_network || allowlist.is_empty() || allowlist.iter().any(|owned| owned == inode)
}
