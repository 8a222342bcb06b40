//! Published-port resolution for bridged containers.
//!
//! A socket listening inside a bridged container's namespace is only
//! reachable through the host IP its port was published on. This module
//! swaps the in-namespace address for that host IP; host-network
//! containers bypass it entirely since their addresses are already host
//! addresses.

use std::collections::BTreeMap;

use crate::codec::V4_WILDCARD;
use crate::error::NetscanError;

/// Resolves the externally reachable host IP for a listening port.
///
/// A binding recorded with an empty host IP was published without an
/// explicit address and defaults to `0.0.0.0`, which the codec later fans
/// out across configured interfaces.
///
/// # Errors
///
/// Returns [`NetscanError::UnboundPort`] when the port has no publish
/// binding. Callers drop the entry and log; a container exposing an
/// unpublished listener must not fail the whole discovery call.
pub fn resolve_published(
    bindings: &BTreeMap<u16, String>,
    port: u16,
) -> Result<String, NetscanError> {
    match bindings.get(&port) {
        Some(host_ip) if host_ip.is_empty() => Ok(V4_WILDCARD.to_string()),
        Some(host_ip) => Ok(host_ip.clone()),
        None => Err(NetscanError::UnboundPort { port }),
    }
}
