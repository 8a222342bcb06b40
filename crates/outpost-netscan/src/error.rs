//! Error types for the discovery engine.
//!
//! Every variant here is recoverable at the entry granularity: the
//! aggregator logs the error and skips the offending socket-table entry
//! rather than failing the whole container computation.

use thiserror::Error;

/// Per-entry errors raised while decoding a socket-table line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NetscanError {
    /// The 2-hex-digit TCP state code is not one of the 11 known states.
    #[error("unknown TCP state code: {code}")]
    UnknownState {
        /// The unrecognized code as it appeared in the table.
        code: String,
    },

    /// A hex-encoded address field has the wrong length or a non-hex digit.
    #[error("malformed hex address: {value}")]
    MalformedAddress {
        /// The offending address field.
        value: String,
    },

    /// A hex-encoded port field does not fit a 16-bit port number.
    #[error("malformed hex port: {value}")]
    MalformedPort {
        /// The offending port field.
        value: String,
    },

    /// A listening port of a bridged container has no publish binding, so
    /// no externally reachable address can be attributed to it.
    #[error("no publish binding for listening port {port}")]
    UnboundPort {
        /// The unpublished port.
        port: u16,
    },
}
