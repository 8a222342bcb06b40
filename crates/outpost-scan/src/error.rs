//! Error types for the scanning layer.

use outpost_common::error::OutpostError;
use thiserror::Error;

/// Errors raised while gathering collaborator inputs for one container.
///
/// A fetch failure is fatal for that single container only: the scanner
/// logs it and omits the container from the report, leaving the rest of
/// the scan untouched.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A collaborator round-trip (table fetch, inode fetch) failed.
    #[error("failed to fetch {what} for container {id}: {source}")]
    Fetch {
        /// What was being fetched.
        what: &'static str,
        /// Container the fetch was for.
        id: String,
        /// Underlying error.
        #[source]
        source: OutpostError,
    },
}
