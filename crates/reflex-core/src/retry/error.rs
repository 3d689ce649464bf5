//! Fetch error type for retry classification.

use thiserror::Error;

/// Error returned by a single fetch attempt (curl failure or HTTP error).
/// Kept separate from anyhow so the retry loop can classify and log it.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, DNS, proxy, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
}
