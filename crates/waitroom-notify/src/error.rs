//! Error types for notification dispatch.

use thiserror::Error;

/// Result type alias using `NotifyError`.
pub type Result<T> = std::result::Result<T, NotifyError>;

/// Errors from a notification attempt.
///
/// All of these are swallowed by the fire-and-forget dispatch path; the
/// taxonomy exists so the diagnostic log can say what actually happened.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The notification endpoint answered with a non-success status.
    #[error("notification endpoint returned status {status}")]
    Status {
        /// HTTP status code returned by the endpoint.
        status: u16,
    },

    /// The request exceeded the configured timeout.
    #[error("notification request timed out after {timeout_secs}s")]
    Timeout {
        /// Timeout that was exceeded, in seconds.
        timeout_secs: u64,
    },

    /// Transport-level failure (DNS, connect, TLS, ...).
    #[error("network error: {0}")]
    Network(String),

    /// The HTTP client could not be constructed.
    #[error("configuration error: {0}")]
    Configuration(String),
}
