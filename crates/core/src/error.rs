//! Error types for drivectl
//!
//! One error enum covers the whole system. Variants are split along the
//! propagation policy: transient service failures may be retried by the
//! upload engine, everything else is fatal to the call that raised it.

use crate::store::NodeId;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by path resolution, transfers, and the Drive boundary
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input path was rejected before any network access
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// A path segment matched no child under its parent
    #[error("no entry named '{name}' under folder {parent}")]
    NotFound { name: String, parent: NodeId },

    /// A path segment matched more than one child under its parent.
    /// The remote hierarchy allows duplicate names; this system treats
    /// them as a data-integrity condition and does not pick a winner.
    #[error("{count} entries named '{name}' under folder {parent}")]
    Ambiguous {
        name: String,
        parent: NodeId,
        count: usize,
    },

    /// Retryable server-side failure (5xx-class or throttling)
    #[error("transient service error (HTTP {status}): {message}")]
    Transient { status: u16, message: String },

    /// Any other service failure; never retried
    #[error("service error (HTTP {status}): {message}")]
    Service { status: u16, message: String },

    /// Request could not be constructed or dispatched (no HTTP status)
    #[error("network error: {0}")]
    Network(String),

    /// Credential exchange with the service failed
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Configuration could not be read or written
    #[error("configuration error: {0}")]
    Config(String),

    /// Named profile does not exist
    #[error("profile '{0}' not found")]
    ProfileNotFound(String),

    /// Local file side of a transfer failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// HTTP statuses treated as transient: server-side 5xx plus throttling
const TRANSIENT_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

impl Error {
    /// Classify an HTTP failure status from the service boundary
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if TRANSIENT_STATUSES.contains(&status) {
            Error::Transient { status, message }
        } else {
            Error::Service { status, message }
        }
    }

    /// Check if this error may be retried (transfer engine only)
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Transient { .. } => true,
            Error::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionRefused
                    | std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Check if this error reports a missing remote object
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::NotFound { .. } | Error::Service { status: 404, .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_classification() {
        assert!(Error::from_status(503, "unavailable").is_transient());
        assert!(Error::from_status(500, "internal").is_transient());
        assert!(Error::from_status(429, "rate limited").is_transient());
        assert!(!Error::from_status(403, "forbidden").is_transient());
        assert!(!Error::from_status(404, "gone").is_transient());
    }

    #[test]
    fn test_not_found_detection() {
        assert!(Error::from_status(404, "missing").is_not_found());
        assert!(
            Error::NotFound {
                name: "a".into(),
                parent: NodeId::root()
            }
            .is_not_found()
        );
        assert!(!Error::from_status(500, "internal").is_not_found());
    }

    #[test]
    fn test_io_transience() {
        let timeout = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        assert!(Error::from(timeout).is_transient());

        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(!Error::from(denied).is_transient());
    }
}
