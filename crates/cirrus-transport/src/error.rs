//! Transport error types
//!
//! Every failure a transport can report falls into one of a handful of
//! classes. The SDK's execution pipeline only needs to tell three of them
//! apart (timeout, temporary, everything else), so the classification lives
//! here, next to the code that sees the underlying client errors.

use std::error::Error as StdError;
use std::io;

use thiserror::Error;

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors that can occur in transport operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The exchange ran past a deadline
    #[error("request timed out: {0}")]
    Timeout(String),

    /// A transient network failure (reset, aborted, broken pipe)
    #[error("temporary network failure: {0}")]
    Temporary(String),

    /// The connection could not be established
    #[error("connection failed: {0}")]
    Connect(String),

    /// The response body could not be read
    #[error("failed to read body: {0}")]
    Body(String),

    /// Any other HTTP client failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// The transport could not be constructed
    #[error("invalid transport configuration: {0}")]
    Config(String),
}

impl TransportError {
    /// Whether the failure came from a deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Whether the failure is transient and distinct from a timeout.
    pub fn is_temporary(&self) -> bool {
        matches!(self, Self::Temporary(_))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();

        if err.is_timeout() {
            return Self::Timeout(message);
        }

        match io_error_kind(&err) {
            Some(io::ErrorKind::TimedOut) => return Self::Timeout(message),
            Some(kind) if is_transient_kind(kind) => return Self::Temporary(message),
            _ => {}
        }

        if err.is_connect() {
            Self::Connect(message)
        } else if err.is_body() || err.is_decode() {
            Self::Body(message)
        } else {
            Self::Http(message)
        }
    }
}

impl From<io::Error> for TransportError {
    fn from(err: io::Error) -> Self {
        let message = err.to_string();
        match err.kind() {
            io::ErrorKind::TimedOut => Self::Timeout(message),
            kind if is_transient_kind(kind) => Self::Temporary(message),
            _ => Self::Http(message),
        }
    }
}

/// Walk the source chain looking for the first `io::Error`.
fn io_error_kind(err: &(dyn StdError + 'static)) -> Option<io::ErrorKind> {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            return Some(io_err.kind());
        }
        current = e.source();
    }
    None
}

fn is_transient_kind(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::Interrupted
            | io::ErrorKind::UnexpectedEof
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(io::ErrorKind::ConnectionReset)]
    #[case(io::ErrorKind::ConnectionAborted)]
    #[case(io::ErrorKind::BrokenPipe)]
    #[case(io::ErrorKind::Interrupted)]
    #[case(io::ErrorKind::UnexpectedEof)]
    fn test_transient_io_errors_are_temporary(#[case] kind: io::ErrorKind) {
        let err = TransportError::from(io::Error::new(kind, "boom"));
        assert!(err.is_temporary());
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_timed_out_io_error_is_timeout() {
        let err = TransportError::from(io::Error::new(io::ErrorKind::TimedOut, "slow"));
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "request timed out: slow");
    }

    #[test]
    fn test_other_io_error_is_neither() {
        let err = TransportError::from(io::Error::new(io::ErrorKind::PermissionDenied, "nope"));
        assert!(!err.is_timeout());
        assert!(!err.is_temporary());
    }

    #[test]
    fn test_io_error_kind_walks_source_chain() {
        #[derive(Debug, thiserror::Error)]
        #[error("outer")]
        struct Outer(#[source] io::Error);

        let outer = Outer(io::Error::new(io::ErrorKind::BrokenPipe, "inner"));
        assert_eq!(io_error_kind(&outer), Some(io::ErrorKind::BrokenPipe));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            TransportError::Connect("refused".to_string()).to_string(),
            "connection failed: refused"
        );
        assert_eq!(
            TransportError::Body("eof".to_string()).to_string(),
            "failed to read body: eof"
        );
    }
}
