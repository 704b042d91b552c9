//! Error types for the Cirrus SDK
//!
//! Two layers:
//!
//! - [`ApiError`] is the structured error the execution pipeline emits for
//!   every failed round trip. It carries a short machine-readable `code` and
//!   an optional human-readable `description`. Codes supplied by the server
//!   pass through untouched; otherwise the code comes from [`codes`].
//! - [`Error`] is what every SDK method returns. It wraps `ApiError` and adds
//!   the failures that happen before anything reaches the network (bad base
//!   URL, body encoding, token provider).

use std::fmt;

use cirrus_transport::TransportError;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::context::ContextError;

/// Result type alias for operations that can fail with a Cirrus SDK error.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error returned by caller-supplied capabilities such as token providers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Codes the pipeline emits when the server does not supply its own.
pub mod codes {
    /// Transport reported a deadline or timeout failure.
    pub const REQUEST_TIMEOUT: &str = "request_timeout";
    /// Transport reported a transient network failure.
    pub const TEMPORARY_ERROR: &str = "temporary_error";
    /// Any other transport-layer failure.
    pub const NETWORK_ERROR: &str = "network_error";
    /// The response body could not be read.
    pub const READ_ERROR: &str = "read_error";
    /// HTTP 400.
    pub const BAD_REQUEST: &str = "bad_request";
    /// HTTP 401.
    pub const UNAUTHORIZED: &str = "unauthorized";
    /// HTTP 403.
    pub const FORBIDDEN: &str = "forbidden";
    /// HTTP 404.
    pub const NOT_FOUND: &str = "not_found";
    /// HTTP 429.
    pub const RATE_LIMITED: &str = "rate_limited";
    /// HTTP 500, 502, 503, 504.
    pub const SERVER_ERROR: &str = "server_error";
    /// Any other non-2xx status.
    pub const UNKNOWN_ERROR: &str = "unknown_error";
    /// A 2xx body that does not decode into the expected shape.
    pub const PARSE_ERROR: &str = "parse_error";
}

/// Structured error produced by the execution pipeline.
///
/// Renders as `code` when the description is empty, `code: description`
/// otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Error)]
pub struct ApiError {
    /// Short machine-readable code
    #[serde(rename = "error", default)]
    pub code: String,

    /// Human-readable description (may be empty)
    #[serde(rename = "error_description", default)]
    pub description: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            f.write_str(&self.code)
        } else {
            write!(f, "{}: {}", self.code, self.description)
        }
    }
}

impl ApiError {
    /// Create a structured error.
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }

    /// The machine-readable code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The human-readable description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether this error carries the given code.
    pub fn is(&self, code: &str) -> bool {
        self.code == code
    }

    /// `request_timeout`
    pub fn is_timeout(&self) -> bool {
        self.is(codes::REQUEST_TIMEOUT)
    }

    /// `unauthorized`
    pub fn is_unauthorized(&self) -> bool {
        self.is(codes::UNAUTHORIZED)
    }

    /// `rate_limited`
    pub fn is_rate_limited(&self) -> bool {
        self.is(codes::RATE_LIMITED)
    }

    /// `not_found`
    pub fn is_not_found(&self) -> bool {
        self.is(codes::NOT_FOUND)
    }

    /// Whether a caller could reasonably try again later.
    ///
    /// The SDK itself never retries.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.code.as_str(),
            codes::REQUEST_TIMEOUT
                | codes::TEMPORARY_ERROR
                | codes::RATE_LIMITED
                | codes::SERVER_ERROR
        )
    }

    pub(crate) fn timeout() -> Self {
        Self::new(
            codes::REQUEST_TIMEOUT,
            "The request timed out. Please check your network connection and try again.",
        )
    }

    pub(crate) fn temporary() -> Self {
        Self::new(
            codes::TEMPORARY_ERROR,
            "A temporary network error occurred. Please try again later.",
        )
    }

    pub(crate) fn network(cause: impl fmt::Display) -> Self {
        Self::new(
            codes::NETWORK_ERROR,
            format!("Failed to connect to the service: {cause}"),
        )
    }

    pub(crate) fn read(cause: impl fmt::Display) -> Self {
        Self::new(
            codes::READ_ERROR,
            format!("Failed to read response body: {cause}"),
        )
    }

    pub(crate) fn parse(cause: impl fmt::Display) -> Self {
        Self::new(
            codes::PARSE_ERROR,
            format!("Failed to parse the successful response: {cause}"),
        )
    }

    /// Map a dispatch failure onto the taxonomy.
    pub fn from_transport(err: &TransportError) -> Self {
        if err.is_timeout() {
            Self::timeout()
        } else if err.is_temporary() {
            Self::temporary()
        } else {
            Self::network(err)
        }
    }

    /// Map a body-read failure onto the taxonomy.
    ///
    /// A deadline hit while reading is still a timeout.
    pub fn from_read_failure(err: &TransportError) -> Self {
        if err.is_timeout() {
            Self::timeout()
        } else {
            Self::read(err)
        }
    }

    /// Map a deadline or cancellation observed during dispatch.
    pub(crate) fn from_context(err: ContextError) -> Self {
        match err {
            ContextError::DeadlineExceeded => Self::timeout(),
            ContextError::Cancelled => Self::network(err),
        }
    }

    /// Map a non-2xx response onto a structured error.
    ///
    /// A body that decodes into `{"error", "error_description"}` with at
    /// least one non-empty field is passed through verbatim. Anything else
    /// falls back to the status-code table.
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        if !body.is_empty()
            && let Ok(server) = serde_json::from_slice::<ServerErrorBody>(body)
        {
            let code = server.error.unwrap_or_default();
            let description = server.error_description.unwrap_or_default();
            if !code.is_empty() || !description.is_empty() {
                return Self::new(code, description);
            }
        }

        Self::from_status(status, body)
    }

    /// Fallback error for a status code, ignoring any server payload.
    ///
    /// Only `unknown_error` looks at the body, appending it verbatim.
    pub fn from_status(status: StatusCode, body: &[u8]) -> Self {
        match status.as_u16() {
            400 => Self::new(
                codes::BAD_REQUEST,
                "The request was invalid. Please check your input and try again.",
            ),
            401 => Self::new(
                codes::UNAUTHORIZED,
                "Authentication failed. Please check your credentials or login again.",
            ),
            403 => Self::new(
                codes::FORBIDDEN,
                "You don't have permission to access this resource.",
            ),
            404 => Self::new(codes::NOT_FOUND, "The requested resource was not found."),
            429 => Self::new(
                codes::RATE_LIMITED,
                "Too many requests. Please try again later.",
            ),
            500 | 502 | 503 | 504 => Self::new(
                codes::SERVER_ERROR,
                "The service is currently unavailable. Please try again later.",
            ),
            code => {
                let mut description = format!("Unexpected HTTP status: {code}");
                if !body.is_empty() {
                    description.push_str(" Body: ");
                    description.push_str(&String::from_utf8_lossy(body));
                }
                Self::new(codes::UNKNOWN_ERROR, description)
            }
        }
    }
}

/// Wire shape of a server error payload. `null` counts as empty.
#[derive(Debug, Deserialize)]
struct ServerErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Main error type for the Cirrus SDK.
#[derive(Debug, Error)]
pub enum Error {
    /// The round trip failed; see [`ApiError::code`].
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The configured token provider failed. No request was sent.
    #[error("failed to get token from provider: {0}")]
    TokenProvider(#[source] BoxError),

    /// The request body could not be encoded as JSON.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// Query parameters could not be encoded.
    #[error("failed to encode query parameters: {0}")]
    Query(#[from] serde_urlencoded::ser::Error),

    /// A base or pre-signed URL is unusable.
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl {
        /// The rejected input
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// A header name or value is not valid HTTP.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// A server-signed method is not a valid HTTP method.
    #[error("invalid HTTP method {0:?}")]
    InvalidMethod(String),

    /// The default transport could not be built.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Reading a local file for upload failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The structured error, if the failure came from the pipeline.
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }

    /// The structured error code, if any.
    pub fn code(&self) -> Option<&str> {
        self.api().map(ApiError::code)
    }

    pub(crate) fn invalid_url(url: impl Into<String>, reason: impl fmt::Display) -> Self {
        Error::InvalidUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}
