//! Structured logging for the execution pipeline
//!
//! Every round trip is logged through these helpers so the event names and
//! field sets stay the same across services. Secrets never reach a field:
//! only the method, the URL path, sizes, status, and error codes are logged.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::ApiError;

/// Request metadata for structured logging
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Host and path of the request URL. The query string is left out since
    /// pre-signed URLs carry credentials there.
    pub target: String,
    /// Request body size in bytes, when known up front
    pub body_size: Option<usize>,
}

impl RequestMetadata {
    /// Describe a request about to be dispatched.
    pub fn new(method: impl Into<String>, url: &url::Url) -> Self {
        Self {
            method: method.into(),
            target: format!("{}{}", url.host_str().unwrap_or_default(), url.path()),
            body_size: None,
        }
    }

    /// Set the request body size
    pub fn with_body_size(mut self, size: Option<usize>) -> Self {
        self.body_size = size;
        self
    }

    /// Log the request being sent
    pub fn log_request(&self) {
        debug!(
            method = %self.method,
            url = %self.target,
            body_size = self.body_size,
            "Sending HTTP request"
        );
    }
}

/// Response metadata for structured logging
#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    /// HTTP status code, if a response arrived
    pub status: Option<u16>,
    /// Response body size in bytes, once read
    pub body_size: Option<usize>,
    /// Time from dispatch to outcome
    pub elapsed: Duration,
}

impl ResponseMetadata {
    /// Create response metadata.
    pub fn new(status: Option<u16>, elapsed: Duration) -> Self {
        Self {
            status,
            body_size: None,
            elapsed,
        }
    }

    /// Set the response body size
    pub fn with_body_size(mut self, size: usize) -> Self {
        self.body_size = Some(size);
        self
    }

    /// Log a successful exchange
    pub fn log_success(&self, request: &RequestMetadata) {
        info!(
            method = %request.method,
            url = %request.target,
            status = self.status,
            elapsed_ms = self.elapsed.as_millis(),
            body_size = self.body_size,
            "HTTP request succeeded"
        );
    }

    /// Log a structured error
    pub fn log_error(&self, request: &RequestMetadata, error: &ApiError) {
        warn!(
            method = %request.method,
            url = %request.target,
            status = self.status,
            elapsed_ms = self.elapsed.as_millis(),
            code = %error.code(),
            "HTTP request failed"
        );
    }
}

/// Timer for measuring request duration
#[derive(Debug, Clone, Copy)]
pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    /// Start a new timer
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
