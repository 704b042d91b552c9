//! HTTP transport client implementation
//!
//! Implements the [`Transport`] trait on top of `reqwest`. The transport does
//! one round trip per call: no retries, no backoff, no rate limiting.

use std::time::Duration;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use reqwest::Client as ReqwestClient;

use crate::error::{Result, TransportError};
use crate::traits::{HttpRequest, HttpResponse, RequestBody, Transport};

/// Default deadline for a whole exchange (headers and body).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP transport implementation
///
/// Handles HTTP requests with:
/// - A deadline covering dispatch and the body read
/// - Connection pooling (delegated to `reqwest`)
/// - Multipart and buffered request entities
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: ReqwestClient,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a new HTTP transport with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built
    /// (for example when no TLS backend is available).
    pub fn new() -> Result<Self> {
        Self::with_config(HttpTransportConfig::default())
    }

    /// Create a new HTTP transport with the given deadline and otherwise
    /// default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Self::with_config(HttpTransportConfig {
            timeout,
            ..HttpTransportConfig::default()
        })
    }

    /// Create a new HTTP transport with custom configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn with_config(config: HttpTransportConfig) -> Result<Self> {
        let mut builder = ReqwestClient::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host);

        if let Some(connect_timeout) = config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Config(e.to_string()))?;

        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }

    /// Wrap an existing `reqwest` client.
    ///
    /// The client's own timeout settings apply; `timeout` is only reported
    /// back through [`HttpTransport::timeout`].
    pub fn from_client(client: ReqwestClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// The deadline applied to every exchange
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        tracing::debug!(%method, %url, "dispatching request");
        let mut req = self.client.request(method, url);

        // Multipart first: it sets its own content type, which the explicit
        // headers below then replace with the identical value.
        req = match body {
            Some(RequestBody::Bytes(bytes)) => req.body(bytes),
            Some(RequestBody::Multipart(form)) => req.multipart(form),
            None => req,
        };
        req = req.headers(headers);

        let response = req.send().await?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "received response head");
        let headers = response.headers().clone();
        let body = response.bytes_stream().map_err(TransportError::from).boxed();

        Ok(HttpResponse::new(status, headers, body))
    }
}

/// HTTP transport configuration
#[derive(Clone, Debug)]
pub struct HttpTransportConfig {
    /// Deadline for a whole exchange
    pub timeout: Duration,

    /// Deadline for establishing a connection
    pub connect_timeout: Option<Duration>,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: None,
            pool_max_idle_per_host: 10,
        }
    }
}
