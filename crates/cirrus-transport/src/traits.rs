//! Transport trait and the request/response values it exchanges
//!
//! A transport performs exactly one round trip per call. The response it
//! hands back carries status and headers immediately, while the body stays
//! unread until [`HttpResponse::bytes`] consumes it.

use std::fmt;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream, StreamExt};
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use url::Url;

use crate::error::Result;

/// Stream of body chunks produced by a transport.
pub type BodyStream = BoxStream<'static, Result<Bytes>>;

/// Request entity
#[derive(Debug)]
pub enum RequestBody {
    /// A fully buffered entity
    Bytes(Bytes),

    /// A multipart form, streamed by the transport
    Multipart(reqwest::multipart::Form),
}

impl RequestBody {
    /// The buffered bytes, if this is not a multipart form.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            Self::Multipart(_) => None,
        }
    }

    /// Size of the entity when known up front.
    pub fn len(&self) -> Option<usize> {
        self.as_bytes().map(Bytes::len)
    }
}

/// Outbound HTTP request
///
/// Represents an HTTP request to be sent via a [`Transport`].
#[derive(Debug)]
pub struct HttpRequest {
    /// HTTP method (GET, POST, etc.)
    pub method: Method,

    /// Absolute request URL
    pub url: Url,

    /// Request headers
    pub headers: HeaderMap,

    /// Request entity (optional)
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    /// Create a new HTTP request
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Add a header to the request
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set the request body
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }
}

/// HTTP response with an unread body
pub struct HttpResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: BodyStream,
}

impl HttpResponse {
    /// Create a response around a body stream.
    pub fn new(status: StatusCode, headers: HeaderMap, body: BodyStream) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create a response whose body is already in memory.
    pub fn from_bytes(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        let body: Bytes = body.into();
        let body: BodyStream = if body.is_empty() {
            stream::empty().boxed()
        } else {
            stream::once(async move { Ok(body) }).boxed()
        };
        Self::new(status, headers, body)
    }

    /// Status code
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Read the whole body into memory.
    ///
    /// Consumes the response, so the body can only be read once. The
    /// underlying stream is dropped when this returns, whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns the first error the body stream yields.
    pub async fn bytes(self) -> Result<Bytes> {
        let mut body = self.body;
        let mut buf = BytesMut::new();
        while let Some(chunk) = body.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.freeze())
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Generic transport trait
///
/// Implementations dispatch the request and return as soon as the status
/// line and headers are available. Timeouts, connection reuse, and TLS are
/// the implementation's business.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Send an HTTP request and receive the response head
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;

    #[test]
    fn test_http_request_builder() {
        let url = Url::parse("https://example.com/items").unwrap();
        let request = HttpRequest::new(Method::POST, url)
            .with_header(http::header::ACCEPT, HeaderValue::from_static("application/json"))
            .with_body(RequestBody::Bytes(Bytes::from_static(b"{}")));

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url.as_str(), "https://example.com/items");
        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.body.as_ref().and_then(RequestBody::len), Some(2));
    }

    #[test]
    fn test_multipart_body_has_no_known_length() {
        let body = RequestBody::Multipart(reqwest::multipart::Form::new().text("a", "b"));
        assert!(body.as_bytes().is_none());
        assert_eq!(body.len(), None);
    }

    #[tokio::test]
    async fn test_bytes_concatenates_chunks() {
        let chunks = vec![Ok(Bytes::from_static(b"hello ")), Ok(Bytes::from_static(b"world"))];
        let response = HttpResponse::new(StatusCode::OK, HeaderMap::new(), stream::iter(chunks).boxed());

        assert_eq!(response.bytes().await.unwrap(), Bytes::from_static(b"hello world"));
    }

    #[tokio::test]
    async fn test_bytes_surfaces_stream_error() {
        let chunks = vec![
            Ok(Bytes::from_static(b"partial")),
            Err(TransportError::Body("connection closed".to_string())),
        ];
        let response = HttpResponse::new(StatusCode::OK, HeaderMap::new(), stream::iter(chunks).boxed());

        let err = response.bytes().await.unwrap_err();
        assert_eq!(err, TransportError::Body("connection closed".to_string()));
    }

    #[tokio::test]
    async fn test_from_bytes_empty_body() {
        let response = HttpResponse::from_bytes(StatusCode::NO_CONTENT, HeaderMap::new(), "");
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.bytes().await.unwrap().is_empty());
    }
}
