//! Response metadata returned by the pipeline

use std::time::Duration;

use http::{HeaderMap, StatusCode};

/// Outcome of a successful round trip: HTTP metadata plus the decoded body.
///
/// `parsed` is `None` when the caller asked for no payload or the 2xx body
/// was empty.
///
/// ```rust,no_run
/// # use cirrus::{Client, Context, Prompt};
/// # use http::Method;
/// # async fn example(client: Client) -> cirrus::Result<()> {
/// let raw = client
///     .request(Method::GET, "/prompts/prm_1")?
///     .send::<Prompt>(&Context::background())
///     .await?;
///
/// println!("status: {}", raw.status());
/// println!("request id: {:?}", raw.request_id());
/// println!("took: {:?}", raw.elapsed());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RawResponse<T> {
    parsed: Option<T>,
    status: StatusCode,
    headers: HeaderMap,
    elapsed: Duration,
}

impl<T> RawResponse<T> {
    pub(crate) fn new(
        parsed: Option<T>,
        status: StatusCode,
        headers: HeaderMap,
        elapsed: Duration,
    ) -> Self {
        Self {
            parsed,
            status,
            headers,
            elapsed,
        }
    }

    /// HTTP status code
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Time from dispatch to the end of the body read
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// The `x-request-id` header, if the server sent one.
    pub fn request_id(&self) -> Option<&str> {
        self.headers
            .get("x-request-id")
            .and_then(|value| value.to_str().ok())
    }

    /// A single header as a string.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// The decoded body, if any.
    pub fn parsed(&self) -> Option<&T> {
        self.parsed.as_ref()
    }

    /// Take the decoded body.
    pub fn into_parsed(self) -> Option<T> {
        self.parsed
    }

    /// Transform the decoded body, keeping the metadata.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RawResponse<U> {
        RawResponse {
            parsed: self.parsed.map(f),
            status: self.status,
            headers: self.headers,
            elapsed: self.elapsed,
        }
    }
}

impl<T: Default> RawResponse<T> {
    /// Take the decoded body, or the default record for an empty 2xx body.
    pub fn into_parsed_or_default(self) -> T {
        self.parsed.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", HeaderValue::from_static("req_abc"));
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("41"));
        headers
    }

    #[test]
    fn test_accessors() {
        let raw = RawResponse::new(
            Some(5u32),
            StatusCode::OK,
            headers(),
            Duration::from_millis(120),
        );
        assert_eq!(raw.status(), StatusCode::OK);
        assert_eq!(raw.request_id(), Some("req_abc"));
        assert_eq!(raw.header("x-ratelimit-remaining"), Some("41"));
        assert_eq!(raw.elapsed(), Duration::from_millis(120));
        assert_eq!(raw.parsed(), Some(&5));
    }

    #[test]
    fn test_empty_body_defaults() {
        let raw: RawResponse<Vec<String>> =
            RawResponse::new(None, StatusCode::NO_CONTENT, HeaderMap::new(), Duration::ZERO);
        assert!(raw.parsed().is_none());
        assert!(raw.request_id().is_none());
        assert_eq!(raw.into_parsed_or_default(), Vec::<String>::new());
    }

    #[test]
    fn test_map_keeps_metadata() {
        let raw = RawResponse::new(Some(2), StatusCode::CREATED, headers(), Duration::ZERO);
        let mapped = raw.map(|n| n * 10);
        assert_eq!(mapped.status(), StatusCode::CREATED);
        assert_eq!(mapped.into_parsed(), Some(20));
    }
}
