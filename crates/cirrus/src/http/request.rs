//! HTTP request builder

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use cirrus_transport::{HttpRequest, RequestBody, Transport};
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::pipeline;
use super::response::RawResponse;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::token::TokenProvider;

fn application_json() -> HeaderValue {
    HeaderValue::from_static("application/json")
}

/// Resolve an operation path against the base location.
///
/// The base path prefix is kept, a leading slash on `path` is optional, and
/// exactly one `/` separates the two. Anything after `?` in `path` becomes
/// the query string.
pub fn resolve_url(base: &Url, path: &str) -> Url {
    let (path, query) = match path.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (path, None),
    };

    let prefix = base.path().trim_end_matches('/');
    let suffix = path.trim_start_matches('/');

    let mut url = base.clone();
    url.set_path(&format!("{prefix}/{suffix}"));
    url.set_query(query.filter(|q| !q.is_empty()));
    url.set_fragment(None);
    url
}

/// Builder for one SDK request.
///
/// Created by [`Client::request`](crate::Client::request). Body encoding
/// happens eagerly; the token provider runs in [`build`](Self::build), right
/// before dispatch.
pub struct RequestBuilder {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<RequestBody>,
    transport: Arc<dyn Transport>,
    token_provider: Option<Arc<dyn TokenProvider>>,
}

impl fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("token_provider", &self.token_provider.is_some())
            .finish_non_exhaustive()
    }
}

impl RequestBuilder {
    pub(crate) fn new(
        method: Method,
        url: Url,
        user_agent: &str,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let user_agent = HeaderValue::from_str(user_agent)
            .map_err(|_| Error::InvalidHeader(format!("invalid user agent {user_agent:?}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, user_agent);

        Ok(Self {
            method,
            url,
            headers,
            body: None,
            transport,
            token_provider: None,
        })
    }

    pub(crate) fn accept_json(mut self) -> Self {
        self.headers.insert(ACCEPT, application_json());
        self
    }

    pub(crate) fn accept_any(mut self) -> Self {
        self.headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        self
    }

    pub(crate) fn token_provider(mut self, provider: Option<Arc<dyn TokenProvider>>) -> Self {
        self.token_provider = provider;
        self
    }

    /// Encode `body` as JSON and attach it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] if `body` cannot be serialized.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let buf = serde_json::to_vec(body).map_err(Error::Encode)?;
        self.headers.insert(CONTENT_TYPE, application_json());
        self.body = Some(RequestBody::Bytes(Bytes::from(buf)));
        Ok(self)
    }

    /// Append url-encoded query parameters. An empty encoding adds nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Query`] if `params` is not a flat record.
    pub fn query<Q: Serialize + ?Sized>(mut self, params: &Q) -> Result<Self> {
        let encoded = serde_urlencoded::to_string(params)?;
        if !encoded.is_empty() {
            let query = match self.url.query() {
                Some(existing) if !existing.is_empty() => format!("{existing}&{encoded}"),
                _ => encoded,
            };
            self.url.set_query(Some(&query));
        }
        Ok(self)
    }

    /// Attach a multipart form with its boundary content type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] if the boundary is not a valid header
    /// value.
    pub fn multipart(mut self, form: reqwest::multipart::Form) -> Result<Self> {
        let content_type = format!("multipart/form-data; boundary={}", form.boundary());
        let value = HeaderValue::from_str(&content_type)
            .map_err(|_| Error::InvalidHeader(content_type.clone()))?;
        self.headers.insert(CONTENT_TYPE, value);
        self.body = Some(RequestBody::Multipart(form));
        Ok(self)
    }

    /// Attach a raw entity. An empty `content_type` sets no header.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] if `content_type` is not a valid
    /// header value.
    pub fn bytes(mut self, content_type: &str, body: impl Into<Bytes>) -> Result<Self> {
        if !content_type.is_empty() {
            self = self.header(CONTENT_TYPE.as_str(), content_type)?;
        }
        self.body = Some(RequestBody::Bytes(body.into()));
        Ok(self)
    }

    /// Set a header, replacing any earlier value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] if the name or value is not valid HTTP.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::InvalidHeader(format!("invalid header name {name:?}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::InvalidHeader(format!("invalid value for header {name}: {e}")))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// HTTP method
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Resolved request URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Headers set so far (no `Authorization` yet)
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Consult the token provider and produce the final request.
    ///
    /// The provider is called at most once, under `ctx`. No network I/O
    /// happens here beyond what the provider itself does.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TokenProvider`] if the provider fails or `ctx` ends
    /// while waiting for it.
    pub async fn build(self, ctx: &Context) -> Result<PreparedRequest> {
        let Self {
            method,
            url,
            mut headers,
            body,
            transport,
            token_provider,
        } = self;

        if let Some(provider) = token_provider {
            let token = match ctx.run(provider.token(ctx)).await {
                Ok(Ok(token)) => token,
                Ok(Err(err)) => return Err(Error::TokenProvider(err)),
                Err(err) => return Err(Error::TokenProvider(Box::new(err))),
            };

            if !token.is_empty() {
                let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                    Error::InvalidHeader("bearer token is not a valid header value".to_string())
                })?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
        }

        Ok(PreparedRequest {
            request: HttpRequest {
                method,
                url,
                headers,
                body,
            },
            transport,
        })
    }

    /// Build and execute, decoding a 2xx body into `T`.
    pub async fn send<T: DeserializeOwned>(self, ctx: &Context) -> Result<RawResponse<T>> {
        self.build(ctx).await?.execute(ctx).await
    }

    /// Build and execute without a success payload.
    pub async fn send_empty(self, ctx: &Context) -> Result<RawResponse<()>> {
        self.build(ctx).await?.execute_empty(ctx).await
    }

    /// Build and execute, returning the raw 2xx body.
    pub async fn send_bytes(self, ctx: &Context) -> Result<RawResponse<Bytes>> {
        self.build(ctx).await?.execute_bytes(ctx).await
    }
}

/// A fully built request bound to the transport that will carry it.
#[derive(Debug)]
pub struct PreparedRequest {
    request: HttpRequest,
    transport: Arc<dyn Transport>,
}

impl PreparedRequest {
    /// The request as it will be dispatched.
    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    /// Run the pipeline, decoding a 2xx body into `T`.
    pub async fn execute<T: DeserializeOwned>(self, ctx: &Context) -> Result<RawResponse<T>> {
        Ok(pipeline::execute(self.transport.as_ref(), ctx, self.request).await?)
    }

    /// Run the pipeline without a success payload.
    pub async fn execute_empty(self, ctx: &Context) -> Result<RawResponse<()>> {
        Ok(pipeline::execute_empty(self.transport.as_ref(), ctx, self.request).await?)
    }

    /// Run the pipeline and keep the raw 2xx body.
    pub async fn execute_bytes(self, ctx: &Context) -> Result<RawResponse<Bytes>> {
        Ok(pipeline::execute_bytes(self.transport.as_ref(), ctx, self.request).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::token::{MockTokenProvider, StaticTokenProvider};
    use assert_matches::assert_matches;
    use cirrus_transport::HttpTransport;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    fn transport() -> Arc<dyn Transport> {
        Arc::new(HttpTransport::new().unwrap())
    }

    fn builder(method: Method, path: &str) -> RequestBuilder {
        let base = Url::parse("https://api.example.com/v1").unwrap();
        RequestBuilder::new(method, resolve_url(&base, path), "cirrus-rust/test", transport())
            .unwrap()
            .accept_json()
    }

    #[test]
    fn test_resolve_url_variants() {
        let cases = [
            ("https://h/api/v1", "widgets", "https://h/api/v1/widgets"),
            ("https://h/api/v1/", "/widgets", "https://h/api/v1/widgets"),
            ("https://h/", "/widgets", "https://h/widgets"),
            ("https://h", "widgets", "https://h/widgets"),
            ("https://h/", "widgets/42", "https://h/widgets/42"),
            ("https://h/api", "/search?q=rust&limit=5", "https://h/api/search?q=rust&limit=5"),
        ];
        for (base, path, expected) in cases {
            let resolved = resolve_url(&Url::parse(base).unwrap(), path);
            assert_eq!(resolved.as_str(), expected, "{base} + {path}");
        }
    }

    #[test]
    fn test_default_headers() {
        let builder = builder(Method::GET, "/x");
        assert_eq!(builder.headers()[ACCEPT], "application/json");
        assert_eq!(builder.headers()[USER_AGENT], "cirrus-rust/test");
        assert!(builder.headers().get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_json_body_round_trips() {
        #[derive(Debug, Serialize, Deserialize, PartialEq)]
        struct Body {
            email: String,
            attempts: u32,
        }

        let sent = Body {
            email: "a@example.com".into(),
            attempts: 3,
        };
        let builder = builder(Method::POST, "/auth/login").json(&sent).unwrap();
        assert_eq!(builder.headers()[CONTENT_TYPE], "application/json");

        let body = builder.body.as_ref().and_then(RequestBody::as_bytes).unwrap();
        let decoded: Body = serde_json::from_slice(body).unwrap();
        assert_eq!(decoded, sent);
    }

    #[test]
    fn test_json_encode_failure() {
        let mut map = std::collections::HashMap::new();
        map.insert(vec![1u8], "non-string keys are not valid JSON");
        let err = builder(Method::POST, "/x").json(&map).unwrap_err();
        assert_matches!(err, Error::Encode(_));
    }

    #[test]
    fn test_query_skips_empty_encoding() {
        #[derive(Serialize)]
        struct Params {
            #[serde(skip_serializing_if = "Option::is_none")]
            prefix: Option<String>,
        }

        let builder = builder(Method::GET, "/storage/objects")
            .query(&Params { prefix: None })
            .unwrap();
        assert_eq!(builder.url().query(), None);

        let builder = builder
            .query(&Params {
                prefix: Some("docs/a b".into()),
            })
            .unwrap();
        assert_eq!(builder.url().query(), Some("prefix=docs%2Fa+b"));
    }

    #[test]
    fn test_query_appends_to_existing() {
        let builder = builder(Method::GET, "/x?a=1").query(&[("b", "2")]).unwrap();
        assert_eq!(builder.url().query(), Some("a=1&b=2"));
    }

    #[test]
    fn test_multipart_sets_boundary_content_type() {
        let form = reqwest::multipart::Form::new().text("userId", "u1");
        let boundary = form.boundary().to_string();
        let builder = builder(Method::POST, "/ingest/file").multipart(form).unwrap();
        assert_eq!(
            builder.headers()[CONTENT_TYPE].to_str().unwrap(),
            format!("multipart/form-data; boundary={boundary}")
        );
    }

    #[test]
    fn test_invalid_header_is_rejected() {
        let err = builder(Method::GET, "/x").header("x-bad", "line\nbreak").unwrap_err();
        assert_matches!(err, Error::InvalidHeader(_));
    }

    #[tokio::test]
    async fn test_build_without_provider_has_no_authorization() {
        let prepared = builder(Method::GET, "/x").build(&Context::background()).await.unwrap();
        assert!(prepared.request().headers.get(AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_build_sets_bearer_token() {
        let prepared = builder(Method::GET, "/x")
            .token_provider(Some(Arc::new(StaticTokenProvider::new("tok_1"))))
            .build(&Context::background())
            .await
            .unwrap();
        let value = &prepared.request().headers[AUTHORIZATION];
        assert_eq!(value, "Bearer tok_1");
        assert!(value.is_sensitive());
    }

    #[tokio::test]
    async fn test_empty_token_sets_no_header() {
        let mut provider = MockTokenProvider::new();
        provider.expect_token().times(1).returning(|_| Ok(String::new()));

        let prepared = builder(Method::GET, "/x")
            .token_provider(Some(Arc::new(provider)))
            .build(&Context::background())
            .await
            .unwrap();
        assert!(prepared.request().headers.get(AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_provider_failure_is_wrapped() {
        let mut provider = MockTokenProvider::new();
        provider
            .expect_token()
            .times(1)
            .returning(|_| Err::<String, BoxError>("boom".into()));

        let err = builder(Method::GET, "/x")
            .token_provider(Some(Arc::new(provider)))
            .build(&Context::background())
            .await
            .unwrap_err();
        assert_matches!(err, Error::TokenProvider(_));
        let message = err.to_string();
        assert!(message.contains("failed to get token from provider"));
        assert!(message.contains("boom"));
    }

    #[tokio::test]
    async fn test_cancelled_context_fails_token_fetch() {
        let token = tokio_util::sync::CancellationToken::new();
        token.cancel();
        let ctx = Context::background().with_cancellation(token);

        let mut provider = MockTokenProvider::new();
        provider.expect_token().returning(|_| Ok("tok".to_string()));

        let err = builder(Method::GET, "/x")
            .token_provider(Some(Arc::new(provider)))
            .build(&ctx)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "failed to get token from provider: request cancelled");
    }
}
