//! Main client implementation for the Cirrus platform

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use cirrus_transport::Transport;
use http::Method;

use crate::config::{ClientConfig, ClientConfigBuilder, parse_base_url};
use crate::error::Result;
use crate::http::{RequestBuilder, resolve_url};
use crate::resources::{Auth, Ingest, Prompts, Storage};
use crate::token::TokenProvider;

/// Main client for the Cirrus platform.
///
/// One client serves all four services. It is cheap to clone and safe to
/// share between tasks; the configuration never changes after construction.
///
/// # Example
///
/// ```rust,no_run
/// use cirrus::{Client, Context};
///
/// # async fn example() -> cirrus::Result<()> {
/// let client = Client::builder("https://api.cirrus.dev/v1")
///     .bearer_token("tok_...")
///     .build()?;
///
/// let me = client.auth().me(&Context::background()).await?;
/// println!("signed in as {}", me.email);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    config: ClientConfig,

    // Lazy-initialized resources
    auth: OnceLock<Auth>,
    storage: OnceLock<Storage>,
    prompts: OnceLock<Prompts>,
    ingest: OnceLock<Ingest>,
}

impl Client {
    /// Create a client for `base_url` with default settings and no token
    /// provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the default transports
    /// cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::builder(base_url).build()
    }

    /// Create a new client builder for advanced configuration.
    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder {
            config: ClientConfig::builder(base_url),
        }
    }

    /// Create a client from a configuration object.
    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                config,
                auth: OnceLock::new(),
                storage: OnceLock::new(),
                prompts: OnceLock::new(),
                ingest: OnceLock::new(),
            }),
        }
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Access the authentication service.
    pub fn auth(&self) -> &Auth {
        self.inner
            .auth
            .get_or_init(|| Auth::new(self.inner.config.clone()))
    }

    /// Access the object storage URL service.
    pub fn storage(&self) -> &Storage {
        self.inner
            .storage
            .get_or_init(|| Storage::new(self.inner.config.clone()))
    }

    /// Access the prompt catalog.
    pub fn prompts(&self) -> &Prompts {
        self.inner
            .prompts
            .get_or_init(|| Prompts::new(self.inner.config.clone()))
    }

    /// Access the content ingestion service.
    pub fn ingest(&self) -> &Ingest {
        self.inner
            .ingest
            .get_or_init(|| Ingest::new(self.inner.config.clone()))
    }

    /// Create a request builder for an operation path on the main transport.
    ///
    /// The request carries `Accept`, `User-Agent`, and, once built, the
    /// bearer token from the configured provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured user agent is not a valid header.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        self.inner.config.request(method, path)
    }

    /// Create a request builder for an absolute pre-signed URL.
    ///
    /// Uses the upload transport, sends `Accept: */*`, and never carries
    /// `Authorization`.
    ///
    /// # Errors
    ///
    /// Returns an error if `url` is not an absolute `http`/`https` URL.
    pub fn presigned_request(&self, method: Method, url: &str) -> Result<RequestBuilder> {
        self.inner.config.presigned_request(method, url)
    }
}

impl ClientConfig {
    pub(crate) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = resolve_url(&self.base_url, path);
        Ok(
            RequestBuilder::new(method, url, &self.user_agent, self.transport.clone())?
                .accept_json()
                .token_provider(self.token_provider.clone()),
        )
    }

    pub(crate) fn presigned_request(&self, method: Method, url: &str) -> Result<RequestBuilder> {
        let url = parse_base_url(url)?;
        Ok(
            RequestBuilder::new(method, url, &self.user_agent, self.upload_transport.clone())?
                .accept_any(),
        )
    }
}

/// Builder for creating a configured [`Client`].
///
/// Forwards to [`ClientConfigBuilder`].
#[derive(Debug)]
pub struct ClientBuilder {
    config: ClientConfigBuilder,
}

impl ClientBuilder {
    /// Use a caller-supplied transport for service calls.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.config = self.config.transport(transport);
        self
    }

    /// Set the deadline of the default transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.timeout(timeout);
        self
    }

    /// Use a caller-supplied transport for pre-signed URL transfers.
    pub fn upload_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.config = self.config.upload_transport(transport);
        self
    }

    /// Set the deadline of the default upload transport.
    pub fn upload_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.upload_timeout(timeout);
        self
    }

    /// Set the `User-Agent` header value.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config = self.config.user_agent(user_agent);
        self
    }

    /// Consult `provider` for a bearer token before each authenticated call.
    pub fn token_provider(mut self, provider: impl TokenProvider + 'static) -> Self {
        self.config = self.config.token_provider(provider);
        self
    }

    /// Share an existing token provider.
    pub fn shared_token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.config = self.config.shared_token_provider(provider);
        self
    }

    /// Send a fixed bearer token.
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.config = self.config.bearer_token(token);
        self
    }

    /// Build the client with the configured options.
    ///
    /// # Errors
    ///
    /// See [`ClientConfigBuilder::build`].
    pub fn build(self) -> Result<Client> {
        Ok(Client::from_config(self.config.build()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use assert_matches::assert_matches;
    use http::header::{ACCEPT, AUTHORIZATION, USER_AGENT};

    #[test]
    fn test_client_builder() {
        let client = Client::builder("https://api.example.com/v1")
            .timeout(Duration::from_secs(30))
            .user_agent("tests/1.0")
            .bearer_token("tok")
            .build()
            .unwrap();

        assert_eq!(client.config().user_agent(), "tests/1.0");
        assert!(client.config().has_token_provider());
    }

    #[test]
    fn test_client_new_rejects_bad_url() {
        assert_matches!(Client::new("ftp://example.com"), Err(Error::InvalidUrl { .. }));
        assert_matches!(Client::new(""), Err(Error::InvalidUrl { .. }));
    }

    #[test]
    fn test_resource_lazy_initialization() {
        let client = Client::new("https://api.example.com").unwrap();

        assert!(std::ptr::eq(client.auth(), client.auth()));
        assert!(std::ptr::eq(client.storage(), client.storage()));
        assert!(std::ptr::eq(client.prompts(), client.prompts()));
        assert!(std::ptr::eq(client.ingest(), client.ingest()));
    }

    #[test]
    fn test_client_clone_shares_resources() {
        let client1 = Client::new("https://api.example.com").unwrap();
        let client2 = client1.clone();
        assert!(std::ptr::eq(client1.prompts(), client2.prompts()));
    }

    #[test]
    fn test_request_resolves_against_base() {
        let client = Client::new("https://api.example.com/v1/").unwrap();
        let builder = client.request(Method::GET, "/prompts/prm_1").unwrap();
        assert_eq!(builder.url().as_str(), "https://api.example.com/v1/prompts/prm_1");
        assert_eq!(builder.headers()[ACCEPT], "application/json");
        assert!(builder.headers()[USER_AGENT].to_str().unwrap().starts_with("cirrus-rust/"));
    }

    #[test]
    fn test_presigned_request_accepts_any_content() {
        let client = Client::new("https://api.example.com").unwrap();
        let builder = client
            .presigned_request(Method::PUT, "https://blob.example.com/bucket/k?X-Sig=abc")
            .unwrap();
        assert_eq!(builder.url().query(), Some("X-Sig=abc"));
        assert_eq!(builder.headers()[ACCEPT], "*/*");
        assert!(builder.headers().get(AUTHORIZATION).is_none());
        assert!(builder.headers().get(USER_AGENT).is_some());
    }

    #[test]
    fn test_presigned_request_rejects_relative_url() {
        let client = Client::new("https://api.example.com").unwrap();
        let err = client.presigned_request(Method::PUT, "/relative/path").unwrap_err();
        assert_matches!(err, Error::InvalidUrl { ref url, .. } if url == "/relative/path");
    }
}
