//! Configuration for the Cirrus client

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use cirrus_transport::{HttpTransport, Transport};
use url::Url;

use crate::error::{Error, Result};
use crate::token::{StaticTokenProvider, TokenProvider};

/// Default deadline of the main transport.
pub const DEFAULT_TIMEOUT: Duration = cirrus_transport::http::DEFAULT_TIMEOUT;

/// Default deadline of the transport used for pre-signed URL transfers.
pub const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Default `User-Agent` header value.
pub const DEFAULT_USER_AGENT: &str = concat!("cirrus-rust/", env!("CARGO_PKG_VERSION"));

/// Immutable client configuration.
///
/// Built once with [`ClientConfig::builder`] and shared by every call. Cloning
/// is cheap: transports and the token provider sit behind `Arc`.
#[derive(Clone)]
pub struct ClientConfig {
    pub(crate) base_url: Url,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) upload_transport: Arc<dyn Transport>,
    pub(crate) user_agent: String,
    pub(crate) token_provider: Option<Arc<dyn TokenProvider>>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("transport", &self.transport)
            .field("upload_transport", &self.upload_transport)
            .field("user_agent", &self.user_agent)
            .field("token_provider", &self.token_provider.is_some())
            .finish_non_exhaustive()
    }
}

impl ClientConfig {
    /// Start a configuration for the service at `base_url`.
    pub fn builder(base_url: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder::new(base_url)
    }

    /// The base location every operation path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The `User-Agent` sent with every request.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Whether authenticated requests consult a token provider.
    pub fn has_token_provider(&self) -> bool {
        self.token_provider.is_some()
    }
}

enum TransportChoice {
    Default(Duration),
    Custom(Arc<dyn Transport>),
}

impl TransportChoice {
    fn build(self) -> Result<Arc<dyn Transport>> {
        match self {
            TransportChoice::Default(timeout) => Ok(Arc::new(HttpTransport::with_timeout(timeout)?)),
            TransportChoice::Custom(transport) => Ok(transport),
        }
    }
}

/// Builder for [`ClientConfig`].
///
/// Setters apply in call order on top of the defaults, so a later
/// `timeout` replaces an earlier `transport` and vice versa.
pub struct ClientConfigBuilder {
    base_url: String,
    transport: TransportChoice,
    upload_transport: TransportChoice,
    user_agent: String,
    token_provider: Option<Arc<dyn TokenProvider>>,
}

impl fmt::Debug for ClientConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfigBuilder")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl ClientConfigBuilder {
    /// Create a builder with default settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            transport: TransportChoice::Default(DEFAULT_TIMEOUT),
            upload_transport: TransportChoice::Default(DEFAULT_UPLOAD_TIMEOUT),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            token_provider: None,
        }
    }

    /// Use a caller-supplied transport for service calls.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = TransportChoice::Custom(transport);
        self
    }

    /// Use the default transport with this deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.transport = TransportChoice::Default(timeout);
        self
    }

    /// Use a caller-supplied transport for pre-signed URL transfers.
    pub fn upload_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.upload_transport = TransportChoice::Custom(transport);
        self
    }

    /// Use the default upload transport with this deadline.
    pub fn upload_timeout(mut self, timeout: Duration) -> Self {
        self.upload_transport = TransportChoice::Default(timeout);
        self
    }

    /// Set the `User-Agent` header value.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Consult `provider` for a bearer token before each authenticated call.
    pub fn token_provider(mut self, provider: impl TokenProvider + 'static) -> Self {
        self.token_provider = Some(Arc::new(provider));
        self
    }

    /// Share an existing provider.
    pub fn shared_token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.token_provider = Some(provider);
        self
    }

    /// Send a fixed bearer token.
    pub fn bearer_token(self, token: impl Into<String>) -> Self {
        self.token_provider(StaticTokenProvider::new(token))
    }

    /// Validate the settings and build the transports.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the base URL is empty, does not parse,
    /// or is not `http`/`https`, [`Error::InvalidHeader`] if the user agent is
    /// not a valid header value, and [`Error::Transport`] if a default
    /// transport cannot be built.
    pub fn build(self) -> Result<ClientConfig> {
        let base_url = parse_base_url(&self.base_url)?;

        if http::HeaderValue::from_str(&self.user_agent).is_err() {
            return Err(Error::InvalidHeader(format!(
                "invalid user agent {:?}",
                self.user_agent
            )));
        }

        Ok(ClientConfig {
            base_url,
            transport: self.transport.build()?,
            upload_transport: self.upload_transport.build()?,
            user_agent: self.user_agent,
            token_provider: self.token_provider,
        })
    }
}

pub(crate) fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_url(raw, "URL is empty"));
    }

    let url = Url::parse(trimmed).map_err(|e| Error::invalid_url(raw, e))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(Error::invalid_url(
            raw,
            format!("unsupported scheme {scheme:?}, expected http or https"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::builder("https://api.example.com").build().unwrap();
        assert_eq!(config.base_url().as_str(), "https://api.example.com/");
        assert_eq!(config.user_agent(), DEFAULT_USER_AGENT);
        assert!(config.user_agent().starts_with("cirrus-rust/"));
        assert!(!config.has_token_provider());
    }

    #[test]
    fn test_builder_setters() {
        let config = ClientConfig::builder("http://localhost:8080/api/v1")
            .timeout(Duration::from_secs(30))
            .upload_timeout(Duration::from_secs(60))
            .user_agent("my-app/1.0")
            .bearer_token("tok")
            .build()
            .unwrap();

        assert_eq!(config.base_url().path(), "/api/v1");
        assert_eq!(config.user_agent(), "my-app/1.0");
        assert!(config.has_token_provider());
    }

    #[test]
    fn test_base_url_with_surrounding_whitespace() {
        let config = ClientConfig::builder("  https://api.example.com  ").build().unwrap();
        assert_eq!(config.base_url().host_str(), Some("api.example.com"));
    }

    #[test]
    fn test_rejects_empty_base_url() {
        let err = ClientConfig::builder("   ").build().unwrap_err();
        assert_matches!(err, Error::InvalidUrl { ref reason, .. } if reason.contains("empty"));
    }

    #[test]
    fn test_rejects_unparseable_base_url() {
        let err = ClientConfig::builder("not a url").build().unwrap_err();
        assert_matches!(err, Error::InvalidUrl { ref url, .. } if url == "not a url");
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let err = ClientConfig::builder("ftp://files.example.com").build().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("ftp"));
        assert!(message.contains("http"));
    }

    #[test]
    fn test_rejects_invalid_user_agent() {
        let err = ClientConfig::builder("https://api.example.com")
            .user_agent("bad\nagent")
            .build()
            .unwrap_err();
        assert_matches!(err, Error::InvalidHeader(_));
    }

    #[test]
    fn test_debug_hides_token_provider() {
        let config = ClientConfig::builder("https://api.example.com")
            .bearer_token("super-secret")
            .build()
            .unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("token_provider: true"));
    }
}
