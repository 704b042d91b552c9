//! Bearer token providers
//!
//! A [`TokenProvider`] is consulted once per authenticated request, right
//! before dispatch. A non-empty token becomes `Authorization: Bearer <token>`;
//! an empty token means the request goes out without the header. If the
//! provider fails, nothing is sent.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::context::Context;
use crate::error::BoxError;

/// Supplies the bearer token for authenticated requests.
///
/// Implementations must be safe to call from many tasks at once.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return the current token, or an empty string for none.
    async fn token(&self, ctx: &Context) -> Result<String, BoxError>;
}

/// A fixed token.
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: SecretString,
}

impl StaticTokenProvider {
    /// Wrap a token that never changes.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
        }
    }
}

impl fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn token(&self, _ctx: &Context) -> Result<String, BoxError> {
        Ok(self.token.expose_secret().to_owned())
    }
}

type TokenFuture = Pin<Box<dyn Future<Output = Result<String, BoxError>> + Send>>;

/// A token provider backed by a closure. See [`token_provider_fn`].
pub struct FnTokenProvider {
    f: Box<dyn Fn(Context) -> TokenFuture + Send + Sync>,
}

impl fmt::Debug for FnTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTokenProvider").finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenProvider for FnTokenProvider {
    async fn token(&self, ctx: &Context) -> Result<String, BoxError> {
        (self.f)(ctx.clone()).await
    }
}

/// Build a provider from an async closure.
///
/// ```
/// use cirrus::token::token_provider_fn;
///
/// let provider = token_provider_fn(|_ctx| async { Ok::<_, cirrus::BoxError>("tok_123".to_string()) });
/// ```
pub fn token_provider_fn<F, Fut>(f: F) -> FnTokenProvider
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, BoxError>> + Send + 'static,
{
    FnTokenProvider {
        f: Box::new(move |ctx: Context| -> TokenFuture { Box::pin(f(ctx)) }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_provider_returns_token() {
        let provider = StaticTokenProvider::new("secret-token");
        let token = provider.token(&Context::background()).await.unwrap();
        assert_eq!(token, "secret-token");
    }

    #[test]
    fn test_static_provider_debug_redacts() {
        let provider = StaticTokenProvider::new("secret-token");
        let debug = format!("{provider:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("REDACTED"));
    }

    #[tokio::test]
    async fn test_fn_provider() {
        let provider = token_provider_fn(|_ctx| async { Ok::<_, BoxError>("from-closure".to_string()) });
        assert_eq!(
            provider.token(&Context::background()).await.unwrap(),
            "from-closure"
        );
    }

    #[tokio::test]
    async fn test_fn_provider_error() {
        let provider = token_provider_fn(|_ctx| async { Err::<String, BoxError>("expired".into()) });
        let err = provider.token(&Context::background()).await.unwrap_err();
        assert_eq!(err.to_string(), "expired");
    }
}
